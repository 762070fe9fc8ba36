//! prakriti-providers: generation backend integrations.
//!
//! Implements the `GenerationBackend` trait for the Gemini API and a scripted
//! mock, and loads the `prakriti.toml` configuration that selects between
//! them.

pub mod config;
pub mod gemini;
pub mod mock;

pub use config::{create_provider, load_config, PrakritiConfig, ProviderConfig};
pub use prakriti_core::error::ProviderError;
