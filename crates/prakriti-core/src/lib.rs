//! prakriti-core: scoring, session state, and assessment orchestration.
//!
//! This crate defines the quiz data model, the dosha scorer, the retrying
//! remote caller, the translation cache, and the `Assessor` that glues quiz
//! answers to a generation backend.

pub mod assessor;
pub mod cache;
pub mod error;
pub mod model;
pub mod profile;
pub mod prompts;
pub mod questions;
pub mod report;
pub mod retry;
pub mod scoring;
pub mod session;
pub mod traits;

pub use assessor::{Assessor, AssessorConfig};
pub use error::ProviderError;
pub use model::{Dosha, Language, QuestionSet};
pub use retry::{with_retry, RetryPolicy};
pub use scoring::{score, DoshaTally, ScoreSheet};
pub use session::{QuizSession, Step};
