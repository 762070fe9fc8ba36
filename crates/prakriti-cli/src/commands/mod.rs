//! Subcommand implementations and the helpers they share.

pub mod assess;
pub mod check_image;
pub mod init;
pub mod list_models;
pub mod questions;
pub mod score;
pub mod show;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use prakriti_core::cache::{FileStore, TranslationCache};
use prakriti_core::model::ImagePayload;
use prakriti_core::{Assessor, Language, QuestionSet};
use prakriti_providers::{create_provider, PrakritiConfig};

/// Build an assessor for the named backend, or the configured default.
pub fn build_assessor(config: &PrakritiConfig, provider: Option<&str>) -> Result<Assessor> {
    let (name, provider_config) = config.provider(provider)?;
    let backend = create_provider(name, provider_config)?;

    let expected_len = QuestionSet::standard().len();
    let cache = match config.resolved_cache_dir() {
        Some(dir) => TranslationCache::new(Arc::new(FileStore::new(dir)), expected_len),
        None => TranslationCache::in_memory(expected_len),
    };
    tracing::debug!(backend = name, model = %config.model, "assessor ready");
    Ok(Assessor::new(backend, cache, config.assessor_config()))
}

/// The `--language` flag, else the configured default.
pub fn resolve_language(flag: Option<String>, config: &PrakritiConfig) -> Result<Language> {
    match flag {
        Some(name) => name.parse().map_err(anyhow::Error::msg),
        None => Ok(config.default_language.clone()),
    }
}

/// Read a photo from disk, inferring its MIME type from the extension.
pub fn load_image(path: &Path) -> Result<ImagePayload> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image: {}", path.display()))?;
    anyhow::ensure!(!bytes.is_empty(), "image is empty: {}", path.display());
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    Ok(ImagePayload::from_bytes(
        ImagePayload::mime_for_extension(ext),
        &bytes,
    ))
}
