//! Assessment orchestration.
//!
//! The [`Assessor`] turns scored answers into a synthesized report,
//! translates the questionnaire, and screens photos, all through a
//! [`GenerationBackend`] wrapped in [`with_retry`].
//!
//! Only [`Assessor::synthesize`] surfaces failures. Translation falls back to
//! the untranslated questions and the photo check falls back to a permissive
//! verdict.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::instrument;

use crate::cache::TranslationCache;
use crate::error::ProviderError;
use crate::model::{
    AnswerRecord, AssessmentResult, ImagePayload, Language, QuestionSet, TranslationBundle,
    ValidationResult,
};
use crate::prompts;
use crate::retry::{with_retry, RetryPolicy};
use crate::scoring::DoshaTally;
use crate::traits::{strip_json_fences, GenerateRequest, GenerationBackend, Part};

/// Default model for every call.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Settings for the [`Assessor`].
#[derive(Debug, Clone)]
pub struct AssessorConfig {
    pub model: String,
    /// Used for synthesis and translation.
    pub retry: RetryPolicy,
    /// Used for the photo check.
    pub validation_retry: RetryPolicy,
    pub temperature: Option<f64>,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::synthesis(),
            validation_retry: RetryPolicy::validation(),
            temperature: None,
        }
    }
}

/// Orchestrates every remote call the quiz makes.
pub struct Assessor {
    backend: Arc<dyn GenerationBackend>,
    cache: TranslationCache,
    config: AssessorConfig,
}

impl Assessor {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        cache: TranslationCache,
        config: AssessorConfig,
    ) -> Self {
        Self {
            backend,
            cache,
            config,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn config(&self) -> &AssessorConfig {
        &self.config
    }

    fn request(&self, parts: Vec<Part>, schema: serde_json::Value) -> GenerateRequest {
        GenerateRequest {
            model: self.config.model.clone(),
            parts,
            response_schema: Some(schema),
            temperature: self.config.temperature,
        }
    }

    // -----------------------------------------------------------------------
    // Translation
    // -----------------------------------------------------------------------

    /// Translate the questionnaire into `language`.
    ///
    /// The default language never reaches the backend. Otherwise a cached
    /// bundle is reused, then a fresh one is fetched and cached. Any failure
    /// yields the untranslated questions.
    #[instrument(skip_all, fields(language = %language))]
    pub async fn translate(&self, questions: &QuestionSet, language: &Language) -> TranslationBundle {
        if language.is_default() {
            return TranslationBundle::from_questions(questions);
        }

        if let Some(cached) = self.cache.get(language) {
            match cached.conforms_to(questions) {
                Ok(()) => {
                    tracing::info!("using cached translation");
                    return cached;
                }
                Err(reason) => tracing::debug!(%reason, "cached translation does not fit questions"),
            }
        }

        match self.fetch_translation(questions, language).await {
            Ok(bundle) => {
                self.cache.put(language, &bundle);
                bundle
            }
            Err(e) => {
                tracing::warn!(
                    error = %format!("{e:#}"),
                    "translation unavailable, falling back to {}",
                    Language::DEFAULT_NAME
                );
                TranslationBundle::from_questions(questions)
            }
        }
    }

    async fn fetch_translation(
        &self,
        questions: &QuestionSet,
        language: &Language,
    ) -> Result<TranslationBundle> {
        let request = self.request(
            vec![Part::text(prompts::translation_prompt(questions, language))],
            prompts::translation_schema(),
        );
        let response = with_retry(&self.config.retry, || self.backend.generate(&request)).await?;

        let bundle: TranslationBundle = serde_json::from_str(strip_json_fences(&response.text))
            .context("translation is not a JSON array of questions")?;
        if bundle.is_empty() {
            anyhow::bail!("empty translation received");
        }
        bundle.conforms_to(questions).map_err(anyhow::Error::msg)?;
        Ok(bundle)
    }

    // -----------------------------------------------------------------------
    // Synthesis
    // -----------------------------------------------------------------------

    /// Synthesize the constitution report from scores, answers, and an
    /// optional photo.
    ///
    /// Failures, including exhausted quota retries, are returned as the
    /// backend produced them. A response missing fields is passed through;
    /// see [`AssessmentResult::missing_fields`].
    #[instrument(skip_all, fields(language = %language, with_image = image.is_some()))]
    pub async fn synthesize(
        &self,
        language: &Language,
        tally: &DoshaTally,
        answers: &[AnswerRecord],
        image: Option<&ImagePayload>,
    ) -> Result<AssessmentResult> {
        let mut parts = vec![Part::text(prompts::synthesis_prompt(language, tally, answers))];
        if let Some(image) = image {
            parts.push(Part::image(image.clone()));
        }
        let request = self.request(parts, prompts::assessment_schema());

        let response = with_retry(&self.config.retry, || self.backend.generate(&request))
            .await
            .inspect_err(|e| tracing::error!(error = %format!("{e:#}"), "assessment synthesis failed"))?;

        let text = strip_json_fences(&response.text);
        let text = if text.is_empty() { "{}" } else { text };
        let result: AssessmentResult = serde_json::from_str(text).map_err(|e| {
            ProviderError::InvalidResponse(format!("assessment is not a JSON object: {e}"))
        })?;

        let missing = result.missing_fields();
        if !missing.is_empty() {
            tracing::warn!(?missing, "assessment response is incomplete");
        }
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Photo check
    // -----------------------------------------------------------------------

    /// Ask whether the photo is clear enough to observe facial features.
    ///
    /// Advisory only: uses the shorter validation retry budget and returns a
    /// permissive verdict if the check cannot be completed.
    #[instrument(skip_all, fields(mime = %image.mime_type))]
    pub async fn check_quality(&self, image: &ImagePayload) -> ValidationResult {
        match self.try_check_quality(image).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "photo check unavailable, accepting photo");
                ValidationResult::permissive()
            }
        }
    }

    async fn try_check_quality(&self, image: &ImagePayload) -> Result<ValidationResult> {
        let request = self.request(
            vec![
                Part::text(prompts::IMAGE_CHECK_PROMPT),
                Part::image(image.clone()),
            ],
            prompts::validation_schema(),
        );
        let response =
            with_retry(&self.config.validation_retry, || self.backend.generate(&request)).await?;

        let text = strip_json_fences(&response.text);
        if text.is_empty() {
            return Ok(ValidationResult::accepted());
        }
        serde_json::from_str(text).context("photo check is not a JSON verdict")
    }
}
