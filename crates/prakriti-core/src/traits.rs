//! Core trait definitions for generation backends.
//!
//! The `prakriti-providers` crate implements [`GenerationBackend`] for the
//! Gemini API and for a scripted mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::ImagePayload;

// ---------------------------------------------------------------------------
// Generation backend trait
// ---------------------------------------------------------------------------

/// A remote service that turns instructions (and optionally an image) into
/// structured JSON text.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Human-readable backend name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Run one generation request.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List models this backend offers.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// One piece of request content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    Text { text: String },
    InlineImage { image: ImagePayload },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn image(image: ImagePayload) -> Self {
        Part::InlineImage { image }
    }
}

/// Request sent to a generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-3-flash-preview").
    pub model: String,
    /// Ordered content parts.
    pub parts: Vec<Part>,
    /// JSON shape the response must follow.
    #[serde(default)]
    pub response_schema: Option<serde_json::Value>,
    /// Sampling temperature; backend default when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl GenerateRequest {
    /// Concatenated text of all text parts.
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineImage { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, Part::InlineImage { .. }))
    }
}

/// Response from a generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Raw response text, expected to be JSON.
    pub text: String,
    /// Model that produced the response.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    pub supports_images: bool,
}

// ---------------------------------------------------------------------------
// JSON extraction
// ---------------------------------------------------------------------------

/// Strip Markdown code fences that some models wrap around JSON output.
pub fn strip_json_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
