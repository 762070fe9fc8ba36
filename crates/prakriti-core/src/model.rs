//! Core data model types for prakriti.
//!
//! Questions, options, dosha tags, translation bundles, and the structured
//! results returned by the generation backend.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of options every question offers.
pub const OPTIONS_PER_QUESTION: usize = 3;

/// Category tag attached to every answer option.
///
/// Only the three base tags are produced by scoring. The composite tags are
/// kept as legitimate values so stored data and future question sets can
/// carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
    #[serde(rename = "Vata-Pitta")]
    VataPitta,
    #[serde(rename = "Pitta-Kapha")]
    PittaKapha,
    #[serde(rename = "Vata-Kapha")]
    VataKapha,
    Tridosha,
}

impl Dosha {
    /// The three base doshas, in display order.
    pub const BASE: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    pub fn is_base(self) -> bool {
        matches!(self, Dosha::Vata | Dosha::Pitta | Dosha::Kapha)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dosha::Vata => "Vata",
            Dosha::Pitta => "Pitta",
            Dosha::Kapha => "Kapha",
            Dosha::VataPitta => "Vata-Pitta",
            Dosha::PittaKapha => "Pitta-Kapha",
            Dosha::VataKapha => "Vata-Kapha",
            Dosha::Tridosha => "Tridosha",
        }
    }
}

impl fmt::Display for Dosha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dosha {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            Dosha::Vata,
            Dosha::Pitta,
            Dosha::Kapha,
            Dosha::VataPitta,
            Dosha::PittaKapha,
            Dosha::VataKapha,
            Dosha::Tridosha,
        ];
        all.into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown dosha: {s}"))
    }
}

/// Target language for question text and the synthesized report.
///
/// Any language name is accepted; English is the language the question set
/// is authored in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(String);

impl Language {
    pub const DEFAULT_NAME: &'static str = "English";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn english() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }

    pub fn hindi() -> Self {
        Self::new("Hindi")
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether this is the language the question set is written in.
    pub fn is_default(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::DEFAULT_NAME)
    }

    /// Lowercase, filesystem-safe form of the name used in cache keys.
    pub fn slug(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_lowercase().next().unwrap_or(c)
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("language name must not be empty".into());
        }
        Ok(Self::new(s))
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    /// Display label, a single letter ("A", "B", "C").
    pub label: String,
    pub text: String,
    pub dosha: Dosha,
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    /// Short category label ("Skin Texture"), sent as context for synthesis.
    pub category: String,
    pub text: String,
    pub options: Vec<QuestionOption>,
}

/// Reasons a question set is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionSetError {
    #[error("question set is empty")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateId(u32),

    #[error("question {id} has {count} options, expected 3")]
    OptionCount { id: u32, count: usize },

    #[error("question {id} option {label} carries composite tag {dosha}")]
    CompositeTag { id: u32, label: String, dosha: Dosha },
}

/// Validated, immutable, ordered set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(QuestionSetError::DuplicateId(q.id));
            }
            if q.options.len() != OPTIONS_PER_QUESTION {
                return Err(QuestionSetError::OptionCount {
                    id: q.id,
                    count: q.options.len(),
                });
            }
            if let Some(opt) = q.options.iter().find(|o| !o.dosha.is_base()) {
                return Err(QuestionSetError::CompositeTag {
                    id: q.id,
                    label: opt.label.clone(),
                    dosha: opt.dosha,
                });
            }
        }
        Ok(Self { questions })
    }

    /// Wraps rows already known to be well-formed (the built-in set).
    pub(crate) fn from_trusted(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// The chosen answer to one question, kept as free-text synthesis context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub category: String,
    pub answer: String,
}

/// A translated option: label preserved, text replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedOption {
    pub label: String,
    pub text: String,
}

/// A translated question prompt with its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedQuestion {
    pub text: String,
    #[serde(default)]
    pub options: Vec<TranslatedOption>,
}

/// Ordered translation of a whole question set into one language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationBundle(pub Vec<TranslatedQuestion>);

impl TranslationBundle {
    /// The untranslated bundle: question text and option text copied verbatim.
    pub fn from_questions(questions: &QuestionSet) -> Self {
        Self(
            questions
                .iter()
                .map(|q| TranslatedQuestion {
                    text: q.text.clone(),
                    options: q
                        .options
                        .iter()
                        .map(|o| TranslatedOption {
                            label: o.label.clone(),
                            text: o.text.clone(),
                        })
                        .collect(),
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TranslatedQuestion> {
        self.0.get(index)
    }

    /// Checks the bundle lines up with `questions` question-for-question and
    /// option-for-option.
    pub fn conforms_to(&self, questions: &QuestionSet) -> Result<(), String> {
        if self.len() != questions.len() {
            return Err(format!(
                "bundle has {} questions, expected {}",
                self.len(),
                questions.len()
            ));
        }
        for (i, (translated, source)) in self.0.iter().zip(questions).enumerate() {
            if translated.options.len() != source.options.len() {
                return Err(format!(
                    "question {} has {} translated options, expected {}",
                    i + 1,
                    translated.options.len(),
                    source.options.len()
                ));
            }
        }
        Ok(())
    }
}

/// A photo attached to the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImagePayload {
    pub const DEFAULT_MIME: &'static str = "image/jpeg";

    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Accepts a `data:image/png;base64,....` URL or bare base64 text.
    pub fn from_data_url(url: &str) -> Self {
        match url.split_once(',') {
            Some((header, data)) => {
                let mime_type = header
                    .strip_prefix("data:")
                    .and_then(|h| h.split(';').next())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(Self::DEFAULT_MIME);
                Self {
                    mime_type: mime_type.to_string(),
                    data: data.to_string(),
                }
            }
            None => Self {
                mime_type: Self::DEFAULT_MIME.to_string(),
                data: url.to_string(),
            },
        }
    }

    /// Guess a MIME type from a file extension.
    pub fn mime_for_extension(ext: &str) -> &'static str {
        match ext.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            _ => Self::DEFAULT_MIME,
        }
    }
}

/// Structured report synthesized by the generation backend.
///
/// Every field defaults when absent so a partial response still
/// deserializes; see [`AssessmentResult::missing_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    #[serde(default)]
    pub prakriti_type: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(
        default,
        rename = "detectedFacialFeatures",
        skip_serializing_if = "Option::is_none"
    )]
    pub detected_features: Option<Vec<String>>,
    #[serde(default)]
    pub key_traits: Vec<String>,
    #[serde(default)]
    pub lifestyle_advice: Vec<String>,
    #[serde(default)]
    pub dietary_advice: Vec<String>,
}

impl AssessmentResult {
    /// Names of required fields that came back empty or absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.prakriti_type.trim().is_empty() {
            missing.push("prakritiType");
        }
        if self.explanation.trim().is_empty() {
            missing.push("explanation");
        }
        if self.key_traits.is_empty() {
            missing.push("keyTraits");
        }
        if self.lifestyle_advice.is_empty() {
            missing.push("lifestyleAdvice");
        }
        if self.dietary_advice.is_empty() {
            missing.push("dietaryAdvice");
        }
        missing
    }
}

/// Advisory verdict on a photo's usefulness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    #[serde(default)]
    pub feedback: String,
}

impl ValidationResult {
    /// Returned whenever the check itself could not be performed.
    pub fn permissive() -> Self {
        Self {
            is_valid: true,
            feedback: "Observation complete. Proceed with your journey.".into(),
        }
    }

    /// Returned when the backend answered with an empty body.
    pub fn accepted() -> Self {
        Self {
            is_valid: true,
            feedback: "Vision accepted.".into(),
        }
    }
}
