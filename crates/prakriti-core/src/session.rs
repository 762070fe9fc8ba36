//! Quiz session state machine.
//!
//! A [`QuizSession`] holds everything one run of the quiz accumulates:
//! language, translation, optional photo, tally, answers, and the final
//! result. It is an explicit value owned by the shell, so the scoring and
//! orchestration functions stay free of hidden state.
//!
//! ```text
//! Start -> LanguageSelected -> [ImageCaptured] -> Answering(n of N)
//!       -> Synthesizing -> Result | Error
//! Error -> Synthesizing (retry)      any -> Start (reset)
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    AnswerRecord, AssessmentResult, ImagePayload, Language, Question, QuestionSet,
    TranslatedOption, TranslatedQuestion, TranslationBundle, ValidationResult,
};
use crate::retry::is_quota_error;
use crate::scoring::{DoshaTally, ScoreSheet};

/// Where the session is in the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Start,
    LanguageSelected,
    ImageCaptured,
    /// Waiting for the answer to question `index` (0-based).
    Answering { index: usize },
    Synthesizing,
    Result,
    Error,
}

/// How a failed synthesis is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Quota,
    Other,
}

impl FailureKind {
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::Quota => {
                "The API quota has been exhausted. This usually means too many requests were made \
                 in a short time. Please wait a minute and try again."
            }
            FailureKind::Other => {
                "An unexpected disturbance occurred during the analysis. Please try again."
            }
        }
    }
}

/// Classify a synthesis failure with the same signature the retry wrapper uses.
pub fn classify_failure(err: &anyhow::Error) -> FailureKind {
    if is_quota_error(err) {
        FailureKind::Quota
    } else {
        FailureKind::Other
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while in step {from:?}")]
    InvalidTransition { from: Step, action: &'static str },

    #[error("option {option} is out of range, question has {count} options")]
    OptionOutOfRange { option: usize, count: usize },
}

/// One run of the quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    questions: QuestionSet,
    step: Step,
    language: Language,
    translation: Option<TranslationBundle>,
    image: Option<ImagePayload>,
    image_check: Option<ValidationResult>,
    sheet: ScoreSheet,
    result: Option<AssessmentResult>,
    failure: Option<FailureKind>,
}

impl QuizSession {
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            id: Uuid::new_v4(),
            questions,
            step: Step::Start,
            language: Language::default(),
            translation: None,
            image: None,
            image_check: None,
            sheet: ScoreSheet::default(),
            result: None,
            failure: None,
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            from: self.step,
            action,
        }
    }

    // -- accessors -----------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn tally(&self) -> &DoshaTally {
        &self.sheet.tally
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.sheet.answers
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn image_check(&self) -> Option<&ValidationResult> {
        self.image_check.as_ref()
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    /// `(answered, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.sheet.answers.len(), self.questions.len())
    }

    /// The question awaiting an answer, with its index.
    pub fn current_question(&self) -> Option<(usize, &Question)> {
        match self.step {
            Step::Answering { index } => self.questions.get(index).map(|q| (index, q)),
            _ => None,
        }
    }

    /// Display text for the current question: the translation when one is
    /// loaded, otherwise the original text.
    pub fn current_display(&self) -> Option<TranslatedQuestion> {
        let (index, question) = self.current_question()?;
        let translated = self.translation.as_ref().and_then(|t| t.get(index)).cloned();
        Some(translated.unwrap_or_else(|| TranslatedQuestion {
            text: question.text.clone(),
            options: question
                .options
                .iter()
                .map(|o| TranslatedOption {
                    label: o.label.clone(),
                    text: o.text.clone(),
                })
                .collect(),
        }))
    }

    // -- transitions ---------------------------------------------------------

    pub fn select_language(&mut self, language: Language) -> Result<(), SessionError> {
        if self.step != Step::Start {
            return Err(self.invalid("select a language"));
        }
        self.language = language;
        self.step = Step::LanguageSelected;
        Ok(())
    }

    /// Apply a finished translation fetched for `language`. Returns `false`
    /// when the session has moved on (reset, another language selected, or
    /// already synthesizing) and the bundle is dropped.
    pub fn apply_translation(&mut self, language: &Language, bundle: TranslationBundle) -> bool {
        let accepting = matches!(
            self.step,
            Step::LanguageSelected | Step::ImageCaptured | Step::Answering { .. }
        );
        if !accepting
            || *language != self.language
            || bundle.conforms_to(&self.questions).is_err()
        {
            return false;
        }
        self.translation = Some(bundle);
        true
    }

    /// Attach (or replace) the photo.
    pub fn capture_image(&mut self, image: ImagePayload) -> Result<(), SessionError> {
        if !matches!(self.step, Step::LanguageSelected | Step::ImageCaptured) {
            return Err(self.invalid("capture an image"));
        }
        self.image = Some(image);
        self.image_check = None;
        self.step = Step::ImageCaptured;
        Ok(())
    }

    /// Record the advisory check made for `image`. Returns `false` if that
    /// photo is no longer the attached one.
    pub fn apply_image_check(&mut self, image: &ImagePayload, verdict: ValidationResult) -> bool {
        if self.step != Step::ImageCaptured || self.image.as_ref() != Some(image) {
            return false;
        }
        self.image_check = Some(verdict);
        true
    }

    /// Drop the photo and continue without one.
    pub fn discard_image(&mut self) -> Result<(), SessionError> {
        if self.step != Step::ImageCaptured {
            return Err(self.invalid("discard the image"));
        }
        self.image = None;
        self.image_check = None;
        self.step = Step::LanguageSelected;
        Ok(())
    }

    pub fn begin_answering(&mut self) -> Result<(), SessionError> {
        if !matches!(self.step, Step::LanguageSelected | Step::ImageCaptured) {
            return Err(self.invalid("start answering"));
        }
        self.step = Step::Answering { index: 0 };
        Ok(())
    }

    /// Answer the current question with option `option` (0-based). After the
    /// last question the session moves to [`Step::Synthesizing`].
    pub fn answer(&mut self, option: usize) -> Result<Step, SessionError> {
        let Step::Answering { index } = self.step else {
            return Err(self.invalid("answer"));
        };
        let count = self.questions.as_slice()[index].options.len();
        if option >= count {
            return Err(SessionError::OptionOutOfRange { option, count });
        }
        self.sheet.apply(&self.questions, index, option);

        self.step = if index + 1 < self.questions.len() {
            Step::Answering { index: index + 1 }
        } else {
            Step::Synthesizing
        };
        Ok(self.step)
    }

    pub fn complete(&mut self, result: AssessmentResult) -> Result<(), SessionError> {
        if self.step != Step::Synthesizing {
            return Err(self.invalid("complete synthesis"));
        }
        self.result = Some(result);
        self.failure = None;
        self.step = Step::Result;
        Ok(())
    }

    /// Record a failed synthesis and return its classification.
    pub fn fail(&mut self, err: &anyhow::Error) -> Result<FailureKind, SessionError> {
        if self.step != Step::Synthesizing {
            return Err(self.invalid("fail synthesis"));
        }
        let kind = classify_failure(err);
        self.failure = Some(kind);
        self.step = Step::Error;
        Ok(kind)
    }

    /// Re-enter synthesis with the same accumulated state.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        if self.step != Step::Error {
            return Err(self.invalid("retry"));
        }
        self.failure = None;
        self.step = Step::Synthesizing;
        Ok(())
    }

    /// Discard everything and return to [`Step::Start`].
    pub fn reset(&mut self) {
        *self = Self::new(self.questions.clone());
    }
}
