//! Prompt text and response schemas sent to the generation backend.

use serde_json::{json, Value};

use crate::model::{AnswerRecord, Language, QuestionSet};
use crate::scoring::DoshaTally;

/// Instructions for translating the full questionnaire in one call.
pub fn translation_prompt(questions: &QuestionSet, language: &Language) -> String {
    let listing = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let options = q
                .options
                .iter()
                .map(|o| format!("{}:{}", o.label, o.text))
                .collect::<Vec<_>>()
                .join(", ");
            format!("Q{}: {} | Options: {}", i + 1, q.text, options)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a revered Ayurvedic scholar. Translate the following Prakriti assessment into {language}.\n\
         Maintain a gentle, wise, and traditional tone. Use culturally appropriate terms.\n\n\
         Return a JSON array with one object per question, in the same order, each with \"text\" \
         and \"options\" (each option has \"label\" and \"text\"; keep the labels unchanged).\n\
         Original Questions:\n{listing}"
    )
}

/// Instructions for the final constitution report.
pub fn synthesis_prompt(language: &Language, tally: &DoshaTally, answers: &[AnswerRecord]) -> String {
    let inquiry = answers
        .iter()
        .map(|a| format!("{}: {}", a.category, a.answer))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Persona: Master Ayurvedic Vaidya.\n\
         Objective: Comprehensive Prakriti analysis for a seeker.\n\
         Language: {language}.\n\
         Scores: Vata({}), Pitta({}), Kapha({}).\n\
         Inquiry Details: {inquiry}.\n\n\
         Requirement:\n\
         Synthesize the Panchamahabhutas. Speak of Gunas and Dhatus.\n\
         JSON Structure:\n\
         - prakritiType: Sanskrit Name (English).\n\
         - explanation: Wise 6-line synthesis.\n\
         - detectedFacialFeatures: 3 Guna-based observations (only if a photo is attached).\n\
         - keyTraits: 4 characteristics.\n\
         - lifestyleAdvice: 5 Dinacharya tips.\n\
         - dietaryAdvice: 5 Ahara tips.",
        tally.vata, tally.pitta, tally.kapha
    )
}

/// Instructions for the quick photo clarity check.
pub const IMAGE_CHECK_PROMPT: &str = "Perform a quick Darsana (observation) analysis check.\n\
Is the image clear enough for facial feature observation?\n\
Return JSON: { \"isValid\": boolean, \"feedback\": \"string\" }";

pub fn translation_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "text": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "label": { "type": "STRING" },
                            "text": { "type": "STRING" }
                        },
                        "required": ["label", "text"]
                    }
                }
            },
            "required": ["text", "options"]
        }
    })
}

pub fn assessment_schema() -> Value {
    let strings = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "prakritiType": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "detectedFacialFeatures": strings.clone(),
            "keyTraits": strings.clone(),
            "lifestyleAdvice": strings.clone(),
            "dietaryAdvice": strings
        },
        "required": [
            "prakritiType",
            "explanation",
            "detectedFacialFeatures",
            "keyTraits",
            "lifestyleAdvice",
            "dietaryAdvice"
        ]
    })
}

pub fn validation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isValid": { "type": "BOOLEAN" },
            "feedback": { "type": "STRING" }
        },
        "required": ["isValid", "feedback"]
    })
}
