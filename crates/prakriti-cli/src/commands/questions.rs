//! The `prakriti questions` command.

use std::path::PathBuf;

use anyhow::Result;

use prakriti_core::model::TranslationBundle;
use prakriti_core::QuestionSet;
use prakriti_providers::config::load_config_from;

use super::{build_assessor, resolve_language};

pub async fn execute(language: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let language = resolve_language(language, &config)?;
    let questions = QuestionSet::standard();

    let bundle = if language.is_default() {
        TranslationBundle::from_questions(&questions)
    } else {
        build_assessor(&config, None)?
            .translate(&questions, &language)
            .await
    };

    for (i, (question, shown)) in questions.iter().zip(bundle.0.iter()).enumerate() {
        println!("{}. [{}] {}", i + 1, question.category, shown.text);
        for option in &shown.options {
            println!("   {}) {}", option.label, option.text);
        }
    }
    println!("\n{} questions ({language})", questions.len());

    Ok(())
}
