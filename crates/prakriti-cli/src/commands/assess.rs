//! The `prakriti assess` command.
//!
//! Drives one [`QuizSession`] from language selection to a rendered report.
//! With `--answers` the run is non-interactive; otherwise every question, the
//! photo confirmation and the retry decision are read from stdin.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use prakriti_core::model::ImagePayload;
use prakriti_core::report::AssessmentReport;
use prakriti_core::scoring::{option_index, parse_selections};
use prakriti_core::{Assessor, Language, QuestionSet, QuizSession, Step};
use prakriti_providers::config::load_config_from;

use super::show::render;
use super::{build_assessor, load_image, resolve_language};

/// How a synthesis round ended.
enum Outcome {
    Done,
    /// The user chose to discard the session after a failure.
    StartOver,
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    answers: Option<String>,
    language: Option<String>,
    image_path: Option<PathBuf>,
    provider: Option<String>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "markdown" | "md" | "json"),
        "unknown format '{format}', expected text, markdown or json"
    );

    let config = load_config_from(config_path.as_deref())?;
    let language = resolve_language(language, &config)?;
    let questions = QuestionSet::standard();

    // Validate scripted answers before any remote call.
    let scripted = match &answers {
        Some(a) => {
            let selections = parse_selections(a)?;
            anyhow::ensure!(
                selections.len() == questions.len(),
                "expected {} answers, got {}",
                questions.len(),
                selections.len()
            );
            Some(selections)
        }
        None => None,
    };
    let image = image_path.as_deref().map(load_image).transpose()?;

    let assessor = build_assessor(&config, provider.as_deref())?;
    let mut session = QuizSession::new(questions);
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        prepare(
            &mut session,
            &assessor,
            &language,
            image.clone(),
            scripted.is_none(),
            &mut input,
        )
        .await?;

        match &scripted {
            Some(selections) => {
                for &option in selections {
                    session.answer(option)?;
                }
            }
            None => ask_questions(&mut session, &mut input)?,
        }

        match synthesize(&mut session, &assessor, scripted.is_none(), &mut input).await? {
            Outcome::Done => break,
            Outcome::StartOver => {
                session.reset();
                eprintln!("\nStarting over.\n");
            }
        }
    }

    let report = AssessmentReport::from_session(&session)
        .context("session finished without a result")?;

    match output {
        Some(path) if format == "json" => {
            report.save_json(&path)?;
            eprintln!("Report saved to: {}", path.display());
        }
        Some(path) => {
            std::fs::write(&path, render(&report, &format)?)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("Report saved to: {}", path.display());
        }
        None => println!("{}", render(&report, &format)?),
    }

    Ok(())
}

/// Select the language, then translate and check the photo concurrently.
async fn prepare(
    session: &mut QuizSession,
    assessor: &Assessor,
    language: &Language,
    image: Option<ImagePayload>,
    interactive: bool,
    input: &mut impl BufRead,
) -> Result<()> {
    session.select_language(language.clone())?;

    // Translated text is only ever displayed, so scripted runs skip it.
    let translate = async {
        if interactive && !language.is_default() {
            Some(assessor.translate(session.questions(), language).await)
        } else {
            None
        }
    };
    let check = async {
        match &image {
            Some(img) => Some(assessor.check_quality(img).await),
            None => None,
        }
    };
    let (bundle, verdict) = tokio::join!(translate, check);

    if let Some(bundle) = bundle {
        if !session.apply_translation(language, bundle) {
            tracing::warn!("translation arrived too late and was dropped");
        }
    }

    if let (Some(img), Some(verdict)) = (image, verdict) {
        session.capture_image(img.clone())?;
        let accepted = verdict.is_valid;
        eprintln!(
            "Photo {}: {}",
            if accepted { "accepted" } else { "unclear" },
            verdict.feedback
        );
        session.apply_image_check(&img, verdict);
        if !accepted && interactive && !confirm("Use this photo anyway? [y/N] ", input)? {
            session.discard_image()?;
        }
    }

    session.begin_answering()?;
    Ok(())
}

fn ask_questions(session: &mut QuizSession, input: &mut impl BufRead) -> Result<()> {
    let total = session.questions().len();
    while let Some(shown) = session.current_display() {
        let Step::Answering { index } = session.step() else {
            break;
        };
        eprintln!("\n[{}/{}] {}", index + 1, total, shown.text);
        for option in &shown.options {
            eprintln!("  {}) {}", option.label, option.text);
        }

        loop {
            let line = prompt("> ", input)?
                .context("input ended before the quiz was complete")?;
            let choice = line.trim().chars().next().and_then(option_index);
            match choice.map(|c| session.answer(c)) {
                Some(Ok(_)) => break,
                Some(Err(e)) => eprintln!("{e}"),
                None => eprintln!("Please answer A, B or C."),
            }
        }
    }
    Ok(())
}

/// Run synthesis until it succeeds or the user stops retrying.
async fn synthesize(
    session: &mut QuizSession,
    assessor: &Assessor,
    interactive: bool,
    input: &mut impl BufRead,
) -> Result<Outcome> {
    loop {
        eprintln!("\nSynthesizing your constitution...");
        let outcome = assessor
            .synthesize(
                session.language(),
                session.tally(),
                session.answers(),
                session.image(),
            )
            .await;

        let err = match outcome {
            Ok(result) => {
                session.complete(result)?;
                return Ok(Outcome::Done);
            }
            Err(err) => err,
        };

        let kind = session.fail(&err)?;
        eprintln!("{}", kind.user_message());
        if !interactive {
            return Err(err.context(kind.user_message()));
        }

        match prompt("[r] retry  [q] start over > ", input)? {
            Some(line) if line.trim().eq_ignore_ascii_case("r") => session.retry()?,
            Some(line) if line.trim().eq_ignore_ascii_case("q") => {
                return Ok(Outcome::StartOver)
            }
            _ => return Err(err.context(kind.user_message())),
        }
    }
}

/// Print `message` and read one line; `None` at end of input.
fn prompt(message: &str, input: &mut impl BufRead) -> Result<Option<String>> {
    eprint!("{message}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn confirm(message: &str, input: &mut impl BufRead) -> Result<bool> {
    Ok(prompt(message, input)?.is_some_and(|l| l.trim().eq_ignore_ascii_case("y")))
}
