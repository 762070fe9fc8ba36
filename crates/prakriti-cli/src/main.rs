//! The `prakriti` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "prakriti", version, about = "Ayurvedic constitution (Prakriti) quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the questionnaire
    Questions {
        /// Language to show the questions in (e.g. "Hindi")
        #[arg(long)]
        language: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a set of answers offline
    Score {
        /// One letter per question, e.g. "ABCAB..." (whitespace and commas ignored)
        #[arg(long)]
        answers: String,
    },

    /// Check whether a photo is clear enough for the assessment
    CheckImage {
        /// Path to a JPEG, PNG or WebP photo
        #[arg(long)]
        image: PathBuf,

        /// Backend to use (default: from config)
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Take the quiz and synthesize a constitution report
    Assess {
        /// Answers as letters; asks interactively when omitted
        #[arg(long)]
        answers: Option<String>,

        /// Language for questions and report
        #[arg(long)]
        language: Option<String>,

        /// Optional face photo
        #[arg(long)]
        image: Option<PathBuf>,

        /// Backend to use (default: from config)
        #[arg(long)]
        provider: Option<String>,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a saved report
    Show {
        /// Report JSON written by `assess --format json --output ...`
        #[arg(long)]
        report: PathBuf,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter prakriti.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("prakriti=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Questions { language, config } => {
            commands::questions::execute(language, config).await
        }
        Commands::Score { answers } => commands::score::execute(answers),
        Commands::CheckImage {
            image,
            provider,
            config,
        } => commands::check_image::execute(image, provider, config).await,
        Commands::Assess {
            answers,
            language,
            image,
            provider,
            format,
            output,
            config,
        } => {
            commands::assess::execute(answers, language, image, provider, format, output, config)
                .await
        }
        Commands::Show { report, format } => commands::show::execute(report, format),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
