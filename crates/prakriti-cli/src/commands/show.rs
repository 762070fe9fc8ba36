//! The `prakriti show` command.

use std::path::PathBuf;

use anyhow::Result;

use prakriti_core::report::AssessmentReport;

pub fn execute(report_path: PathBuf, format: String) -> Result<()> {
    let report = AssessmentReport::load_json(&report_path)?;
    println!("{}", render(&report, &format)?);
    Ok(())
}

/// Render a report in one of the supported output formats.
pub fn render(report: &AssessmentReport, format: &str) -> Result<String> {
    match format {
        "text" => Ok(report.to_text()),
        "markdown" | "md" => Ok(report.to_markdown()),
        "json" => Ok(serde_json::to_string_pretty(report)?),
        other => anyhow::bail!("unknown format '{other}', expected text, markdown or json"),
    }
}
