//! Assessment reports with JSON persistence and rendering.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AssessmentResult, Dosha, Language, ValidationResult};
use crate::profile::{profile, DoshaProfile};
use crate::scoring::DoshaTally;
use crate::session::QuizSession;

/// A completed assessment: scores plus the synthesized result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub language: Language,
    pub tally: DoshaTally,
    pub percentages: BTreeMap<Dosha, u32>,
    pub dominant: Vec<Dosha>,
    #[serde(default)]
    pub image_check: Option<ValidationResult>,
    pub result: AssessmentResult,
}

impl AssessmentReport {
    pub fn new(
        language: Language,
        tally: DoshaTally,
        result: AssessmentResult,
        image_check: Option<ValidationResult>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            language,
            tally,
            percentages: tally.percentages(),
            dominant: tally.dominant(),
            image_check,
            result,
        }
    }

    /// Build a report from a session that reached the result step.
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let result = session.result()?.clone();
        let mut report = Self::new(
            session.language().clone(),
            *session.tally(),
            result,
            session.image_check().cloned(),
        );
        report.id = session.id();
        Some(report)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }

    fn percent(&self, dosha: Dosha) -> u32 {
        self.percentages.get(&dosha).copied().unwrap_or(0)
    }

    /// Render the report as Markdown.
    pub fn to_markdown(&self) -> String {
        let r = &self.result;
        let mut md = String::new();

        let title = if r.prakriti_type.is_empty() {
            "Prakriti Assessment"
        } else {
            r.prakriti_type.as_str()
        };
        md.push_str(&format!("# {title}\n\n"));
        md.push_str(&format!(
            "_Language: {} · {}_\n\n",
            self.language,
            self.created_at.format("%Y-%m-%d %H:%M UTC")
        ));

        md.push_str("| Dosha | Count | Share |\n|-------|------:|------:|\n");
        for d in Dosha::BASE {
            let marker = if self.dominant.contains(&d) { " **dominant**" } else { "" };
            md.push_str(&format!(
                "| {d}{marker} | {} | {}% |\n",
                self.tally.count(d),
                self.percent(d)
            ));
        }
        md.push('\n');

        if !r.explanation.is_empty() {
            md.push_str(&format!("{}\n\n", r.explanation));
        }

        if let Some(features) = r.detected_features.as_ref().filter(|f| !f.is_empty()) {
            push_list(&mut md, "Observed Features", features);
        }

        for d in &self.dominant {
            if let Some(p) = profile(*d) {
                md.push_str(&format!("## {} ({})\n\n", p.title, p.elements));
                md.push_str(&format!(
                    "{} Qualities: {}.\n\n",
                    p.summary,
                    DoshaProfile::describe(p.qualities)
                ));
                md.push_str(&format!(
                    "Watch for: {}.\n\n",
                    DoshaProfile::describe(p.imbalances)
                ));
            }
        }

        push_list(&mut md, "Key Traits", &r.key_traits);
        push_list(&mut md, "Lifestyle (Dinacharya)", &r.lifestyle_advice);
        push_list(&mut md, "Diet (Ahara)", &r.dietary_advice);

        if let Some(check) = &self.image_check {
            let verdict = if check.is_valid { "accepted" } else { "unclear" };
            md.push_str(&format!("_Photo {verdict}: {}_\n", check.feedback));
        }

        md
    }

    /// Render the report as plain terminal text.
    pub fn to_text(&self) -> String {
        let r = &self.result;
        let mut out = String::new();

        if !r.prakriti_type.is_empty() {
            out.push_str(&format!("{}\n", r.prakriti_type));
        }
        for d in Dosha::BASE {
            let marker = if self.dominant.contains(&d) { "  (dominant)" } else { "" };
            out.push_str(&format!(
                "  {:<6} {:>2}  {:>3}%{marker}\n",
                d.as_str(),
                self.tally.count(d),
                self.percent(d)
            ));
        }
        if !r.explanation.is_empty() {
            out.push_str(&format!("\n{}\n", r.explanation));
        }
        for d in &self.dominant {
            if let Some(p) = profile(*d) {
                out.push_str(&format!("\n{} ({}): {}\n", p.title, p.elements, p.summary));
            }
        }

        let sections = [
            ("Key traits", r.key_traits.as_slice()),
            ("Lifestyle", r.lifestyle_advice.as_slice()),
            ("Diet", r.dietary_advice.as_slice()),
        ];
        for (heading, items) in sections.into_iter().filter(|(_, i)| !i.is_empty()) {
            out.push_str(&format!("\n{heading}:\n"));
            for item in items {
                out.push_str(&format!("  * {item}\n"));
            }
        }
        out
    }
}

fn push_list(md: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("## {heading}\n\n"));
    for item in items {
        md.push_str(&format!("- {item}\n"));
    }
    md.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionSet;

    fn sample() -> AssessmentReport {
        AssessmentReport::new(
            Language::english(),
            DoshaTally::new(9, 9, 7),
            AssessmentResult {
                prakriti_type: "Vata-Pitta (Air-Fire)".into(),
                explanation: "Swift mind, warm heart.".into(),
                detected_features: Some(vec!["bright eyes".into()]),
                key_traits: vec!["creative".into(), "driven".into()],
                lifestyle_advice: vec!["keep regular hours".into()],
                dietary_advice: vec!["favor warm cooked food".into()],
            },
            None,
        )
    }

    #[test]
    fn report_derives_scores_from_tally() {
        let report = sample();
        assert_eq!(report.percentages[&Dosha::Vata], 36);
        assert_eq!(report.percentages[&Dosha::Kapha], 28);
        assert_eq!(report.dominant, vec![Dosha::Vata, Dosha::Pitta]);
    }

    #[test]
    fn markdown_includes_dominant_profiles_only() {
        let md = sample().to_markdown();
        assert!(md.starts_with("# Vata-Pitta (Air-Fire)"));
        assert!(md.contains("| Vata **dominant** | 9 | 36% |"));
        assert!(md.contains("| Kapha | 7 | 28% |"));
        assert!(md.contains("The Vata Tattva (Ether & Air)"));
        assert!(md.contains("The Pitta Tattva (Fire & Water)"));
        assert!(!md.contains("The Kapha Tattva"));
        assert!(md.contains("- favor warm cooked food"));
        assert!(md.contains("## Observed Features"));
    }

    #[test]
    fn text_lists_scores_and_advice() {
        let text = sample().to_text();
        assert!(text.starts_with("Vata-Pitta (Air-Fire)\n"));
        assert!(text.contains("  Vata    9   36%  (dominant)"));
        assert!(text.contains("  Kapha   7   28%\n"));
        assert!(text.contains("Key traits:\n  * creative\n  * driven"));
        assert!(text.contains("The Pitta Tattva (Fire & Water)"));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/latest.json");
        let report = sample();
        report.save_json(&path).unwrap();

        let loaded = AssessmentReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.result, report.result);
        assert_eq!(loaded.tally, report.tally);
    }

    #[test]
    fn session_without_result_has_no_report() {
        let session = QuizSession::new(QuestionSet::standard());
        assert!(AssessmentReport::from_session(&session).is_none());
    }
}
