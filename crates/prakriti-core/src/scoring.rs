//! Dosha scoring: tallies, percentages, and dominance.
//!
//! Scoring is pure. Each answered question increments exactly one base
//! dosha, so the tally total always equals the number of answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerRecord, Dosha, QuestionSet, OPTIONS_PER_QUESTION};

/// A dosha is dominant when its share of the total reaches this percentage.
pub const DOMINANCE_THRESHOLD_PERCENT: u32 = 35;

/// Per-dosha answer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoshaTally {
    pub vata: u32,
    pub pitta: u32,
    pub kapha: u32,
}

impl DoshaTally {
    pub fn new(vata: u32, pitta: u32, kapha: u32) -> Self {
        Self { vata, pitta, kapha }
    }

    /// Count one answer. Composite tags are not counted; the question set
    /// guarantees options only carry base tags.
    pub fn record(&mut self, dosha: Dosha) {
        match dosha {
            Dosha::Vata => self.vata += 1,
            Dosha::Pitta => self.pitta += 1,
            Dosha::Kapha => self.kapha += 1,
            other => tracing::warn!(dosha = %other, "ignoring composite dosha in tally"),
        }
    }

    pub fn count(&self, dosha: Dosha) -> u32 {
        match dosha {
            Dosha::Vata => self.vata,
            Dosha::Pitta => self.pitta,
            Dosha::Kapha => self.kapha,
            _ => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.vata + self.pitta + self.kapha
    }

    /// `round(100 * count / total)`, or 0 before anything is answered.
    ///
    /// Each dosha is rounded independently, so the three percentages need
    /// not sum to 100.
    pub fn percentage(&self, dosha: Dosha) -> u32 {
        let total = u64::from(self.total());
        if total == 0 {
            return 0;
        }
        let count = u64::from(self.count(dosha));
        // Round half up in integer arithmetic.
        ((200 * count + total) / (2 * total)) as u32
    }

    pub fn percentages(&self) -> BTreeMap<Dosha, u32> {
        Dosha::BASE
            .iter()
            .map(|d| (*d, self.percentage(*d)))
            .collect()
    }

    pub fn is_dominant(&self, dosha: Dosha) -> bool {
        self.total() > 0 && self.percentage(dosha) >= DOMINANCE_THRESHOLD_PERCENT
    }

    /// Every dominant dosha, in Vata, Pitta, Kapha order. May be empty or
    /// hold several entries.
    pub fn dominant(&self) -> Vec<Dosha> {
        Dosha::BASE
            .into_iter()
            .filter(|d| self.is_dominant(*d))
            .collect()
    }
}

/// Result of scoring a sequence of selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub tally: DoshaTally,
    pub answers: Vec<AnswerRecord>,
}

impl ScoreSheet {
    /// Apply the selection for question `index` of `questions`.
    ///
    /// # Panics
    ///
    /// Panics if `index` or `option` is out of range.
    pub fn apply(&mut self, questions: &QuestionSet, index: usize, option: usize) {
        let question = &questions.as_slice()[index];
        let chosen = &question.options[option];
        self.tally.record(chosen.dosha);
        self.answers.push(AnswerRecord {
            category: question.category.clone(),
            answer: chosen.text.clone(),
        });
    }
}

/// Score selections against the question set, in order.
///
/// `selections[i]` is the chosen option index for question `i`. Selections
/// past the end of the question set are ignored.
///
/// # Panics
///
/// Panics if a selection is not a valid option index; callers expose only
/// valid indices.
pub fn score(questions: &QuestionSet, selections: &[usize]) -> ScoreSheet {
    let mut sheet = ScoreSheet::default();
    for (index, &option) in selections.iter().take(questions.len()).enumerate() {
        sheet.apply(questions, index, option);
    }
    sheet
}

/// Error returned by [`parse_selections`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid answer '{found}' at position {position}, expected A, B or C")]
pub struct SelectionParseError {
    pub position: usize,
    pub found: char,
}

/// Parse answer letters such as `"ABCA B,C"` into option indices.
///
/// Letters are case-insensitive; whitespace and commas are ignored.
pub fn parse_selections(input: &str) -> Result<Vec<usize>, SelectionParseError> {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .enumerate()
        .map(|(position, c)| {
            option_index(c).ok_or(SelectionParseError {
                position: position + 1,
                found: c,
            })
        })
        .collect()
}

/// Map an option letter to its index.
pub fn option_index(letter: char) -> Option<usize> {
    let idx = (letter.to_ascii_uppercase() as usize).checked_sub('A' as usize)?;
    (idx < OPTIONS_PER_QUESTION).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selections_for(tally: DoshaTally) -> Vec<usize> {
        let mut s = Vec::new();
        s.extend(std::iter::repeat(0).take(tally.vata as usize));
        s.extend(std::iter::repeat(1).take(tally.pitta as usize));
        s.extend(std::iter::repeat(2).take(tally.kapha as usize));
        s
    }

    #[test]
    fn all_vata_answers() {
        let questions = QuestionSet::standard();
        let sheet = score(&questions, &[0; 25]);
        assert_eq!(sheet.tally, DoshaTally::new(25, 0, 0));
        assert_eq!(sheet.tally.percentage(Dosha::Vata), 100);
        assert_eq!(sheet.tally.percentage(Dosha::Pitta), 0);
        assert!(sheet.tally.is_dominant(Dosha::Vata));
        assert!(!sheet.tally.is_dominant(Dosha::Pitta));
        assert!(!sheet.tally.is_dominant(Dosha::Kapha));
        assert_eq!(sheet.tally.dominant(), vec![Dosha::Vata]);
    }

    #[test]
    fn mixed_answers_allow_two_dominant() {
        let questions = QuestionSet::standard();
        let sheet = score(&questions, &selections_for(DoshaTally::new(9, 9, 7)));
        assert_eq!(sheet.tally.total(), 25);
        let pct = sheet.tally.percentages();
        assert_eq!(pct[&Dosha::Vata], 36);
        assert_eq!(pct[&Dosha::Pitta], 36);
        assert_eq!(pct[&Dosha::Kapha], 28);
        assert_eq!(sheet.tally.dominant(), vec![Dosha::Vata, Dosha::Pitta]);
    }

    #[test]
    fn tally_sum_matches_answers() {
        let questions = QuestionSet::standard();
        let selections: Vec<usize> = (0..25).map(|i| (i * 7 + i / 3) % 3).collect();
        let sheet = score(&questions, &selections);
        assert_eq!(sheet.tally.total(), 25);
        assert_eq!(sheet.answers.len(), 25);
        for (i, dosha) in Dosha::BASE.iter().enumerate() {
            let expected = selections.iter().filter(|s| **s == i).count() as u32;
            assert_eq!(sheet.tally.count(*dosha), expected);
        }
    }

    #[test]
    fn empty_tally_has_zero_percent_and_no_dominance() {
        let tally = DoshaTally::default();
        for d in Dosha::BASE {
            assert_eq!(tally.percentage(d), 0);
            assert!(!tally.is_dominant(d));
        }
        assert!(tally.dominant().is_empty());
    }

    #[test]
    fn dominance_threshold_boundary() {
        // 7/20 = 35% exactly
        let at = DoshaTally::new(7, 7, 6);
        assert_eq!(at.percentage(Dosha::Vata), 35);
        assert!(at.is_dominant(Dosha::Vata));
        // 6/20 = 30%
        assert!(!at.is_dominant(Dosha::Kapha));
        // 17/50 = 34%
        let below = DoshaTally::new(17, 17, 16);
        assert_eq!(below.percentage(Dosha::Vata), 34);
        assert!(!below.is_dominant(Dosha::Vata));
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1/8 = 12.5%
        let tally = DoshaTally::new(1, 7, 0);
        assert_eq!(tally.percentage(Dosha::Vata), 13);
        // 2/3 = 66.67%, 1/3 = 33.33%
        let thirds = DoshaTally::new(2, 1, 0);
        assert_eq!(thirds.percentage(Dosha::Vata), 67);
        assert_eq!(thirds.percentage(Dosha::Pitta), 33);
    }

    #[test]
    fn composite_tags_are_not_counted() {
        let mut tally = DoshaTally::default();
        tally.record(Dosha::Tridosha);
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.count(Dosha::Tridosha), 0);
    }

    #[test]
    fn answer_records_follow_answer_order() {
        let questions = QuestionSet::standard();
        let sheet = score(&questions, &[2, 1]);
        assert_eq!(sheet.answers.len(), 2);
        assert_eq!(sheet.answers[0].category, "Skin Texture");
        assert_eq!(sheet.answers[0].answer, "Thick, moist, smooth, and supple");
        assert_eq!(sheet.answers[1].category, "Skin Temperature");
        assert_eq!(sheet.answers[1].answer, "Warm or hot most of the time");
    }

    #[test]
    fn extra_selections_are_ignored() {
        let questions = QuestionSet::standard();
        let sheet = score(&questions, &[1; 30]);
        assert_eq!(sheet.tally.pitta, 25);
    }

    #[test]
    fn parse_selection_letters() {
        assert_eq!(parse_selections("ab C,a").unwrap(), vec![0, 1, 2, 0]);
        assert_eq!(parse_selections("").unwrap(), Vec::<usize>::new());
        let err = parse_selections("ABD").unwrap_err();
        assert_eq!(err.position, 3);
        assert_eq!(err.found, 'D');
        assert_eq!(option_index('@'), None);
    }
}
