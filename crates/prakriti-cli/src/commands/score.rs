//! The `prakriti score` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use prakriti_core::model::Dosha;
use prakriti_core::scoring::{parse_selections, DOMINANCE_THRESHOLD_PERCENT};
use prakriti_core::{score, QuestionSet};

pub fn execute(answers: String) -> Result<()> {
    let questions = QuestionSet::standard();
    let selections = parse_selections(&answers)?;
    anyhow::ensure!(
        selections.len() == questions.len(),
        "expected {} answers, got {}",
        questions.len(),
        selections.len()
    );

    let sheet = score(&questions, &selections);
    let tally = sheet.tally;

    let mut table = Table::new();
    table.set_header(vec!["Dosha", "Count", "Share", "Dominant"]);
    for d in Dosha::BASE {
        table.add_row(vec![
            Cell::new(d),
            Cell::new(tally.count(d)),
            Cell::new(format!("{}%", tally.percentage(d))),
            Cell::new(if tally.is_dominant(d) { "yes" } else { "" }),
        ]);
    }
    println!("{table}");

    let dominant: Vec<&str> = tally.dominant().iter().map(|d| d.as_str()).collect();
    if dominant.is_empty() {
        println!("No dosha reaches {DOMINANCE_THRESHOLD_PERCENT}%");
    } else {
        println!("Dominant: {}", dominant.join(", "));
    }

    Ok(())
}
