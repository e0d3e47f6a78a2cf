use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use steadyhand::types::{RoundSummary, ScoreRecord};

pub fn encouragement(score: u32) -> &'static str {
    if score > 15 {
        "Impressive! Rock steady."
    } else {
        "Keep practicing!"
    }
}

fn score_cell(value: Option<u32>) -> Cell {
    match value {
        Some(v) => Cell::new(v).set_alignment(CellAlignment::Right),
        None => Cell::new("—").set_alignment(CellAlignment::Right),
    }
}

pub fn print_results(summary: &RoundSummary, record: &ScoreRecord, saved: bool) {
    println!("\n🏁 === ROUND RESULTS === 🏁");

    let new_best = record.high_score == Some(summary.score) && summary.score > 0;

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["", "Score"]);
    table.add_row(vec![
        Cell::new("This round").add_attribute(Attribute::Bold),
        Cell::new(summary.score)
            .set_alignment(CellAlignment::Right)
            .fg(Color::Cyan),
    ]);
    // Like the results screen: the record line only shows once a
    // positive high score exists.
    if let Some(high) = record.high_score.filter(|h| *h > 0) {
        let mut cell = Cell::new(high).set_alignment(CellAlignment::Right);
        if new_best {
            cell = cell.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        table.add_row(vec![Cell::new("Best"), cell]);
    }
    table.add_row(vec![
        Cell::new("Stable seconds"),
        Cell::new(format!("{}/{}", summary.score, summary.duration_secs))
            .set_alignment(CellAlignment::Right),
    ]);
    println!("{table}");

    if new_best {
        println!("🏆 New high score!");
    }
    if summary.degraded {
        println!("⚠️  Sensors went silent during the round; score may be meaningless.");
    }
    if !saved {
        println!("⚠️  Score not saved.");
    }
    println!("{}", encouragement(summary.score));
}

pub fn print_scores(record: &ScoreRecord) {
    if record.last_score.is_none() {
        println!("\nNo rounds played yet — go play one first!");
        return;
    }

    println!("\n📊 === SCORES === 📊");
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["", "Score"]);
    table.add_row(vec![Cell::new("Last round"), score_cell(record.last_score)]);
    if record.high_score.filter(|h| *h > 0).is_some() {
        table.add_row(vec![
            Cell::new("Best").add_attribute(Attribute::Bold),
            score_cell(record.high_score),
        ]);
    }
    println!("{table}");
}
