use std::path::Path;

use verdant_core::{Band, Condition};

pub fn run(rules_path: Option<&Path>, json: bool) {
    let table = super::load_rules(rules_path);

    if json {
        println!("{}", serde_json::to_string_pretty(&table).unwrap());
        return;
    }

    println!("🌱 Advice rule table — {} rules, evaluated top to bottom", table.rules().len());
    println!();
    for rule in table.rules() {
        println!(
            "   {:<12} {:<12} {:<6} {}",
            rule.metric.to_string(),
            band_text(rule.band),
            condition_text(rule.condition),
            rule.tip,
        );
    }
    println!();
    println!("   Tune a copy: verdant rules --json > my-rules.json");
    println!("   Use it:      verdant watch --rules my-rules.json");
}

fn band_text(band: Band) -> String {
    match band {
        Band::Below { limit } => format!("< {limit}"),
        Band::Span { lo, hi } => format!("[{lo}, {hi})"),
        Band::Closed { lo, hi } => format!("[{lo}, {hi}]"),
        Band::AtLeast { limit } => format!(">= {limit}"),
        Band::Above { limit } => format!("> {limit}"),
    }
}

fn condition_text(condition: Condition) -> &'static str {
    match condition {
        Condition::Good => "good",
        Condition::Watch => "watch",
        Condition::Alert => "alert",
    }
}
