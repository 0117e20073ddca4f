//! Terminal output utilities

use foodshare_allergen::{DetectionReport, Safety};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Comma separated allergen list, or `-` when empty
pub fn format_allergens<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    let joined = names.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}

/// Print the verdict line for a report.
///
/// Verdicts go to stdout so they can be piped alongside the match list.
pub fn verdict(report: &DetectionReport) {
    match report.safety {
        Safety::Safe => println!("{} {}", "✓".green(), "Safe to consume".green().bold()),
        Safety::NotSafe => println!(
            "{} {} {}",
            "✗".red(),
            "Not safe:".red().bold(),
            format_allergens(&report.detected)
        ),
        Safety::Unknown => println!(
            "{} {}",
            "⚠".yellow(),
            "Allergen information unavailable".yellow().bold()
        ),
    }
}

/// Print a full human-readable report.
pub fn report(name: &str, report: &DetectionReport) {
    Status::header(name);
    verdict(report);
    for detection in &report.matches {
        println!(
            "  {} {} {}",
            "•".dimmed(),
            detection.allergen.bold(),
            format!("({} match on \"{}\")", detection.kind, detection.matched).dimmed()
        );
    }
    if !report.ingredients.is_empty() {
        Status::info(&format!(
            "Checked {}",
            format_count(report.ingredients.len(), "ingredient", "ingredients")
        ));
    }
}
