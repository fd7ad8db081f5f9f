//! Pure formatting functions for UI output.
//!
//! Each `display_*` function prints what the matching `format_*` function
//! renders, so the rendering itself is testable.

use crate::action::ActionReport;
use crate::domain::{Label, VersionBump};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// One line per label: full name, color and full description
pub fn format_labels(labels: &[Label]) -> String {
    let width = labels
        .iter()
        .map(|l| l.full_name.chars().count())
        .max()
        .unwrap_or(0);
    labels
        .iter()
        .map(|label| {
            format!(
                "  {:width$}  #{}  {}\n",
                label.full_name,
                label.color,
                label.full_description,
                width = width
            )
        })
        .collect()
}

/// Display the resolved labels of one categorization.
pub fn display_labels(categorization: &str, labels: &[Label]) {
    println!("\x1b[1mLabels of '{}':\x1b[0m", categorization);
    if labels.is_empty() {
        println!("  (none)");
    } else {
        print!("{}", format_labels(labels));
    }
}

pub fn format_bump(bump: Option<VersionBump>) -> String {
    match bump {
        Some(bump) => bump.to_string(),
        None => "none".to_string(),
    }
}

/// Display the version bump resolved from a set of type values.
pub fn display_bump(bump: Option<VersionBump>) {
    println!("{}", format_bump(bump));
}

fn names(labels: &[Label]) -> String {
    if labels.is_empty() {
        "-".to_string()
    } else {
        labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn format_report(report: &ActionReport) -> String {
    let mut out = format!(
        "\x1b[1mPull request #{}\x1b[0m {} ({})\n",
        report.pull_request.number, report.pull_request.title, report.repository
    );
    out.push_str(&format!(
        "  Issue:      #{} {} [{}]\n",
        report.issue.number, report.issue.title, report.branch.name
    ));
    out.push_str(&format!("  Types:      {}\n", names(&report.types)));
    out.push_str(&format!("  Components: {}\n", names(&report.components)));
    out.push_str(&format!("  Priorities: {}\n", names(&report.priorities)));
    if !report.unknown_labels.is_empty() {
        out.push_str(&format!(
            "  Other:      {}\n",
            report.unknown_labels.join(", ")
        ));
    }
    out.push_str(&format!("  Bump:       {}\n", format_bump(report.bump)));
    if let Some(next) = &report.next_version {
        out.push_str(&format!("  Next:       \x1b[32m{}\x1b[0m\n", next));
    }
    out
}

/// Display what the CI entry point resolved for a pull request.
pub fn display_report(report: &ActionReport) {
    print!("{}", format_report(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategorizationConfig;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_format_labels_aligns_names() {
        let labels = CategorizationConfig::default().all_resolved("type").unwrap();
        let rendered = format_labels(&labels);

        assert_eq!(rendered.lines().count(), labels.len());
        assert!(rendered.contains("T: feat      #c5def5  Type: :tada: New Features"));
    }

    #[test]
    fn test_format_bump() {
        assert_eq!(format_bump(Some(VersionBump::Breaking)), "breaking");
        assert_eq!(format_bump(None), "none");
    }
}
