//! Shared formatting helpers for repoguard commands.

use repoguard_common::DiffReport;

/// Width of the rule-label column in comparison tables.
pub const LABEL_WIDTH: usize = 42;

/// Pad or truncate a label to the table column width.
pub fn pad_label(label: &str) -> String {
    if label.len() > LABEL_WIDTH {
        let mut out: String = label.chars().take(LABEL_WIDTH - 1).collect();
        out.push('…');
        out
    } else {
        format!("{label:<LABEL_WIDTH$}")
    }
}

/// One-line summary of a comparison report.
pub fn summarize_diff(report: &DiffReport) -> String {
    let changed = report.changed().count();
    if changed == 0 {
        "all rules match the baseline".to_string()
    } else {
        format!("{} of {} rules differ", changed, report.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repoguard_common::{desired_baseline, diff, normalize};

    #[test]
    fn test_pad_label_pads_short_labels() {
        let padded = pad_label("Lock branch");
        assert_eq!(padded.len(), LABEL_WIDTH);
        assert!(padded.starts_with("Lock branch"));
    }

    #[test]
    fn test_pad_label_truncates_long_labels() {
        let long = "x".repeat(LABEL_WIDTH + 10);
        let padded = pad_label(&long);
        assert_eq!(padded.chars().count(), LABEL_WIDTH);
        assert!(padded.ends_with('…'));
    }

    #[test]
    fn test_summarize_diff_counts_changes() {
        let desired = desired_baseline();
        assert_eq!(
            summarize_diff(&diff(&desired, &desired)),
            "all rules match the baseline"
        );

        let report = diff(&normalize(None, false), &desired);
        let summary = summarize_diff(&report);
        assert!(summary.ends_with("rules differ"), "got: {summary}");
    }
}
