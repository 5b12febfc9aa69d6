//! Plain-text report export — the downloadable artifact offered after an
//! analysis. Mirrors what the analysis screen shows: score, missing-keyword
//! block, suggestions block.

use crate::matching::MatchResult;

pub const REPORT_FILENAME: &str = "resume_analysis_report.txt";
pub const REPORT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Renders the full report. Score always with exactly 2 decimal places.
pub fn render_report(result: &MatchResult) -> String {
    let mut report = String::new();

    report.push_str("Resume Analysis Report\n");
    report.push_str("======================\n\n");
    report.push_str(&format!("Match Score: {:.2}%\n\n", result.score));

    report.push_str("Missing Keywords:\n");
    if result.missing_keywords.is_empty() {
        report.push_str("No missing keywords detected.\n");
    } else {
        for keyword in &result.missing_keywords {
            report.push_str(&format!("- {keyword}\n"));
        }
    }

    report.push_str("\nSuggestions:\n");
    report.push_str(&normalize_suggestion_lines(&result.suggestions));

    report
}

/// Re-normalizes free-form suggestion text into a bulleted block: each
/// non-empty line gets a "- " prefix unless it already starts with a bullet
/// marker (`-`, `*`) or a digit (assumed to be a numbered list entry).
/// Empty lines are dropped.
pub fn normalize_suggestion_lines(suggestions: &str) -> String {
    let mut out = String::new();
    for line in suggestions.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('-')
            || line.starts_with('*')
            || line.chars().next().is_some_and(|c| c.is_ascii_digit())
        {
            out.push_str(line);
        } else {
            out.push_str("- ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
