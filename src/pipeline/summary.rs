//! Verdict summary rendering.
//!
//! The summary is a deterministic template over the match report. It runs
//! only when the matcher decided to continue; stopped runs carry no
//! summary at all.

use std::sync::LazyLock;

use regex::Regex;

use super::matching::MatchReport;

/// Stage-3 contract: render a human-readable verdict from a report.
pub trait Summarizer {
    fn summarize(&self, report: &MatchReport) -> String;
}

/// Fixed-template summarizer. No external services, no variation between
/// runs with the same report.
pub struct TemplateSummarizer;

impl Summarizer for TemplateSummarizer {
    fn summarize(&self, report: &MatchReport) -> String {
        let status = if report.should_continue {
            "APPROVED"
        } else {
            "REVIEW REQUIRED"
        };

        let mut out = String::new();
        out.push_str(&format!("Compliance Verdict: {status}\n"));
        out.push_str(&format!(
            "Score: {:.1}% ({}/{} required documents)\n\n",
            report.compliance_score * 100.0,
            report.found_documents.len(),
            report.total_required
        ));

        if !report.found_documents.is_empty() {
            out.push_str("Documents found:\n");
            for label in &report.found_documents {
                out.push_str(&format!("  - {label}\n"));
            }
        }
        if !report.missing_documents.is_empty() {
            out.push_str("Documents missing:\n");
            for label in &report.missing_documents {
                out.push_str(&format!("  - {label}\n"));
            }
        }

        out.push_str(&format!("\nAnalysis: {}\n", report.analysis));

        out.push_str("\nNext steps:\n");
        if report.should_continue {
            out.push_str("  - Submission meets the documentation threshold\n");
            out.push_str("  - Proceed with the standard review workflow\n");
        } else {
            out.push_str("  - Collect the missing documents listed above\n");
            out.push_str("  - Resubmit for evaluation once complete\n");
        }

        out
    }
}

static SCORE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"compliance[_\s]score["\s]*:?["\s]*([0-9.]+)"#,
        r#"score["\s]*:?["\s]*([0-9.]+)"#,
        r"([0-9]+)%\s*compliant",
        r"([0-9.]+)\s*out\s*of\s*1",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("score pattern must compile"))
    .collect()
});

/// Pull a compliance score out of free-form analysis text, for logging.
/// Fractional values are reported as percentages; returns `None` when no
/// pattern matches or the capture is not a number.
pub fn extract_score(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    for pattern in SCORE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(&lowered) {
            let raw = captures.get(1)?.as_str();
            let value: f64 = raw.parse().ok()?;
            let percent = if value <= 1.0 { value * 100.0 } else { value };
            return Some(format!("{percent:.1}%"));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(found: Vec<&str>, missing: Vec<&str>, score: f64, decision: bool) -> MatchReport {
        let total = found.len() + missing.len();
        MatchReport {
            found_documents: found.into_iter().map(String::from).collect(),
            missing_documents: missing.into_iter().map(String::from).collect(),
            compliance_score: score,
            should_continue: decision,
            keywords_found: 2,
            total_required: total,
            analysis: format!("Found {}/{} required documents", total - 1, total),
        }
    }

    #[test]
    fn passing_report_is_approved() {
        let summary = TemplateSummarizer.summarize(&report(
            vec!["Building Permit", "Site Plan"],
            vec![],
            1.0,
            true,
        ));

        assert!(summary.contains("APPROVED"));
        assert!(summary.contains("100.0%"));
        assert!(summary.contains("- Building Permit"));
        assert!(summary.contains("standard review workflow"));
        assert!(!summary.contains("Documents missing"));
    }

    #[test]
    fn failing_report_asks_for_resubmission() {
        let summary = TemplateSummarizer.summarize(&report(
            vec!["Planning Permission"],
            vec!["Party Wall Agreement", "Drainage Plan"],
            0.33,
            false,
        ));

        assert!(summary.contains("REVIEW REQUIRED"));
        assert!(summary.contains("- Party Wall Agreement"));
        assert!(summary.contains("Resubmit"));
    }

    #[test]
    fn same_report_renders_identically() {
        let r = report(vec!["A"], vec!["B"], 0.5, false);
        assert_eq!(TemplateSummarizer.summarize(&r), TemplateSummarizer.summarize(&r));
    }

    // --- extract_score ---

    #[test]
    fn extracts_labeled_compliance_score() {
        assert_eq!(
            extract_score("The compliance_score: 0.875 was computed"),
            Some("87.5%".into())
        );
        assert_eq!(
            extract_score("\"compliance score\": \"0.7\""),
            Some("70.0%".into())
        );
    }

    #[test]
    fn extracts_bare_score() {
        assert_eq!(extract_score("score: 0.5"), Some("50.0%".into()));
    }

    #[test]
    fn extracts_percent_form() {
        assert_eq!(extract_score("the project is 85% compliant"), Some("85.0%".into()));
    }

    #[test]
    fn extracts_fraction_form() {
        assert_eq!(extract_score("rated 0.9 out of 1"), Some("90.0%".into()));
    }

    #[test]
    fn values_above_one_are_already_percentages() {
        assert_eq!(extract_score("score: 92.5"), Some("92.5%".into()));
    }

    #[test]
    fn no_score_yields_none() {
        assert_eq!(extract_score("no numbers of interest here"), None);
        assert_eq!(extract_score(""), None);
    }
}
