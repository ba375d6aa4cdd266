use serde::{Deserialize, Serialize};

/// Outcome of evaluating document text against a jurisdiction's
/// requirement catalog.
///
/// `found` and `missing` partition the catalog's descriptor labels:
/// every label appears in exactly one of the two lists, in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Descriptor labels detected in the text.
    pub found_documents: Vec<String>,
    /// Descriptor labels not detected.
    pub missing_documents: Vec<String>,
    /// found / total, in [0, 1]. Zero when the catalog is empty.
    pub compliance_score: f64,
    /// Whether the score met the threshold; gates the summary stage.
    pub should_continue: bool,
    /// Number of distinct catalog keywords present in the text.
    /// Informational only.
    pub keywords_found: usize,
    pub total_required: usize,
    pub analysis: String,
}

/// Stage-2 contract: total function, never fails. An unknown jurisdiction
/// evaluates against an empty catalog (score 0, decision false).
pub trait Matcher {
    fn evaluate(&self, text: &str, jurisdiction: &str) -> MatchReport;
}

/// Wire shape of a remote matching service response.
///
/// Field names are the service contract; none of them are defaulted, so a
/// missing field is a parse failure rather than a silently wrong report.
#[derive(Debug, Deserialize)]
pub struct RemoteMatchReport {
    pub found_documents: Vec<String>,
    pub missing_documents: Vec<String>,
    pub compliance_score: f64,
    pub should_continue: bool,
    pub keywords_found: usize,
    pub total_required: usize,
    pub analysis: String,
}

impl RemoteMatchReport {
    /// Check the remote report against the local invariants before
    /// trusting it. A service that violates them is treated as broken.
    pub fn validated(self) -> Result<MatchReport, String> {
        if !(0.0..=1.0).contains(&self.compliance_score) {
            return Err(format!(
                "compliance_score {} outside [0, 1]",
                self.compliance_score
            ));
        }
        if self.found_documents.len() + self.missing_documents.len() != self.total_required {
            return Err(format!(
                "found ({}) + missing ({}) != total_required ({})",
                self.found_documents.len(),
                self.missing_documents.len(),
                self.total_required
            ));
        }
        if let Some(dup) = self
            .found_documents
            .iter()
            .find(|label| self.missing_documents.contains(label))
        {
            return Err(format!("label {dup:?} is both found and missing"));
        }

        Ok(MatchReport {
            found_documents: self.found_documents,
            missing_documents: self.missing_documents,
            compliance_score: self.compliance_score,
            should_continue: self.should_continue,
            keywords_found: self.keywords_found,
            total_required: self.total_required,
            analysis: self.analysis,
        })
    }
}
