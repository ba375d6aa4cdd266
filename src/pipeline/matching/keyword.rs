//! Deterministic keyword matcher.
//!
//! Evaluation is pure string containment over a lowercased copy of the
//! text: a descriptor counts as found when any whitespace token of its
//! label occurs as a substring. This is deliberately crude and stable;
//! "plan" matching inside "planning" is accepted behavior, not a bug to
//! fix, because downstream consumers depend on the exact scores.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::{DeploymentProfile, MatcherConfig};

use super::types::{MatchReport, Matcher};

/// Catalog-driven matcher; the decision threshold comes from
/// [`MatcherConfig`].
pub struct KeywordMatcher {
    catalog: Arc<Catalog>,
    config: MatcherConfig,
}

impl KeywordMatcher {
    pub fn new(catalog: Arc<Catalog>, config: MatcherConfig) -> Self {
        Self { catalog, config }
    }

    /// Matcher over the compiled-in catalog, threshold from the
    /// environment (or the profile default).
    pub fn builtin() -> Self {
        Self::new(
            Catalog::builtin(),
            MatcherConfig::from_env(DeploymentProfile::default()),
        )
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }
}

impl Matcher for KeywordMatcher {
    fn evaluate(&self, text: &str, jurisdiction: &str) -> MatchReport {
        let lowered = text.to_lowercase();
        let descriptors = self.catalog.lookup(jurisdiction);
        let total_required = descriptors.len();

        // Each keyword of the jurisdiction's aggregate set contributes at
        // most one hit, however often it occurs in the text.
        let keywords_found = self
            .catalog
            .keyword_set(jurisdiction)
            .into_iter()
            .filter(|keyword| lowered.contains(*keyword))
            .count();

        let mut found_documents = Vec::new();
        let mut missing_documents = Vec::new();

        for descriptor in descriptors {
            let label_lowered = descriptor.label.to_lowercase();
            let present = label_lowered
                .split_whitespace()
                .any(|token| lowered.contains(token));
            if present {
                found_documents.push(descriptor.label.clone());
            } else {
                missing_documents.push(descriptor.label.clone());
            }
        }

        let compliance_score = if total_required == 0 {
            0.0
        } else {
            found_documents.len() as f64 / total_required as f64
        };
        let should_continue = compliance_score >= self.config.threshold;

        let analysis = format!(
            "Found {}/{} required documents",
            found_documents.len(),
            total_required
        );

        tracing::info!(
            jurisdiction = %jurisdiction,
            score = compliance_score,
            found = found_documents.len(),
            total = total_required,
            should_continue,
            "Keyword evaluation complete"
        );

        MatchReport {
            found_documents,
            missing_documents,
            compliance_score,
            should_continue,
            keywords_found,
            total_required,
            analysis,
        }
    }
}
