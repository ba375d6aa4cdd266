//! Jurisdiction requirement catalog.
//!
//! Maps a jurisdiction code to an ordered list of required compliance
//! artifacts, each with a display label and match keywords. The table is
//! data (`assets/catalog.json`), not code; deployments may supply their own
//! via [`Catalog::from_json`]. Read-only after load; lookups never fail.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One named compliance artifact expected to appear in a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementDescriptor {
    /// Human-readable name, e.g. "Fire Safety NOC". Its whitespace tokens
    /// drive the found/missing decision.
    pub label: String,
    /// Lowercase phrases counted as keyword hits.
    pub keywords: BTreeSet<String>,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Alias '{alias}' points at unknown jurisdiction '{target}'")]
    DanglingAlias { alias: String, target: String },

    #[error("Jurisdiction '{0}' has a descriptor with an empty label")]
    EmptyLabel(String),
}

/// Jurisdiction-keyed requirement tables plus alias spellings ("in" → India).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    jurisdictions: BTreeMap<String, Vec<RequirementDescriptor>>,
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

static BUILTIN: LazyLock<Arc<Catalog>> = LazyLock::new(|| {
    let raw = include_str!("../assets/catalog.json");
    // The embedded asset is covered by tests; a parse failure here is a
    // packaging defect, not a runtime condition.
    Arc::new(Catalog::from_json(raw).expect("embedded catalog.json is well-formed"))
});

impl Catalog {
    /// The built-in table (India, UK, EU, US), parsed once per process.
    pub fn builtin() -> Arc<Catalog> {
        Arc::clone(&BUILTIN)
    }

    /// Parse and validate a deployment-supplied catalog.
    ///
    /// Keywords are normalized to lowercase; aliases must resolve to a
    /// declared jurisdiction.
    pub fn from_json(raw: &str) -> Result<Catalog, CatalogError> {
        let mut catalog: Catalog = serde_json::from_str(raw)?;

        for (jurisdiction, descriptors) in &mut catalog.jurisdictions {
            for descriptor in descriptors.iter_mut() {
                if descriptor.label.trim().is_empty() {
                    return Err(CatalogError::EmptyLabel(jurisdiction.clone()));
                }
                descriptor.keywords = descriptor
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
            }
        }

        let aliases: BTreeMap<String, String> = catalog
            .aliases
            .iter()
            .map(|(alias, target)| (alias.trim().to_lowercase(), target.clone()))
            .collect();
        for (alias, target) in &aliases {
            if !catalog.jurisdictions.contains_key(target) {
                return Err(CatalogError::DanglingAlias {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }
        catalog.aliases = aliases;

        Ok(catalog)
    }

    /// Requirement descriptors for a jurisdiction, in catalog order.
    ///
    /// Never fails: unknown jurisdictions return the empty slice, which the
    /// matcher turns into a 0/0 report. Matching is case-insensitive and
    /// alias-aware ("in", "IN", "India" all resolve to India).
    pub fn lookup(&self, jurisdiction: &str) -> &[RequirementDescriptor] {
        match self.resolve(jurisdiction) {
            Some(key) => &self.jurisdictions[key],
            None => &[],
        }
    }

    /// Aggregate keyword set across all of a jurisdiction's descriptors.
    pub fn keyword_set(&self, jurisdiction: &str) -> BTreeSet<&str> {
        self.lookup(jurisdiction)
            .iter()
            .flat_map(|d| d.keywords.iter().map(String::as_str))
            .collect()
    }

    /// Declared jurisdiction codes, in order.
    pub fn jurisdictions(&self) -> impl Iterator<Item = &str> {
        self.jurisdictions.keys().map(String::as_str)
    }

    fn resolve(&self, jurisdiction: &str) -> Option<&str> {
        let normalized = jurisdiction.trim().to_lowercase();
        if let Some(target) = self.aliases.get(&normalized) {
            return Some(target.as_str());
        }
        self.jurisdictions
            .keys()
            .find(|key| key.to_lowercase() == normalized)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin();
        let codes: Vec<&str> = catalog.jurisdictions().collect();
        assert!(codes.contains(&"India"));
        assert!(codes.contains(&"UK"));
        assert!(codes.contains(&"EU"));
        assert!(codes.contains(&"US"));
    }

    #[test]
    fn india_has_eight_requirements() {
        assert_eq!(Catalog::builtin().lookup("India").len(), 8);
    }

    #[test]
    fn uk_has_seven_requirements() {
        assert_eq!(Catalog::builtin().lookup("UK").len(), 7);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.lookup("india").len(), 8);
        assert_eq!(catalog.lookup("INDIA").len(), 8);
        assert_eq!(catalog.lookup("  uk  ").len(), 7);
    }

    #[test]
    fn aliases_resolve() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.lookup("IN").len(), 8);
        assert_eq!(catalog.lookup("gb").len(), 7);
        assert_eq!(catalog.lookup("United States").len(), 6);
    }

    #[test]
    fn unknown_jurisdiction_returns_empty() {
        let catalog = Catalog::builtin();
        assert!(catalog.lookup("Atlantis").is_empty());
        assert!(catalog.keyword_set("Atlantis").is_empty());
    }

    #[test]
    fn keyword_set_aggregates_across_descriptors() {
        let catalog = Catalog::builtin();
        let keywords = catalog.keyword_set("India");
        assert!(keywords.contains("building permit"));
        assert!(keywords.contains("noc"));
        assert!(keywords.contains("environmental clearance"));
    }

    #[test]
    fn keywords_normalized_to_lowercase() {
        let catalog = Catalog::from_json(
            r#"{
                "jurisdictions": {
                    "X": [{"label": "Some Doc", "keywords": ["Mixed Case", "  padded  "]}]
                }
            }"#,
        )
        .unwrap();
        let keywords = catalog.keyword_set("X");
        assert!(keywords.contains("mixed case"));
        assert!(keywords.contains("padded"));
    }

    #[test]
    fn dangling_alias_rejected() {
        let result = Catalog::from_json(
            r#"{
                "jurisdictions": {"X": []},
                "aliases": {"y": "Nowhere"}
            }"#,
        );
        assert!(matches!(result, Err(CatalogError::DanglingAlias { .. })));
    }

    #[test]
    fn empty_label_rejected() {
        let result = Catalog::from_json(
            r#"{
                "jurisdictions": {"X": [{"label": "   ", "keywords": []}]}
            }"#,
        );
        assert!(matches!(result, Err(CatalogError::EmptyLabel(_))));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
