//! Deployment configuration: decision thresholds, external service
//! endpoints, and pipeline limits.
//!
//! Everything tunable lives here as a constant, a profile, or a `*_from_env`
//! accessor. Remote services are optional; a missing URL or key means the
//! deterministic local path runs instead.

use serde::Serialize;

/// Application-level constants
pub const APP_NAME: &str = "Veridoc";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timeout applied to every outbound HTTP call (match service, text service).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Minimum accepted document length, in characters, at job submission.
pub const MIN_DOCUMENT_LEN: usize = 10;

/// Which checklist regime this deployment runs under.
///
/// The two profiles differ only in their decision threshold; the matching
/// algorithm is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentProfile {
    /// Document-compliance checking (building permits and similar document
    /// sets). The canonical default.
    DocumentCompliance,
    /// General regulatory screening (whitepaper / framework checks).
    Regulatory,
}

impl DeploymentProfile {
    /// Minimum compliance score required to continue past the matching stage.
    pub fn threshold(&self) -> f64 {
        match self {
            Self::DocumentCompliance => 0.8,
            Self::Regulatory => 0.7,
        }
    }
}

impl Default for DeploymentProfile {
    fn default() -> Self {
        Self::DocumentCompliance
    }
}

/// Matcher configuration. The threshold is a parameter, never a literal in
/// the matching code.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MatcherConfig {
    pub threshold: f64,
}

impl MatcherConfig {
    pub fn from_profile(profile: DeploymentProfile) -> Self {
        Self {
            threshold: profile.threshold(),
        }
    }

    /// Profile threshold, overridable with `VERIDOC_THRESHOLD`.
    ///
    /// Out-of-range or unparseable overrides are ignored with a warning;
    /// a bad env var must not change the decision regime silently.
    pub fn from_env(profile: DeploymentProfile) -> Self {
        let mut config = Self::from_profile(profile);
        if let Ok(raw) = std::env::var("VERIDOC_THRESHOLD") {
            match raw.parse::<f64>() {
                Ok(t) if (0.0..=1.0).contains(&t) => config.threshold = t,
                _ => tracing::warn!(
                    value = %raw,
                    "Ignoring VERIDOC_THRESHOLD: not a number in [0, 1]"
                ),
            }
        }
        config
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::from_profile(DeploymentProfile::default())
    }
}

/// Remote compliance-scoring service endpoint, if configured.
pub fn match_service_url() -> Option<String> {
    non_empty_env("VERIDOC_MATCH_SERVICE_URL")
}

/// API key for the remote compliance-scoring service.
///
/// A configured URL without a key is a keyless state: the service is treated
/// as unavailable and the deterministic matcher runs.
pub fn match_service_key() -> Option<String> {
    non_empty_env("VERIDOC_MATCH_SERVICE_KEY")
}

/// Remote text-understanding service endpoint, if configured.
pub fn text_service_url() -> Option<String> {
    non_empty_env("VERIDOC_TEXT_SERVICE_URL")
}

/// Per-document page limit for PDF extraction.
///
/// Unset means no limit; the default deployment profile extracts every
/// page. Set `VERIDOC_MAX_PAGES` to cap it.
pub fn max_pages() -> Option<usize> {
    non_empty_env("VERIDOC_MAX_PAGES").and_then(|v| v.parse().ok())
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info"
}

fn non_empty_env(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_compliance_threshold() {
        assert_eq!(DeploymentProfile::DocumentCompliance.threshold(), 0.8);
    }

    #[test]
    fn regulatory_threshold() {
        assert_eq!(DeploymentProfile::Regulatory.threshold(), 0.7);
    }

    #[test]
    fn default_profile_is_document_compliance() {
        assert_eq!(
            DeploymentProfile::default(),
            DeploymentProfile::DocumentCompliance
        );
    }

    #[test]
    fn matcher_config_takes_profile_threshold() {
        let config = MatcherConfig::from_profile(DeploymentProfile::Regulatory);
        assert_eq!(config.threshold, 0.7);
    }

    #[test]
    fn default_matcher_config() {
        assert_eq!(MatcherConfig::default().threshold, 0.8);
    }

    #[test]
    fn app_name_is_veridoc() {
        assert_eq!(APP_NAME, "Veridoc");
    }

    #[test]
    fn profile_serializes_snake_case() {
        let json = serde_json::to_string(&DeploymentProfile::DocumentCompliance).unwrap();
        assert_eq!(json, "\"document_compliance\"");
    }
}
