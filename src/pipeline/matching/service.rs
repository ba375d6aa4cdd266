//! Remote matching service client and the fallback decorator.
//!
//! A deployment may delegate evaluation to an external service. The
//! delegation is best-effort only: any failure, from a missing API key to
//! a response that violates the report invariants, drops silently to the
//! local keyword matcher. Callers never see a service error.

use serde::Serialize;

use super::keyword::KeywordMatcher;
use super::types::{MatchReport, Matcher, RemoteMatchReport};
use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error("No API key configured for the matching service")]
    MissingCredentials,

    #[error("Matching service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Matching service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response parsing error: {0}")]
    Parse(String),

    #[error("Remote report failed validation: {0}")]
    Invalid(String),
}

/// Remote evaluation abstraction (allows mocking).
pub trait MatchService {
    fn evaluate_remote(
        &self,
        text: &str,
        jurisdiction: &str,
    ) -> Result<MatchReport, MatchServiceError>;
}

#[derive(Serialize)]
struct EvaluateRequest<'a> {
    text: &'a str,
    jurisdiction: &'a str,
}

/// HTTP client for the matching service. Requires both a base URL and an
/// API key; a URL without a key fails every call with
/// [`MatchServiceError::MissingCredentials`].
pub struct HttpMatchService {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpMatchService {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            timeout_secs,
        }
    }

    /// Service from `VERIDOC_MATCH_SERVICE_URL` and
    /// `VERIDOC_MATCH_SERVICE_KEY`; `None` when no URL is configured.
    pub fn from_env() -> Option<Self> {
        config::match_service_url().map(|url| {
            Self::new(
                &url,
                config::match_service_key(),
                config::DEFAULT_TIMEOUT_SECS,
            )
        })
    }
}

impl MatchService for HttpMatchService {
    fn evaluate_remote(
        &self,
        text: &str,
        jurisdiction: &str,
    ) -> Result<MatchReport, MatchServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MatchServiceError::MissingCredentials)?;

        let url = format!("{}/v1/evaluate", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&EvaluateRequest { text, jurisdiction })
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    MatchServiceError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    MatchServiceError::Timeout(self.timeout_secs)
                } else {
                    MatchServiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MatchServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let remote: RemoteMatchReport = response
            .json()
            .map_err(|e| MatchServiceError::Parse(e.to_string()))?;
        remote.validated().map_err(MatchServiceError::Invalid)
    }
}

/// Matcher that tries the remote service first and falls back to the
/// local keyword matcher on any failure. The fallback is silent: the
/// failure is logged and the local report is returned as-is.
pub struct ServiceMatcher {
    service: Box<dyn MatchService + Send + Sync>,
    local: KeywordMatcher,
}

impl ServiceMatcher {
    pub fn new(service: Box<dyn MatchService + Send + Sync>, local: KeywordMatcher) -> Self {
        Self { service, local }
    }
}

impl Matcher for ServiceMatcher {
    fn evaluate(&self, text: &str, jurisdiction: &str) -> MatchReport {
        match self.service.evaluate_remote(text, jurisdiction) {
            Ok(report) => {
                tracing::info!(
                    jurisdiction = %jurisdiction,
                    score = report.compliance_score,
                    "Remote evaluation accepted"
                );
                report
            }
            Err(e) => {
                tracing::warn!(error = %e, "Matching service failed; using keyword matcher");
                self.local.evaluate(text, jurisdiction)
            }
        }
    }
}

/// Mock matching service for tests.
pub enum MockMatchService {
    /// Returns the configured report.
    Ok(Box<MatchReport>),
    /// Returns a raw body that fails to parse as a report.
    Malformed(String),
    /// Fails as if the service were down.
    Unreachable,
    /// Fails as if no API key were configured.
    Keyless,
}

impl MatchService for MockMatchService {
    fn evaluate_remote(
        &self,
        _text: &str,
        _jurisdiction: &str,
    ) -> Result<MatchReport, MatchServiceError> {
        match self {
            Self::Ok(report) => Ok(report.as_ref().clone()),
            Self::Malformed(body) => {
                let remote: RemoteMatchReport = serde_json::from_str(body)
                    .map_err(|e| MatchServiceError::Parse(e.to_string()))?;
                remote.validated().map_err(MatchServiceError::Invalid)
            }
            Self::Unreachable => Err(MatchServiceError::Connection("http://mock".into())),
            Self::Keyless => Err(MatchServiceError::MissingCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::MatcherConfig;

    fn local() -> KeywordMatcher {
        KeywordMatcher::new(Catalog::builtin(), MatcherConfig { threshold: 0.8 })
    }

    fn remote_report() -> MatchReport {
        MatchReport {
            found_documents: vec!["Building Permit".into()],
            missing_documents: vec![],
            compliance_score: 1.0,
            should_continue: true,
            keywords_found: 4,
            total_required: 1,
            analysis: "remote analysis".into(),
        }
    }

    #[test]
    fn accepts_valid_remote_report() {
        let matcher = ServiceMatcher::new(
            Box::new(MockMatchService::Ok(Box::new(remote_report()))),
            local(),
        );
        let report = matcher.evaluate("irrelevant", "India");
        assert_eq!(report.analysis, "remote analysis");
        assert_eq!(report.compliance_score, 1.0);
    }

    #[test]
    fn unreachable_service_falls_back_to_keyword_matcher() {
        let text = "Building permit issued. Fire safety NOC obtained.";
        let fallback = ServiceMatcher::new(Box::new(MockMatchService::Unreachable), local())
            .evaluate(text, "India");
        let direct = local().evaluate(text, "India");

        assert_eq!(fallback.found_documents, direct.found_documents);
        assert_eq!(fallback.compliance_score, direct.compliance_score);
        assert_eq!(fallback.analysis, direct.analysis);
    }

    #[test]
    fn malformed_response_falls_back() {
        let matcher = ServiceMatcher::new(
            Box::new(MockMatchService::Malformed("{\"not\": \"a report\"}".into())),
            local(),
        );
        let report = matcher.evaluate("Building permit issued.", "India");

        // Local report shape, not a propagated error.
        assert_eq!(report.total_required, 8);
        assert!(report
            .found_documents
            .iter()
            .any(|label| label == "Building Permit"));
    }

    #[test]
    fn invariant_violating_response_falls_back() {
        let body = serde_json::json!({
            "found_documents": ["A"],
            "missing_documents": [],
            "compliance_score": 7.5,
            "should_continue": true,
            "keywords_found": 1,
            "total_required": 1,
            "analysis": "bogus"
        })
        .to_string();
        let matcher = ServiceMatcher::new(Box::new(MockMatchService::Malformed(body)), local());
        let report = matcher.evaluate("", "India");

        assert!(report.compliance_score <= 1.0);
        assert_eq!(report.total_required, 8);
    }

    #[test]
    fn transport_error_falls_back() {
        struct BrokenTransport;
        impl MatchService for BrokenTransport {
            fn evaluate_remote(
                &self,
                _text: &str,
                _jurisdiction: &str,
            ) -> Result<MatchReport, MatchServiceError> {
                Err(MatchServiceError::Transport("connection reset".into()))
            }
        }

        let report = ServiceMatcher::new(Box::new(BrokenTransport), local())
            .evaluate("Building permit issued.", "India");
        assert_eq!(report.total_required, 8);
    }

    #[test]
    fn missing_credentials_fall_back() {
        let report = ServiceMatcher::new(Box::new(MockMatchService::Keyless), local())
            .evaluate("Building permit issued.", "India");
        assert_eq!(report.total_required, 8);
    }

    #[test]
    fn keyless_http_service_fails_before_any_request() {
        let service = HttpMatchService::new("http://localhost:1", None, 1);
        let result = service.evaluate_remote("text", "India");
        assert!(matches!(result, Err(MatchServiceError::MissingCredentials)));
    }
}
