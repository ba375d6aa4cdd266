//! Optional remote text-understanding delegation.
//!
//! A deployment may point `VERIDOC_TEXT_SERVICE_URL` at a service that
//! cleans up raw document text before matching. The delegation is
//! transparent: on any failure (unreachable, non-2xx, unparseable) the
//! local [`PlainExtractor`] runs instead and its output is used unchanged,
//! byte for byte.

use serde::{Deserialize, Serialize};

use super::plain::{looks_like_pdf_path, PlainExtractor};
use super::types::{DocumentExtractor, ExtractionResult};
use crate::config;

/// Errors from the remote text service. All of them are recovered by
/// falling back to the local extractor; none surface to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TextServiceError {
    #[error("Text service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Text service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response parsing error: {0}")]
    Parse(String),
}

/// Remote text-understanding abstraction (allows mocking).
pub trait TextService {
    fn understand(&self, input: &str) -> Result<String, TextServiceError>;
}

#[derive(Serialize)]
struct UnderstandRequest<'a> {
    document: &'a str,
}

#[derive(Deserialize)]
struct UnderstandResponse {
    text: String,
}

/// HTTP client for the text-understanding service.
pub struct HttpTextService {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpTextService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Service from `VERIDOC_TEXT_SERVICE_URL`; `None` when unconfigured.
    pub fn from_env() -> Option<Self> {
        config::text_service_url()
            .map(|url| Self::new(&url, config::DEFAULT_TIMEOUT_SECS))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl TextService for HttpTextService {
    fn understand(&self, input: &str) -> Result<String, TextServiceError> {
        let url = format!("{}/v1/extract", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&UnderstandRequest { document: input })
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    TextServiceError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    TextServiceError::Timeout(self.timeout_secs)
                } else {
                    TextServiceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TextServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: UnderstandResponse = response
            .json()
            .map_err(|e| TextServiceError::Parse(e.to_string()))?;
        Ok(parsed.text)
    }
}

/// Mock text service for tests. Returns a configured response or fails.
pub struct MockTextService {
    response: Option<String>,
}

impl MockTextService {
    pub fn ok(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
        }
    }

    pub fn unreachable() -> Self {
        Self { response: None }
    }
}

impl TextService for MockTextService {
    fn understand(&self, _input: &str) -> Result<String, TextServiceError> {
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(TextServiceError::Connection("http://mock".into())),
        }
    }
}

/// Extractor that delegates literal-text inputs to a remote service.
///
/// PDF paths always take the local path; the service contract covers text
/// understanding only. When the service fails for any reason, the result is
/// exactly what [`PlainExtractor`] would have produced.
pub struct AssistedExtractor {
    service: Box<dyn TextService + Send + Sync>,
    local: PlainExtractor,
}

impl AssistedExtractor {
    pub fn new(service: Box<dyn TextService + Send + Sync>, local: PlainExtractor) -> Self {
        Self { service, local }
    }
}

impl DocumentExtractor for AssistedExtractor {
    fn extract(&self, input: &str) -> ExtractionResult {
        if looks_like_pdf_path(input) {
            return self.local.extract(input);
        }

        match self.service.understand(input) {
            Ok(text) => ExtractionResult::raw(text),
            Err(e) => {
                tracing::warn!(error = %e, "Text service failed; using local extraction");
                self.local.extract(input)
            }
        }
    }
}
