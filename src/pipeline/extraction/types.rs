use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// How the analyzable text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Input was literal text, carried verbatim.
    RawText,
    /// Input named a PDF file; text is the newline-joined page texts.
    PdfPath,
    /// Extraction failed; text carries the failure message.
    Error,
}

/// Result of turning a raw input into analyzable text.
///
/// Created once by the extractor, consumed once by the matcher. An
/// error-kind result is still pipeline-continuable: the failure message is
/// the text the matcher sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub text: String,
    pub source_kind: SourceKind,
    pub error_message: Option<String>,
    /// Pages extracted from a PDF source; `None` for raw text.
    pub page_count: Option<usize>,
}

impl ExtractionResult {
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_kind: SourceKind::RawText,
            error_message: None,
            page_count: None,
        }
    }

    pub fn pdf(text: impl Into<String>, page_count: usize) -> Self {
        Self {
            text: text.into(),
            source_kind: SourceKind::PdfPath,
            error_message: None,
            page_count: Some(page_count),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            text: message.clone(),
            source_kind: SourceKind::Error,
            error_message: Some(message),
            page_count: None,
        }
    }
}

/// Stage-1 contract: never fails. Failures are data, not errors.
pub trait DocumentExtractor {
    fn extract(&self, input: &str) -> ExtractionResult;
}

/// PDF text extraction seam (allows mocking the PDF backend in tests).
pub trait PdfExtractor {
    /// Per-page text of the document, in page order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_result_carries_message_as_text() {
        let result = ExtractionResult::error("file not found");
        assert_eq!(result.source_kind, SourceKind::Error);
        assert_eq!(result.text, "file not found");
        assert_eq!(result.error_message.as_deref(), Some("file not found"));
        assert!(result.page_count.is_none());
    }

    #[test]
    fn raw_result_is_verbatim() {
        let result = ExtractionResult::raw("  unchanged  \n");
        assert_eq!(result.text, "  unchanged  \n");
        assert_eq!(result.source_kind, SourceKind::RawText);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn source_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SourceKind::PdfPath).unwrap();
        assert_eq!(json, "\"pdf_path\"");
        let json = serde_json::to_string(&SourceKind::RawText).unwrap();
        assert_eq!(json, "\"raw_text\"");
    }
}
