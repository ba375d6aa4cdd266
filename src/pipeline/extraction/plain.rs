//! Deterministic extraction: path-or-text dispatch, no remote services.
//!
//! The input contract is a single string: if it looks like a path to a PDF
//! it is read and its page texts are joined; anything else is literal text
//! carried verbatim. This extractor never fails; I/O and parse errors are
//! encoded into the result and fed forward as analyzable text.

use std::path::Path;

use super::pdf::PdfFileExtractor;
use super::types::{DocumentExtractor, ExtractionResult, PdfExtractor};
use super::ExtractionError;

/// Does the input name a PDF file rather than carry document text?
/// A single line ending in `.pdf` is treated as a path.
pub(crate) fn looks_like_pdf_path(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty()
        && !trimmed.contains('\n')
        && trimmed.to_lowercase().ends_with(".pdf")
}

/// Stage-1 extractor: PDF text layer or verbatim raw text.
pub struct PlainExtractor {
    pdf: Box<dyn PdfExtractor + Send + Sync>,
    max_pages: Option<usize>,
}

impl PlainExtractor {
    /// Extractor with the production PDF backend and no page limit.
    pub fn new() -> Self {
        Self::with_backend(Box::new(PdfFileExtractor))
    }

    pub fn with_backend(pdf: Box<dyn PdfExtractor + Send + Sync>) -> Self {
        Self {
            pdf,
            max_pages: None,
        }
    }

    /// Cap the number of PDF pages considered. The default is no limit;
    /// deployment profiles that cap it do so explicitly via
    /// `config::max_pages()`.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn extract_pdf(&self, path: &str) -> Result<(String, usize), ExtractionError> {
        let bytes = std::fs::read(Path::new(path.trim()))?;
        let mut pages = self.pdf.extract_pages(&bytes)?;
        if let Some(limit) = self.max_pages {
            pages.truncate(limit);
        }
        let page_count = pages.len();
        Ok((pages.join("\n"), page_count))
    }
}

impl Default for PlainExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for PlainExtractor {
    fn extract(&self, input: &str) -> ExtractionResult {
        if looks_like_pdf_path(input) {
            match self.extract_pdf(input) {
                Ok((text, page_count)) => {
                    tracing::info!(pages = page_count, "Extracted PDF text layer");
                    ExtractionResult::pdf(text, page_count)
                }
                Err(e) => {
                    // By contract the failure message becomes the text and
                    // the pipeline continues.
                    let message = format!("PDF extraction failed: {e}");
                    tracing::warn!(path = %input.trim(), error = %e, "PDF extraction failed");
                    ExtractionResult::error(message)
                }
            }
        } else {
            ExtractionResult::raw(input)
        }
    }
}
