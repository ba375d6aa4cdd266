pub mod types;
pub mod pdf;
pub mod plain;
pub mod assist;

pub use types::*;
pub use pdf::*;
pub use plain::*;
pub use assist::*;

use thiserror::Error;

/// Internal extraction failures. These never cross the stage boundary;
/// [`types::DocumentExtractor`] encodes them into the result as text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),
}
