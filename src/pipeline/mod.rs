//! Document compliance pipeline.
//!
//! Three stages, run in order: extraction turns the raw input into
//! analyzable text, matching scores it against a jurisdiction's
//! requirement catalog, and summarization renders a verdict. The summary
//! stage only runs when the match decision allows it.

pub mod extraction;
pub mod matching;
pub mod runner;
pub mod summary;

pub use runner::{build_pipeline, CompliancePipeline, PipelineResult, PipelineStatus};
