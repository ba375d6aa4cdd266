//! Three-stage verdict pipeline: extract, match, summarize.
//!
//! The third stage is conditional. When the matcher decides the score is
//! below threshold the run stops with a stopped status and a reason; no
//! summary is produced for stopped runs.

use serde::{Deserialize, Serialize};

use super::extraction::{
    AssistedExtractor, DocumentExtractor, ExtractionResult, HttpTextService, PlainExtractor,
};
use super::matching::{HttpMatchService, KeywordMatcher, MatchReport, Matcher, ServiceMatcher};
use super::summary::{Summarizer, TemplateSummarizer};
use crate::config;

/// Terminal state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// All three stages ran.
    Completed,
    /// The matcher decided against continuing; no summary exists.
    #[serde(rename = "stopped_at_matching")]
    StoppedAtMatch,
    /// A stage failed unrecoverably.
    Failed,
}

/// Everything a run produced. Serialized field names are the external
/// contract and stay stable across refactors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub status: PipelineStatus,
    #[serde(rename = "extracted")]
    pub extraction: Option<ExtractionResult>,
    #[serde(rename = "matches")]
    pub report: Option<MatchReport>,
    pub summary: Option<String>,
    pub reason: Option<String>,
}

impl PipelineResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: PipelineStatus::Failed,
            extraction: None,
            report: None,
            summary: None,
            reason: Some(message.into()),
        }
    }
}

/// The assembled pipeline. Stages are trait objects so deployments can
/// swap in service-backed implementations without touching the runner.
pub struct CompliancePipeline {
    extractor: Box<dyn DocumentExtractor + Send + Sync>,
    matcher: Box<dyn Matcher + Send + Sync>,
    summarizer: Box<dyn Summarizer + Send + Sync>,
}

impl CompliancePipeline {
    pub fn new(
        extractor: Box<dyn DocumentExtractor + Send + Sync>,
        matcher: Box<dyn Matcher + Send + Sync>,
        summarizer: Box<dyn Summarizer + Send + Sync>,
    ) -> Self {
        Self {
            extractor,
            matcher,
            summarizer,
        }
    }

    pub fn run(&self, document: &str, jurisdiction: &str) -> PipelineResult {
        tracing::info!(jurisdiction = %jurisdiction, "Pipeline run started");

        let extraction = self.extractor.extract(document);
        let report = self.matcher.evaluate(&extraction.text, jurisdiction);

        if !report.should_continue {
            tracing::info!(
                score = report.compliance_score,
                "Stopping before summary, score below threshold"
            );
            return PipelineResult {
                status: PipelineStatus::StoppedAtMatch,
                extraction: Some(extraction),
                report: Some(report),
                summary: None,
                reason: Some("Compliance score too low".to_string()),
            };
        }

        let summary = self.summarizer.summarize(&report);
        tracing::info!(score = report.compliance_score, "Pipeline run completed");

        PipelineResult {
            status: PipelineStatus::Completed,
            extraction: Some(extraction),
            report: Some(report),
            summary: Some(summary),
            reason: None,
        }
    }
}

/// Assemble the pipeline for the current environment.
///
/// Remote services are attached only when their URLs are configured;
/// otherwise every stage is local and deterministic.
pub fn build_pipeline() -> CompliancePipeline {
    let local_extractor = PlainExtractor::new().with_max_pages(config::max_pages());
    let extractor: Box<dyn DocumentExtractor + Send + Sync> = match HttpTextService::from_env() {
        Some(service) => {
            tracing::info!(url = %service.base_url(), "Using remote text service");
            Box::new(AssistedExtractor::new(Box::new(service), local_extractor))
        }
        None => Box::new(local_extractor),
    };

    let keyword = KeywordMatcher::builtin();
    let matcher: Box<dyn Matcher + Send + Sync> = match HttpMatchService::from_env() {
        Some(service) => {
            tracing::info!("Using remote matching service with keyword fallback");
            Box::new(ServiceMatcher::new(Box::new(service), keyword))
        }
        None => Box::new(keyword),
    };

    CompliancePipeline::new(extractor, matcher, Box::new(TemplateSummarizer))
}
