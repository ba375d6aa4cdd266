//! Jurisdiction-aware document compliance verdicts.
//!
//! Submissions flow through a three-stage pipeline (extract, match,
//! summarize) driven by per-jurisdiction requirement catalogs. The
//! [`jobs::JobCoordinator`] runs pipelines on background threads and
//! tracks their state by UUID.

pub mod catalog;
pub mod config;
pub mod jobs;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Respects `RUST_LOG`; falls back
/// to the default filter. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
