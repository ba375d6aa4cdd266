//! Background job coordination for pipeline runs.
//!
//! Each submission gets a UUID and runs on its own thread. Job state lives
//! in a shared map; callers poll with [`JobCoordinator::get_status`]. Once
//! a job reaches a terminal state its record never changes again.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::pipeline::summary::extract_score;
use crate::pipeline::{CompliancePipeline, PipelineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// What the caller submits. Type and priority are caller metadata,
/// recorded but not interpreted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub document: String,
    pub jurisdiction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub request: JobRequest,
    pub result: Option<PipelineResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Wall-clock duration of the run, e.g. "0.02 seconds". Set on
    /// terminal states only.
    pub processing_time: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Document too short: {len} characters, minimum is {min}")]
    DocumentTooShort { len: usize, min: usize },

    #[error("Job id collision, retry the submission")]
    IdCollision,

    #[error("Job store is corrupted")]
    StoreCorrupted,
}

/// Owns the job map and the worker threads.
pub struct JobCoordinator {
    pipeline: Arc<CompliancePipeline>,
    jobs: Arc<Mutex<HashMap<Uuid, Job>>>,
    workers: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl JobCoordinator {
    pub fn new(pipeline: CompliancePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            jobs: Arc::new(Mutex::new(HashMap::new())),
            workers: Mutex::new(HashMap::new()),
        }
    }

    /// Validate the request, register a pending job, and start a worker.
    /// Returns the job id to poll with.
    pub fn submit(&self, request: JobRequest) -> Result<Uuid, JobError> {
        let len = request.document.trim().len();
        if len < config::MIN_DOCUMENT_LEN {
            return Err(JobError::DocumentTooShort {
                len,
                min: config::MIN_DOCUMENT_LEN,
            });
        }

        let id = Uuid::new_v4();
        {
            let mut jobs = self.jobs.lock().map_err(|_| JobError::StoreCorrupted)?;
            if jobs.contains_key(&id) {
                return Err(JobError::IdCollision);
            }
            jobs.insert(
                id,
                Job {
                    id,
                    status: JobStatus::Pending,
                    request: request.clone(),
                    result: None,
                    error: None,
                    created_at: Utc::now(),
                    processing_time: None,
                },
            );
        }

        tracing::info!(id = %id, jurisdiction = %request.jurisdiction, "Job submitted");

        let pipeline = Arc::clone(&self.pipeline);
        let jobs = Arc::clone(&self.jobs);
        let handle = std::thread::spawn(move || {
            run_job(id, request, pipeline, jobs);
        });
        self.workers
            .lock()
            .map_err(|_| JobError::StoreCorrupted)?
            .insert(id, handle);

        Ok(id)
    }

    /// Snapshot of a job's current state. `None` for unknown ids.
    pub fn get_status(&self, id: Uuid) -> Option<Job> {
        self.jobs.lock().ok()?.get(&id).cloned()
    }

    /// Block until the job's worker thread finishes. A no-op for unknown
    /// ids or already-joined workers.
    pub fn wait(&self, id: Uuid) {
        let handle = match self.workers.lock() {
            Ok(mut workers) => workers.remove(&id),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

fn run_job(
    id: Uuid,
    request: JobRequest,
    pipeline: Arc<CompliancePipeline>,
    jobs: Arc<Mutex<HashMap<Uuid, Job>>>,
) {
    let set_status = |status: JobStatus| {
        let mut map = jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(job) = map.get_mut(&id) {
            job.status = status;
        }
    };

    set_status(JobStatus::Processing);
    let started = Instant::now();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        pipeline.run(&request.document, &request.jurisdiction)
    }));
    let elapsed = format!("{:.2} seconds", started.elapsed().as_secs_f64());

    let mut map = match jobs.lock() {
        Ok(map) => map,
        Err(poisoned) => {
            // Another worker panicked while holding the store lock. The
            // map itself is still usable; record the corruption as a
            // failed job rather than leaving it stuck in Processing.
            tracing::error!(id = %id, "Job store lock was poisoned");
            let mut map = poisoned.into_inner();
            if let Some(job) = map.get_mut(&id) {
                let message = JobError::StoreCorrupted.to_string();
                job.status = JobStatus::Failed;
                job.error = Some(message.clone());
                job.result = Some(PipelineResult::failed(message));
                job.processing_time = Some(elapsed);
            }
            return;
        }
    };
    let Some(job) = map.get_mut(&id) else {
        return;
    };

    match outcome {
        Ok(result) => {
            if let Some(summary) = &result.summary {
                if let Some(score) = extract_score(summary) {
                    tracing::info!(id = %id, score = %score, "Job completed");
                }
            }
            job.status = JobStatus::Completed;
            job.result = Some(result);
            job.processing_time = Some(elapsed);
        }
        Err(panic) => {
            let message = panic_message(panic);
            tracing::error!(id = %id, error = %message, "Job worker panicked");
            job.status = JobStatus::Failed;
            job.error = Some(message.clone());
            job.result = Some(PipelineResult::failed(message));
            job.processing_time = Some(elapsed);
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
