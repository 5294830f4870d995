// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier, submission payload, and the job state machine (spec §3).

use crate::clock::Clock;
use crate::error::{OrchestratorError, Result};
use crate::status::{JobPriority, JobStatus, JobTarget};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

crate::define_id! {
    /// Globally unique identifier for a job.
    pub struct JobId("job-");
}

/// Free-form JSON mapping used for job metadata and results.
pub type Metadata = HashMap<String, serde_json::Value>;

/// The submission payload a client hands to the orchestrator.
///
/// Also doubles as the payload stored on the [`Job`] record — there is no
/// separate wire/storage representation, matching the original
/// `JobPayload` dataclass it is grounded on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub org_id: String,
    pub app_version_id: String,
    pub test_path: String,
    #[serde(default)]
    pub target: JobTarget,
    #[serde(default)]
    pub priority: JobPriority,
    #[serde(default)]
    pub metadata: Metadata,
}

impl JobPayload {
    /// Validates the required fields named in §4.3.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.org_id.trim().is_empty() {
            missing.push("org_id");
        }
        if self.app_version_id.trim().is_empty() {
            missing.push("app_version_id");
        }
        if self.test_path.trim().is_empty() {
            missing.push("test_path");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(OrchestratorError::validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// A job instance tracked by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub payload: JobPayload,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_worker: Option<crate::worker::WorkerId>,
    pub result: Option<Metadata>,
    pub error_message: Option<String>,
    pub retry_count: u32,
    pub retry_cap: u32,
}

impl Job {
    /// Create a freshly submitted job in `pending` status (§4.3).
    pub fn new(payload: JobPayload, retry_cap: u32, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            id: JobId::new(),
            payload,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            assigned_worker: None,
            result: None,
            error_message: None,
            retry_count: 0,
            retry_cap,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Assign the job to a worker: `pending`/`failed` → `queued` (§4.1 `assign`).
    pub fn mark_queued(&mut self, worker_id: crate::worker::WorkerId, now: DateTime<Utc>) {
        self.status = JobStatus::Queued;
        self.assigned_worker = Some(worker_id);
        self.updated_at = now;
    }

    /// Worker reports it has started executing the job.
    pub fn mark_running(&mut self, now: DateTime<Utc>) {
        self.status = JobStatus::Running;
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.updated_at = now;
    }

    pub fn mark_completed(&mut self, result: Option<Metadata>, now: DateTime<Utc>) {
        self.status = JobStatus::Completed;
        self.result = result;
        self.completed_at = Some(now);
        self.assigned_worker = None;
        self.updated_at = now;
    }

    pub fn mark_failed(&mut self, error_message: impl Into<String>, now: DateTime<Utc>) {
        self.status = JobStatus::Failed;
        self.error_message = Some(error_message.into());
        self.completed_at = Some(now);
        self.assigned_worker = None;
        self.updated_at = now;
    }

    /// Cancel a non-terminal job (§4.2 Cancel).
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.is_terminal() {
            return Err(OrchestratorError::invalid_state(format!(
                "cannot cancel job {} in terminal status {}",
                self.id, self.status
            )));
        }
        self.status = JobStatus::Cancelled;
        self.completed_at = Some(now);
        self.updated_at = now;
        self.assigned_worker = None;
        Ok(())
    }

    /// Explicit retry of a job at `failed` (§4.2 Retry). Rejected at the cap.
    pub fn retry(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != JobStatus::Failed {
            return Err(OrchestratorError::invalid_state(format!(
                "cannot retry job {} in status {} (must be failed)",
                self.id, self.status
            )));
        }
        if self.retry_count >= self.retry_cap {
            return Err(OrchestratorError::invalid_state(format!(
                "job {} has exhausted its retry cap ({})",
                self.id, self.retry_cap
            )));
        }
        self.status = JobStatus::Pending;
        self.assigned_worker = None;
        self.started_at = None;
        self.completed_at = None;
        self.error_message = None;
        self.retry_count += 1;
        self.updated_at = now;
        Ok(())
    }

    /// Reassignment after worker loss (§4.2 Liveness sweep). Returns `true`
    /// if the job was requeued as `pending`, `false` if it hit the retry cap
    /// and was instead failed.
    pub fn reassign_after_worker_loss(&mut self, now: DateTime<Utc>) -> bool {
        self.assigned_worker = None;
        self.retry_count += 1;
        if self.retry_count >= self.retry_cap {
            self.mark_failed("max retries exceeded due to worker failures", now);
            false
        } else {
            self.status = JobStatus::Pending;
            self.updated_at = now;
            true
        }
    }

    /// Job-execution timeout (§4.2 Job-timeout sweep).
    pub fn timeout(&mut self, now: DateTime<Utc>) {
        self.mark_failed("job execution timeout", now);
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Job {
    pub fn builder() -> JobBuilder {
        JobBuilder::default()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub struct JobBuilder {
    org_id: String,
    app_version_id: String,
    test_path: String,
    target: JobTarget,
    priority: JobPriority,
    metadata: Metadata,
    retry_cap: u32,
}

#[cfg(any(test, feature = "test-support"))]
impl Default for JobBuilder {
    fn default() -> Self {
        Self {
            org_id: "qualgent".to_string(),
            app_version_id: "v1.0.0".to_string(),
            test_path: "tests/smoke.yaml".to_string(),
            target: JobTarget::Emulator,
            priority: JobPriority::Normal,
            metadata: Metadata::new(),
            retry_cap: 3,
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl JobBuilder {
    pub fn org_id(mut self, v: impl Into<String>) -> Self {
        self.org_id = v.into();
        self
    }

    pub fn app_version_id(mut self, v: impl Into<String>) -> Self {
        self.app_version_id = v.into();
        self
    }

    pub fn test_path(mut self, v: impl Into<String>) -> Self {
        self.test_path = v.into();
        self
    }

    pub fn target(mut self, v: JobTarget) -> Self {
        self.target = v;
        self
    }

    pub fn priority(mut self, v: JobPriority) -> Self {
        self.priority = v;
        self
    }

    pub fn retry_cap(mut self, v: u32) -> Self {
        self.retry_cap = v;
        self
    }

    pub fn build(self, clock: &impl Clock) -> Job {
        Job::new(
            JobPayload {
                org_id: self.org_id,
                app_version_id: self.app_version_id,
                test_path: self.test_path,
                target: self.target,
                priority: self.priority,
                metadata: self.metadata,
            },
            self.retry_cap,
            clock,
        )
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
