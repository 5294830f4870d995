// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker identifier and registration record (spec §3).

use crate::job::Metadata;
use crate::status::{JobTarget, WorkerStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

crate::define_id! {
    /// Globally unique identifier for a worker.
    pub struct WorkerId("wkr-");
}

/// A registered worker polling for jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub accepted_targets: HashSet<JobTarget>,
    pub status: WorkerStatus,
    pub held_jobs: HashSet<crate::job::JobId>,
    pub last_heartbeat: DateTime<Utc>,
    pub metadata: Metadata,
}

impl Worker {
    pub fn new(
        name: impl Into<String>,
        accepted_targets: HashSet<JobTarget>,
        clock: &impl crate::clock::Clock,
    ) -> Self {
        Self {
            id: WorkerId::new(),
            name: name.into(),
            accepted_targets,
            status: WorkerStatus::Idle,
            held_jobs: HashSet::new(),
            last_heartbeat: clock.now(),
            metadata: Metadata::new(),
        }
    }

    pub fn accepts(&self, target: JobTarget) -> bool {
        self.accepted_targets.contains(&target)
    }

    /// A worker can take on new work when it is not offline and accepts the
    /// target — holding existing jobs does not by itself disqualify it,
    /// since a group assignment hands a worker several jobs at once (§4.2).
    pub fn can_accept(&self, target: JobTarget) -> bool {
        self.status != WorkerStatus::Offline && self.accepts(target)
    }

    pub fn record_heartbeat(&mut self, now: DateTime<Utc>) {
        self.last_heartbeat = now;
        if self.status == WorkerStatus::Offline {
            self.status = WorkerStatus::Idle;
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_heartbeat) >= timeout
    }

    pub fn assign_job(&mut self, job_id: crate::job::JobId) {
        self.held_jobs.insert(job_id);
        self.status = WorkerStatus::Busy;
    }

    pub fn release_job(&mut self, job_id: &crate::job::JobId) {
        self.held_jobs.remove(job_id);
        if self.held_jobs.is_empty() && self.status == WorkerStatus::Busy {
            self.status = WorkerStatus::Idle;
        }
    }

    pub fn mark_offline(&mut self) {
        self.status = WorkerStatus::Offline;
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
