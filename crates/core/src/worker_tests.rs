// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::job::JobId;

fn targets(ts: &[JobTarget]) -> HashSet<JobTarget> {
    ts.iter().copied().collect()
}

#[test]
fn new_worker_starts_idle_with_no_held_jobs() {
    let clock = FakeClock::new();
    let worker = Worker::new("runner-1", targets(&[JobTarget::Emulator]), &clock);
    assert_eq!(worker.status, WorkerStatus::Idle);
    assert!(worker.held_jobs.is_empty());
    assert_eq!(worker.last_heartbeat, clock.now());
}

#[test]
fn accepts_checks_the_declared_target_set() {
    let clock = FakeClock::new();
    let worker = Worker::new("runner-1", targets(&[JobTarget::Device]), &clock);
    assert!(worker.accepts(JobTarget::Device));
    assert!(!worker.accepts(JobTarget::Cloud));
}

#[test]
fn offline_worker_cannot_accept_even_matching_targets() {
    let clock = FakeClock::new();
    let mut worker = Worker::new("runner-1", targets(&[JobTarget::Device]), &clock);
    worker.mark_offline();
    assert!(!worker.can_accept(JobTarget::Device));
}

#[test]
fn assign_and_release_job_toggle_busy_idle() {
    let clock = FakeClock::new();
    let mut worker = Worker::new("runner-1", targets(&[JobTarget::Emulator]), &clock);
    let job_id = JobId::new();
    worker.assign_job(job_id);
    assert_eq!(worker.status, WorkerStatus::Busy);

    worker.release_job(&job_id);
    assert_eq!(worker.status, WorkerStatus::Idle);
    assert!(worker.held_jobs.is_empty());
}

#[test]
fn record_heartbeat_revives_an_offline_worker() {
    let clock = FakeClock::new();
    let mut worker = Worker::new("runner-1", targets(&[JobTarget::Emulator]), &clock);
    worker.mark_offline();
    clock.advance(chrono::Duration::seconds(1));
    worker.record_heartbeat(clock.now());
    assert_eq!(worker.status, WorkerStatus::Idle);
    assert_eq!(worker.last_heartbeat, clock.now());
}

#[test]
fn is_stale_compares_against_the_timeout_window() {
    let clock = FakeClock::new();
    let worker = Worker::new("runner-1", targets(&[JobTarget::Emulator]), &clock);
    let timeout = chrono::Duration::seconds(300);
    assert!(!worker.is_stale(clock.now(), timeout));

    clock.advance(chrono::Duration::seconds(301));
    assert!(worker.is_stale(clock.now(), timeout));
}
