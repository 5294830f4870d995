// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use qg_core::{FakeClock, JobPriority, JobTarget};
use qg_store::local::LocalStore;
use std::collections::HashSet;
use std::sync::Arc;

fn scheduler() -> (Scheduler<FakeClock>, FakeClock) {
    let clock = FakeClock::new();
    let store: Arc<dyn Store> = Arc::new(LocalStore::new());
    (Scheduler::new(store, clock.clone(), SchedulerConfig::default()), clock)
}

fn payload() -> JobPayload {
    JobPayload {
        org_id: "org-1".to_string(),
        app_version_id: "av-1".to_string(),
        test_path: "tests/smoke.yaml".to_string(),
        target: JobTarget::Emulator,
        priority: JobPriority::Normal,
        metadata: Default::default(),
    }
}

#[tokio::test]
async fn submit_job_rejects_missing_fields() {
    let (scheduler, _clock) = scheduler();
    let mut payload = payload();
    payload.test_path.clear();
    let err = scheduler.submit_job(payload).await.unwrap_err();
    assert!(matches!(err, qg_core::OrchestratorError::Validation(_)));
}

#[tokio::test]
async fn submit_job_creates_a_pending_job_in_a_new_group() {
    let (scheduler, _clock) = scheduler();
    let job = scheduler.submit_job(payload()).await.unwrap();
    assert_eq!(job.status, JobStatus::Pending);

    let group = scheduler
        .store
        .find_active_group_for("org-1", "av-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(group.job_ids, vec![job.id]);
}

#[tokio::test]
async fn submitting_jobs_for_the_same_org_and_version_coalesces_into_one_group() {
    let (scheduler, _clock) = scheduler();
    let a = scheduler.submit_job(payload()).await.unwrap();
    let b = scheduler.submit_job(payload()).await.unwrap();
    let c = scheduler.submit_job(payload()).await.unwrap();

    let groups = scheduler.store.list_groups(&Default::default()).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].job_ids, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn retry_rejects_a_non_failed_job() {
    let (scheduler, _clock) = scheduler();
    let job = scheduler.submit_job(payload()).await.unwrap();
    assert!(scheduler.retry_job(&job.id).await.is_err());
}

#[tokio::test]
async fn retry_resets_and_re_groups_a_failed_job() {
    let (scheduler, clock) = scheduler();
    let job = scheduler.submit_job(payload()).await.unwrap();
    let mut failed = scheduler.store.get_job(&job.id).await.unwrap();
    failed.mark_failed("boom", clock.now());
    scheduler.store.update_job(failed).await.unwrap();

    let retried = scheduler.retry_job(&job.id).await.unwrap();
    assert_eq!(retried.status, JobStatus::Pending);
    assert_eq!(retried.retry_count, 1);
}

#[tokio::test]
async fn cancel_rejects_a_terminal_job() {
    let (scheduler, clock) = scheduler();
    let job = scheduler.submit_job(payload()).await.unwrap();
    let mut completed = scheduler.store.get_job(&job.id).await.unwrap();
    completed.mark_completed(None, clock.now());
    scheduler.store.update_job(completed).await.unwrap();

    assert!(scheduler.cancel_job(&job.id).await.is_err());
}

#[tokio::test]
async fn cancel_frees_an_assigned_worker() {
    let (scheduler, clock) = scheduler();
    let job = scheduler.submit_job(payload()).await.unwrap();
    let targets: HashSet<JobTarget> = [JobTarget::Emulator].into_iter().collect();
    let worker = Worker::new("runner", targets, &clock);
    let worker_id = worker.id;
    scheduler.store.add_worker(worker).await.unwrap();
    scheduler.store.assign(&job.id, &worker_id, clock.now()).await.unwrap();

    let cancelled = scheduler.cancel_job(&job.id).await.unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);

    let worker = scheduler.store.get_worker(&worker_id).await.unwrap();
    assert!(worker.held_jobs.is_empty());
}

#[tokio::test]
async fn heartbeat_on_an_unknown_worker_is_not_found() {
    let (scheduler, _clock) = scheduler();
    let err = scheduler.heartbeat(&WorkerId::new()).await.unwrap_err();
    assert!(matches!(err, qg_core::OrchestratorError::NotFound { .. }));
}

#[tokio::test]
async fn heartbeat_returns_the_assigned_queued_job() {
    let (scheduler, clock) = scheduler();
    let job = scheduler.submit_job(payload()).await.unwrap();
    let targets: HashSet<JobTarget> = [JobTarget::Emulator].into_iter().collect();
    let worker = Worker::new("runner", targets, &clock);
    let worker_id = worker.id;
    scheduler.store.add_worker(worker).await.unwrap();
    scheduler.store.assign(&job.id, &worker_id, clock.now()).await.unwrap();

    let ack = scheduler.heartbeat(&worker_id).await.unwrap();
    assert_eq!(ack.next_job.map(|j| j.id), Some(job.id));
}

#[tokio::test]
async fn heartbeat_is_idempotent_with_no_intervening_assignment() {
    let (scheduler, clock) = scheduler();
    let job = scheduler.submit_job(payload()).await.unwrap();
    let targets: HashSet<JobTarget> = [JobTarget::Emulator].into_iter().collect();
    let worker = Worker::new("runner", targets, &clock);
    let worker_id = worker.id;
    scheduler.store.add_worker(worker).await.unwrap();
    scheduler.store.assign(&job.id, &worker_id, clock.now()).await.unwrap();

    let first = scheduler.heartbeat(&worker_id).await.unwrap();
    let second = scheduler.heartbeat(&worker_id).await.unwrap();
    assert_eq!(first.next_job.map(|j| j.id), second.next_job.map(|j| j.id));
}
