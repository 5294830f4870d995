// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn key_helpers_use_the_documented_prefixes() {
    let job_id = JobId::new();
    let group_id = GroupId::new();
    let worker_id = WorkerId::new();
    assert_eq!(job_key(&job_id), format!("job:{job_id}"));
    assert_eq!(group_key(&group_id), format!("group:{group_id}"));
    assert_eq!(worker_key(&worker_id), format!("worker:{worker_id}"));
}

/// Live-Redis behavioral tests, gated behind `redis-tests` so the default
/// build and test run never requires a reachable server.
#[cfg(feature = "redis-tests")]
mod live {
    use super::*;
    use qg_core::{FakeClock, JobTarget};
    use std::collections::HashSet;

    async fn store() -> RedisStore {
        let url = std::env::var("TEST_REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379/15".to_string());
        let cfg = deadpool_redis::Config::from_url(url);
        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .expect("redis pool");
        RedisStore::new(pool)
    }

    #[tokio::test]
    async fn add_then_get_round_trips_a_job_through_redis() {
        let store = store().await;
        let clock = FakeClock::new();
        let job = Job::builder().org_id("org-1").app_version_id("av-1").build(&clock);
        store.add_job(job.clone()).await.unwrap();
        let fetched = store.get_job(&job.id).await.unwrap();
        assert_eq!(fetched.payload.org_id, "org-1");
        assert_eq!(fetched.created_at, job.created_at);
    }

    #[tokio::test]
    async fn assign_is_visible_to_both_entities_after_the_pipeline_commits() {
        let store = store().await;
        let clock = FakeClock::new();
        let job = Job::builder().build(&clock);
        let targets: HashSet<JobTarget> = [JobTarget::Emulator].into_iter().collect();
        let worker = Worker::new("runner", targets, &clock);
        let (job_id, worker_id) = (job.id, worker.id);
        store.add_job(job).await.unwrap();
        store.add_worker(worker).await.unwrap();

        store.assign(&job_id, &worker_id, clock.now()).await.unwrap();

        let job = store.get_job(&job_id).await.unwrap();
        let worker = store.get_worker(&worker_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(worker.status, WorkerStatus::Busy);
    }
}
