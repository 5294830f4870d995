// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_group_starts_pending_and_accepts_jobs() {
    let now = Utc::now();
    let group = Group::new("org-1", "av-1", now);
    assert_eq!(group.status, JobStatus::Pending);
    assert!(group.accepts_new_jobs());
    assert!(group.job_ids.is_empty());
}

#[test]
fn assign_closes_the_group_to_new_jobs() {
    let now = Utc::now();
    let mut group = Group::new("org-1", "av-1", now);
    group.assign(WorkerId::new());
    assert!(!group.accepts_new_jobs());
    assert_eq!(group.status, JobStatus::Queued);
    assert!(group.assigned_worker.is_some());
}

#[test]
fn effective_priority_picks_the_highest_member_priority() {
    let priority = Group::effective_priority([JobPriority::Low, JobPriority::Urgent, JobPriority::Normal]);
    assert_eq!(priority, JobPriority::Urgent);
}

#[test]
fn effective_priority_defaults_to_normal_when_empty() {
    assert_eq!(Group::effective_priority([]), JobPriority::Normal);
}

#[test]
fn aggregate_status_is_completed_only_when_every_member_completed() {
    let statuses = [JobStatus::Completed, JobStatus::Completed];
    assert_eq!(Group::aggregate_status(&statuses), JobStatus::Completed);
}

#[test]
fn aggregate_status_is_running_while_any_member_runs() {
    let statuses = [JobStatus::Completed, JobStatus::Running];
    assert_eq!(Group::aggregate_status(&statuses), JobStatus::Running);
}

#[test]
fn aggregate_status_is_failed_when_terminal_mix_includes_a_failure() {
    let statuses = [JobStatus::Completed, JobStatus::Failed, JobStatus::Cancelled];
    assert_eq!(Group::aggregate_status(&statuses), JobStatus::Failed);
}

#[test]
fn aggregate_status_is_cancelled_when_terminal_mix_has_no_failure() {
    let statuses = [JobStatus::Completed, JobStatus::Cancelled];
    assert_eq!(Group::aggregate_status(&statuses), JobStatus::Cancelled);
}

#[test]
fn aggregate_status_defaults_to_pending_for_an_empty_group() {
    assert_eq!(Group::aggregate_status(&[]), JobStatus::Pending);
}
