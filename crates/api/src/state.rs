// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The composition root's shared handles, passed into every handler via
//! `axum::extract::State` (§9 Design notes: explicit composition root).

use qg_core::SystemClock;
use qg_scheduler::Scheduler;
use qg_store::Store;
use std::sync::Arc;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub scheduler: Scheduler<SystemClock>,
    pub clock: SystemClock,
    pub storage_label: &'static str,
}
