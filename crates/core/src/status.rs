// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed sum types for job status, execution target, and priority.
//!
//! All three serialize to the lowercase string form documented in the
//! external HTTP contract; an unrecognized string on input is a
//! `ValidationError`, never a silent default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a job, shared by [`crate::Job`] and [`crate::Group`] (a group
/// tracks the aggregate of its member jobs' statuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Terminal statuses never transition further (§3 Invariants).
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Whether a job in this status must carry a non-null assigned worker.
    pub fn requires_assigned_worker(self) -> bool {
        matches!(self, Self::Queued | Self::Running)
    }
}

crate::simple_display! {
    JobStatus {
        Pending => "pending",
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

impl FromStr for JobStatus {
    type Err = UnknownEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownEnumValue::new("JobStatus", other)),
        }
    }
}

/// Execution environment a test targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobTarget {
    Emulator,
    Device,
    Cloud,
}

crate::simple_display! {
    JobTarget {
        Emulator => "emulator",
        Device => "device",
        Cloud => "cloud",
    }
}

impl FromStr for JobTarget {
    type Err = UnknownEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emulator" => Ok(Self::Emulator),
            "device" => Ok(Self::Device),
            "cloud" => Ok(Self::Cloud),
            other => Err(UnknownEnumValue::new("JobTarget", other)),
        }
    }
}

impl Default for JobTarget {
    fn default() -> Self {
        Self::Emulator
    }
}

/// Scheduling priority. Ordinal order (Low < Normal < High < Urgent)
/// matches the priority weights in §4.2: `urgent=4, high=3, normal=2, low=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl JobPriority {
    /// Scheduling weight used to order groups and per-worker job queues.
    pub fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }
}

crate::simple_display! {
    JobPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

impl FromStr for JobPriority {
    type Err = UnknownEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(UnknownEnumValue::new("JobPriority", other)),
        }
    }
}

impl Default for JobPriority {
    fn default() -> Self {
        Self::Normal
    }
}

/// Status of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Idle,
    Busy,
    Offline,
}

crate::simple_display! {
    WorkerStatus {
        Idle => "idle",
        Busy => "busy",
        Offline => "offline",
    }
}

impl FromStr for WorkerStatus {
    type Err = UnknownEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "busy" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            other => Err(UnknownEnumValue::new("WorkerStatus", other)),
        }
    }
}

/// An input string did not match any variant of the named enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {enum_name} value: {value:?}")]
pub struct UnknownEnumValue {
    enum_name: &'static str,
    value: String,
}

impl UnknownEnumValue {
    fn new(enum_name: &'static str, value: &str) -> Self {
        Self {
            enum_name,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
