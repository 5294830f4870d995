// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy shared by the store and scheduler crates (spec §7).
//!
//! Both store backends and the scheduler raise the same kinds so callers
//! — ultimately the HTTP edge in `qg-api` — can translate uniformly to
//! status codes without caring which backend is behind the `Store` trait.

use crate::status::UnknownEnumValue;

/// Errors produced anywhere below the HTTP edge.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Malformed or incomplete submission/registration payload.
    #[error("validation error: {0}")]
    Validation(String),

    /// An id referenced by a lookup is unknown to the store.
    #[error("not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    /// Operation disallowed in the entity's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The remote backend could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Any other uncaught failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }
}

impl From<UnknownEnumValue> for OrchestratorError {
    fn from(e: UnknownEnumValue) -> Self {
        Self::Validation(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
