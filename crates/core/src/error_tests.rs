// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn not_found_message_includes_kind_and_id() {
    let err = OrchestratorError::not_found("job", "job-abc123");
    assert_eq!(err.to_string(), "not found: job job-abc123");
}

#[test]
fn unknown_enum_value_becomes_a_validation_error() {
    let parsed: std::result::Result<crate::JobStatus, _> = "bogus".parse();
    let err: OrchestratorError = parsed.unwrap_err().into();
    assert!(matches!(err, OrchestratorError::Validation(_)));
}
