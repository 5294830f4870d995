// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translation of [`qg_core::OrchestratorError`] to HTTP responses (§7).

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestExt};
use qg_core::OrchestratorError;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub struct ApiError(pub OrchestratorError);

impl From<OrchestratorError> for ApiError {
    fn from(e: OrchestratorError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            OrchestratorError::Validation(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::NotFound { .. } => {
                tracing::debug!(error = %self.0, "not found");
                StatusCode::NOT_FOUND
            }
            OrchestratorError::InvalidState(_) => StatusCode::BAD_REQUEST,
            OrchestratorError::StoreUnavailable(_) => {
                tracing::warn!(error = %self.0, "store unavailable");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            OrchestratorError::Internal(_) => {
                tracing::warn!(error = %self.0, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// `Json` extractor whose rejection is a 400, not axum's default 422.
///
/// A malformed body or an unrecognized enum value is a client validation
/// error under §6/§7, not an unprocessable-entity distinction callers need
/// to tell apart from other 400s.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = req
            .extract::<Json<T>, _>()
            .await
            .map_err(|rejection: JsonRejection| ApiError(OrchestratorError::validation(rejection.body_text())))?;
        Ok(Self(value))
    }
}
