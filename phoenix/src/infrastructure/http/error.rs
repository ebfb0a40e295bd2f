// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Maps [`PhoenixError`] onto the control API's standard error envelope:
//! `{error: {code, message, details?, request_id}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use phoenix_domain::PhoenixError;

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    request_id: String,
}

/// Thin wrapper so handlers can return `Result<_, ApiError>` and rely on
/// [`IntoResponse`] to produce the JSON envelope with the right status code.
pub struct ApiError(pub PhoenixError);

impl From<PhoenixError> for ApiError {
    fn from(err: PhoenixError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for_category(self.0.category());
        let request_id = Uuid::new_v4().to_string();
        if !matches!(status, StatusCode::NOT_FOUND) {
            tracing::warn!(error = %self.0, category = self.0.category(), %request_id, "request failed");
        }
        let body = ErrorEnvelope {
            error: ErrorBody { code: self.0.category(), message: self.0.to_string(), details: None, request_id },
        };
        (status, Json(body)).into_response()
    }
}

fn status_for_category(category: &str) -> StatusCode {
    match category {
        "validation" => StatusCode::BAD_REQUEST,
        "not_found" => StatusCode::NOT_FOUND,
        "conflict" => StatusCode::CONFLICT,
        "transient" => StatusCode::SERVICE_UNAVAILABLE,
        "unrecoverable" => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
