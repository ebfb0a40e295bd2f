// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Exposes [`PhoenixMetrics`] in Prometheus text-exposition format at
//! `/metrics`, mounted onto the same router as the control API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, TextEncoder};

use crate::infrastructure::metrics::service::PhoenixMetrics;

pub fn build_metrics_router(metrics: Arc<PhoenixMetrics>) -> Router {
    Router::new().route("/metrics", get(serve_metrics)).with_state(metrics)
}

async fn serve_metrics(State(metrics): State<Arc<PhoenixMetrics>>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let families = metrics.registry().gather();
    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(&families, &mut buffer) {
        tracing::warn!(%error, "failed to encode prometheus metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics".to_string()).into_response();
    }
    (StatusCode::OK, [(header::CONTENT_TYPE, encoder.format_type())], buffer).into_response()
}
