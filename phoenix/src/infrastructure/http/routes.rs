// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Wires the control API's routes to their handlers over one shared
//! [`ExperimentController`]. A thin router delegating straight to the
//! application layer, never embedding business logic of its own.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::services::experiment_controller::ExperimentController;
use crate::infrastructure::http::handlers;

pub fn build_router(controller: Arc<ExperimentController>) -> Router {
    Router::new()
        .route("/api/v1/experiments", post(handlers::create_experiment).get(handlers::list_experiments))
        .route("/api/v1/experiments/{id}", get(handlers::get_experiment))
        .route("/api/v1/experiments/{id}/status", put(handlers::update_experiment_status))
        .route("/api/v1/experiments/{id}/analysis", get(handlers::get_analysis))
        .route("/api/v1/experiments/{id}/metrics", get(handlers::get_metrics))
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .layer(TraceLayer::new_for_http())
        .with_state(controller)
}
