// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HTTP Control API
//!
//! The `axum` surface over [`crate::application::services::experiment_controller::ExperimentController`]:
//! create/list/get/start/stop, analysis and metrics reads, health and
//! readiness. Errors from every handler funnel through [`error::ApiError`]
//! into the standard `{error: {code, message, details?, request_id}}`
//! envelope.

pub mod error;
pub mod handlers;
pub mod routes;

pub use routes::build_router;
