// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Operational Metrics
//!
//! Prometheus counters about the reconciliation engine itself —
//! [`service::PhoenixMetrics`] tracks scheduler ticks, phase transitions,
//! transition failures and retry exhaustion — exposed over HTTP by
//! [`endpoint::build_metrics_router`]. Distinct from
//! `phoenix_domain::services::MetricsClient`, which queries the telemetry
//! an experiment's own variants are producing.

pub mod endpoint;
pub mod service;

pub use endpoint::build_metrics_router;
pub use service::PhoenixMetrics;
