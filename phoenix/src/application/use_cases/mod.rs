// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Use Cases
//!
//! One struct per API operation, each depending only on the repository and
//! service traits it actually needs. [`crate::application::services::experiment_controller::ExperimentController`]
//! composes these into the single entry point the HTTP layer calls.

pub mod create_experiment;
pub mod get_analysis;
pub mod get_experiment;
pub mod get_metrics;
pub mod list_experiments;
pub mod start_experiment;
pub mod stop_experiment;

pub use create_experiment::CreateExperimentUseCase;
pub use get_analysis::GetAnalysisUseCase;
pub use get_experiment::GetExperimentUseCase;
pub use get_metrics::{GetMetricsUseCase, MetricsQuery};
pub use list_experiments::ListExperimentsUseCase;
pub use start_experiment::StartExperimentUseCase;
pub use stop_experiment::StopExperimentUseCase;
