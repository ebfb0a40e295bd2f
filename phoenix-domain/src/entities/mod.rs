// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Entities
//!
//! Objects with identity that persists through state changes: an
//! [`Experiment`] stays "the same experiment" as it moves through its
//! lifecycle, a [`VariantDeployment`] stays "the same deployment" as its
//! readiness changes.

mod analysis_result;
mod experiment;
mod phase_history_entry;
mod variant_deployment;

pub use analysis_result::{AnalysisResult, Recommendation, RiskLevel};
pub use experiment::Experiment;
pub use phase_history_entry::{Actor, PhaseHistoryEntry};
pub use variant_deployment::{DeploymentStatus, VariantDeployment};
