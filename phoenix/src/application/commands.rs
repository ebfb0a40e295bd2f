// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Commands
//!
//! Inputs to the use cases under [`crate::application::use_cases`]. Kept as
//! plain data, separate from the HTTP request bodies that produce them, so
//! the use cases stay testable without an HTTP server.

use std::collections::HashMap;
use std::time::Duration;

use phoenix_domain::value_objects::{HostId, SuccessCriteria};
use phoenix_domain::value_objects::Phase;

/// Input to [`crate::application::use_cases::create_experiment`].
#[derive(Debug, Clone)]
pub struct CreateExperimentCommand {
    pub name: String,
    pub description: String,
    pub baseline_pipeline: String,
    pub candidate_pipeline: String,
    pub target_hosts: Vec<HostId>,
    pub duration: Duration,
    pub variables: HashMap<String, serde_json::Value>,
    pub success_criteria: SuccessCriteria,
    pub owner: String,
}

/// Input to [`crate::application::use_cases::list_experiments`]; mirrors
/// `phoenix_domain::repositories::ExperimentFilter` field for field, kept
/// separate so the HTTP layer's query-string parsing doesn't leak into the
/// domain repository contract.
#[derive(Debug, Clone, Default)]
pub struct ListExperimentsCommand {
    pub phases: Vec<Phase>,
    pub owner: Option<String>,
    pub name_prefix: Option<String>,
    pub page: usize,
    pub page_size: usize,
}
