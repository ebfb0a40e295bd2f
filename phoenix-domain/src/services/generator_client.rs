// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Contract for the config-template renderer, consumed as an external
//! collaborator (out of scope per the system overview — this crate only
//! depends on its behavior, never its implementation).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::value_objects::{ExperimentId, HostId};
use crate::PhoenixError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub experiment_id: ExperimentId,
    pub baseline_name: String,
    pub candidate_name: String,
    pub target_hosts: Vec<HostId>,
    pub variables: HashMap<String, serde_json::Value>,
}

/// Rendering the same request twice must yield equal config ids; `revision`
/// is the generator's own versioning token for the rendered bundle, used to
/// detect whether a retried `initializing` chain already committed one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResponse {
    pub baseline_config_id: String,
    pub candidate_config_id: String,
    pub revision: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait GeneratorClient: Send + Sync {
    /// `Ok(())` if the template exists and the supplied variables satisfy
    /// its schema; otherwise a `not_found` or `validation` [`PhoenixError`].
    async fn validate_template(
        &self,
        name: &str,
        variables: &HashMap<String, serde_json::Value>,
    ) -> Result<(), PhoenixError>;

    async fn render(&self, request: RenderRequest) -> Result<RenderResponse, PhoenixError>;

    async fn list_templates(&self) -> Result<Vec<TemplateInfo>, PhoenixError>;
}
