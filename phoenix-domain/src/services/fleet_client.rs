// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Contract for materializing a pipeline variant onto a target host set.
//! The host-side agent runtime that actually launches collectors is an
//! out-of-scope external collaborator; this trait only describes what the
//! control plane can ask the fleet to do on its behalf.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::value_objects::{ExperimentId, HostId, Variant};
use crate::PhoenixError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployAck {
    pub accepted: bool,
}

/// Outcome of polling a deployment for readiness. `Degraded` distinguishes
/// "some hosts are up" from `Failed`'s "this deployment cannot proceed",
/// letting the state machine choose a bounded-retry vs. fail-fast path.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum WaitReadyOutcome {
    Ready,
    TimedOut,
    Degraded { ready: usize, total: usize },
    Failed { reason: String },
}

#[async_trait]
pub trait FleetClient: Send + Sync {
    /// Idempotent by `(experiment_id, variant)`: a repeated deploy with the
    /// same `config_id` is a no-op acknowledgement, not a new rollout.
    #[allow(clippy::too_many_arguments)]
    async fn deploy(
        &self,
        experiment_id: ExperimentId,
        variant: Variant,
        config_id: &str,
        target_hosts: &[HostId],
        variables: &HashMap<String, serde_json::Value>,
        namespace: &str,
    ) -> Result<DeployAck, PhoenixError>;

    async fn wait_ready(
        &self,
        experiment_id: ExperimentId,
        variant: Variant,
        namespace: &str,
        timeout: Duration,
    ) -> Result<WaitReadyOutcome, PhoenixError>;

    /// Idempotent; succeeds if the deployment is already gone.
    async fn teardown(&self, experiment_id: ExperimentId, variant: Variant) -> Result<(), PhoenixError>;
}
