// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Deterministic [`FleetClient`] stand-in. Readiness and teardown outcomes
//! are pre-programmed per scenario rather than timing-dependent, so tests
//! covering the deploy-timeout and degraded-teardown paths don't need to
//! wait on a real clock.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use phoenix_domain::services::{DeployAck, FleetClient, WaitReadyOutcome};
use phoenix_domain::value_objects::{ExperimentId, HostId, Variant};
use phoenix_domain::PhoenixError;

#[derive(Debug, Clone)]
pub enum FleetBehavior {
    Ready,
    TimedOut,
    Degraded { ready: usize, total: usize },
    Failed(String),
}

pub struct StubFleetClient {
    behavior: Mutex<FleetBehavior>,
    torn_down: Mutex<HashSet<(ExperimentId, Variant)>>,
    deploy_calls: Mutex<u32>,
}

impl StubFleetClient {
    pub fn new() -> Self {
        Self { behavior: Mutex::new(FleetBehavior::Ready), torn_down: Mutex::new(HashSet::new()), deploy_calls: Mutex::new(0) }
    }

    pub fn with_behavior(behavior: FleetBehavior) -> Self {
        Self { behavior: Mutex::new(behavior), torn_down: Mutex::new(HashSet::new()), deploy_calls: Mutex::new(0) }
    }

    pub fn is_torn_down(&self, experiment_id: ExperimentId, variant: Variant) -> bool {
        self.torn_down.lock().unwrap().contains(&(experiment_id, variant))
    }

    pub fn deploy_call_count(&self) -> u32 {
        *self.deploy_calls.lock().unwrap()
    }
}

impl Default for StubFleetClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FleetClient for StubFleetClient {
    async fn deploy(
        &self,
        _experiment_id: ExperimentId,
        _variant: Variant,
        _config_id: &str,
        _target_hosts: &[HostId],
        _variables: &HashMap<String, serde_json::Value>,
        _namespace: &str,
    ) -> Result<DeployAck, PhoenixError> {
        *self.deploy_calls.lock().unwrap() += 1;
        Ok(DeployAck { accepted: true })
    }

    async fn wait_ready(
        &self,
        _experiment_id: ExperimentId,
        _variant: Variant,
        _namespace: &str,
        _timeout: Duration,
    ) -> Result<WaitReadyOutcome, PhoenixError> {
        Ok(match &*self.behavior.lock().unwrap() {
            FleetBehavior::Ready => WaitReadyOutcome::Ready,
            FleetBehavior::TimedOut => WaitReadyOutcome::TimedOut,
            FleetBehavior::Degraded { ready, total } => WaitReadyOutcome::Degraded { ready: *ready, total: *total },
            FleetBehavior::Failed(reason) => WaitReadyOutcome::Failed { reason: reason.clone() },
        })
    }

    async fn teardown(&self, experiment_id: ExperimentId, variant: Variant) -> Result<(), PhoenixError> {
        self.torn_down.lock().unwrap().insert((experiment_id, variant));
        Ok(())
    }
}
