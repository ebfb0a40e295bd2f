// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Variant Deployment
//!
//! One row per `(experiment, variant)`: the materialized state of a
//! baseline or candidate pipeline on the experiment's target host set.

use serde::{Deserialize, Serialize};

use crate::value_objects::{ExperimentId, HostId, Variant};

/// Materialization status of a variant deployment, as reported by the
/// fleet client.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Pending,
    Deploying,
    Ready,
    Degraded,
    Terminated,
    Failed,
}

/// The materialized state of a single pipeline variant on the target host
/// set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDeployment {
    pub experiment_id: ExperimentId,
    pub variant: Variant,
    /// Opaque reference to the generator-rendered config for this variant.
    pub config_id: String,
    pub target_hosts: Vec<HostId>,
    pub status: DeploymentStatus,
    pub ready_hosts: usize,
    pub last_error: Option<String>,
    /// Fleet namespace this deployment lives under (by convention, the
    /// experiment id), threaded through to teardown.
    pub namespace: String,
}

impl VariantDeployment {
    pub fn new(
        experiment_id: ExperimentId,
        variant: Variant,
        config_id: impl Into<String>,
        target_hosts: Vec<HostId>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            experiment_id,
            variant,
            config_id: config_id.into(),
            target_hosts,
            status: DeploymentStatus::Pending,
            ready_hosts: 0,
            last_error: None,
            namespace: namespace.into(),
        }
    }

    /// A deployment only advances to `ready` once every target host is
    /// accounted for — this is the single place that invariant is checked,
    /// so callers record readiness by calling this rather than setting
    /// `status` directly.
    pub fn record_readiness(&mut self, ready_hosts: usize) {
        self.ready_hosts = ready_hosts;
        self.status = if ready_hosts >= self.target_hosts.len() && !self.target_hosts.is_empty() {
            DeploymentStatus::Ready
        } else if ready_hosts > 0 {
            DeploymentStatus::Degraded
        } else {
            self.status
        };
    }

    pub fn record_failure(&mut self, reason: impl Into<String>) {
        self.status = DeploymentStatus::Failed;
        self.last_error = Some(reason.into());
    }

    pub fn is_ready(&self) -> bool {
        self.status == DeploymentStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment() -> VariantDeployment {
        VariantDeployment::new(
            ExperimentId::new(),
            Variant::Baseline,
            "cfg-1",
            vec![HostId::new("h1").unwrap(), HostId::new("h2").unwrap()],
            "exp-ns",
        )
    }

    #[test]
    fn ready_only_when_every_host_is_accounted_for() {
        let mut d = deployment();
        d.record_readiness(1);
        assert_eq!(d.status, DeploymentStatus::Degraded);
        assert!(!d.is_ready());

        d.record_readiness(2);
        assert_eq!(d.status, DeploymentStatus::Ready);
        assert!(d.is_ready());
    }

    #[test]
    fn failure_records_the_reason() {
        let mut d = deployment();
        d.record_failure("wait_ready timed out");
        assert_eq!(d.status, DeploymentStatus::Failed);
        assert_eq!(d.last_error.as_deref(), Some("wait_ready timed out"));
    }
}
