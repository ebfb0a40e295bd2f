// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Durable persistence contract for experiments, variant deployments, and
//! phase history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{AnalysisResult, Experiment, PhaseHistoryEntry, VariantDeployment};
use crate::value_objects::{ExperimentId, Phase, Variant};
use crate::PhoenixError;

/// Query parameters for [`ExperimentStore::list_experiments`]. An empty
/// `phases` means "no phase filter", matching the API's `status=` query
/// parameter being optional.
#[derive(Debug, Clone, Default)]
pub struct ExperimentFilter {
    pub phases: Vec<Phase>,
    pub owner: Option<String>,
    pub name_prefix: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub page: usize,
    pub page_size: usize,
}

impl ExperimentFilter {
    pub fn matches(&self, experiment: &Experiment) -> bool {
        if !self.phases.is_empty() && !self.phases.contains(&experiment.phase) {
            return false;
        }
        if let Some(owner) = &self.owner {
            if &experiment.owner != owner {
                return false;
            }
        }
        if let Some(prefix) = &self.name_prefix {
            if !experiment.name.starts_with(prefix.as_str()) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if experiment.created_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if experiment.created_at > until {
                return false;
            }
        }
        true
    }
}

/// Durable, key-indexed persistence for experiments and their satellite
/// records.
///
/// `update_phase` is the control plane's sole concurrency gate: it succeeds
/// only if the experiment's current phase still matches `from`, and must
/// commit atomically with the matching [`PhaseHistoryEntry`] append. Every
/// other method may assume single-writer semantics per row.
#[async_trait]
pub trait ExperimentStore: Send + Sync {
    async fn create_experiment(&self, experiment: &Experiment) -> Result<(), PhoenixError>;

    async fn get_experiment(&self, id: ExperimentId) -> Result<Experiment, PhoenixError>;

    async fn list_experiments(&self, filter: &ExperimentFilter) -> Result<Vec<Experiment>, PhoenixError>;

    /// Conditional phase transition: fails with [`PhoenixError::conflict`]
    /// if the stored phase is not `from`. Commits atomically with the
    /// corresponding phase-history append.
    async fn update_phase(
        &self,
        id: ExperimentId,
        from: Phase,
        to: Phase,
        message: &str,
        at: DateTime<Utc>,
        entry: PhaseHistoryEntry,
    ) -> Result<(), PhoenixError>;

    async fn upsert_variant_deployment(&self, deployment: &VariantDeployment) -> Result<(), PhoenixError>;

    async fn get_variant_deployments(
        &self,
        experiment_id: ExperimentId,
    ) -> Result<Vec<VariantDeployment>, PhoenixError>;

    async fn get_variant_deployment(
        &self,
        experiment_id: ExperimentId,
        variant: Variant,
    ) -> Result<VariantDeployment, PhoenixError>;

    async fn append_phase_history(&self, entry: &PhaseHistoryEntry) -> Result<(), PhoenixError>;

    async fn get_phase_history(&self, experiment_id: ExperimentId) -> Result<Vec<PhaseHistoryEntry>, PhoenixError>;

    /// Accepted only when the experiment's current phase is `analyzing` or
    /// a later (terminal) phase — writing results earlier would violate the
    /// "results populated only on leaving `analyzing`" invariant.
    async fn write_results(&self, experiment_id: ExperimentId, results: &AnalysisResult) -> Result<(), PhoenixError>;

    /// Flags an experiment whose terminal-phase teardown could not fully
    /// tear down both variants within the bounded attempt count (§4.7).
    /// Idempotent; safe to call more than once.
    async fn mark_degraded_teardown(&self, experiment_id: ExperimentId) -> Result<(), PhoenixError>;

    /// `true` once the store's own connection/migration health is
    /// confirmed, backing `GET /ready`.
    async fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{ExperimentConfig, HostId, SuccessCriteria};
    use std::time::Duration;

    fn experiment(owner: &str, name: &str) -> Experiment {
        let config = ExperimentConfig {
            baseline_pipeline: "b".into(),
            candidate_pipeline: "c".into(),
            target_hosts: vec![HostId::new("h1").unwrap()],
            duration: Duration::from_secs(30),
            variables: Default::default(),
            success_criteria: SuccessCriteria {
                min_cardinality_reduction: 0.5,
                max_cpu_overhead: 0.1,
                max_memory_overhead: 0.1,
                critical_process_coverage: 0.95,
            },
        };
        Experiment::new(name, "desc", config, owner, None).unwrap()
    }

    #[test]
    fn filter_matches_on_owner_and_name_prefix() {
        let exp = experiment("alice", "rollout-1");
        let filter = ExperimentFilter {
            owner: Some("alice".into()),
            name_prefix: Some("rollout".into()),
            ..Default::default()
        };
        assert!(filter.matches(&exp));

        let wrong_owner = ExperimentFilter { owner: Some("bob".into()), ..Default::default() };
        assert!(!wrong_owner.matches(&exp));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let exp = experiment("alice", "rollout-1");
        assert!(ExperimentFilter::default().matches(&exp));
    }
}
