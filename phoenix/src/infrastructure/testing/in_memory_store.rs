// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! An [`ExperimentStore`] backed entirely by in-process maps, used by the
//! end-to-end scenario tests in `phoenix/tests/`. Mirrors the conditional
//! `update_phase` semantics of [`crate::infrastructure::repositories::sqlite_store::SqliteExperimentStore`]
//! exactly, so a test exercising concurrency conflicts behaves the same
//! against either backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use phoenix_domain::entities::{AnalysisResult, Experiment, PhaseHistoryEntry, VariantDeployment};
use phoenix_domain::repositories::{ExperimentFilter, ExperimentStore};
use phoenix_domain::value_objects::{ExperimentId, Phase, Variant};
use phoenix_domain::PhoenixError;

#[derive(Default)]
struct State {
    experiments: HashMap<ExperimentId, Experiment>,
    deployments: HashMap<(ExperimentId, Variant), VariantDeployment>,
    history: Vec<PhaseHistoryEntry>,
}

/// A single-process, `Mutex`-guarded stand-in for the durable store.
/// Deliberately synchronous internally — there is no I/O to await — but
/// exposes the same `async` surface as the real adapter.
pub struct InMemoryExperimentStore {
    state: Mutex<State>,
}

impl InMemoryExperimentStore {
    pub fn new() -> Self {
        Self { state: Mutex::new(State::default()) }
    }
}

impl Default for InMemoryExperimentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExperimentStore for InMemoryExperimentStore {
    async fn create_experiment(&self, experiment: &Experiment) -> Result<(), PhoenixError> {
        let mut state = self.state.lock().unwrap();
        if state.experiments.contains_key(&experiment.id) {
            return Err(PhoenixError::conflict(format!("experiment {} already exists", experiment.id)));
        }
        state.experiments.insert(experiment.id, experiment.clone());
        Ok(())
    }

    async fn get_experiment(&self, id: ExperimentId) -> Result<Experiment, PhoenixError> {
        let state = self.state.lock().unwrap();
        state
            .experiments
            .get(&id)
            .cloned()
            .ok_or_else(|| PhoenixError::not_found(format!("experiment {id} not found")))
    }

    async fn list_experiments(&self, filter: &ExperimentFilter) -> Result<Vec<Experiment>, PhoenixError> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<Experiment> =
            state.experiments.values().filter(|e| filter.matches(e)).cloned().collect();
        matching.sort_by_key(|e| e.created_at);

        let page_size = if filter.page_size == 0 { matching.len().max(1) } else { filter.page_size };
        let start = filter.page.saturating_mul(page_size).min(matching.len());
        let end = (start + page_size).min(matching.len());
        Ok(matching.drain(start..end).collect())
    }

    async fn update_phase(
        &self,
        id: ExperimentId,
        from: Phase,
        to: Phase,
        message: &str,
        _at: DateTime<Utc>,
        entry: PhaseHistoryEntry,
    ) -> Result<(), PhoenixError> {
        let mut state = self.state.lock().unwrap();
        let current_phase = {
            let experiment = state
                .experiments
                .get(&id)
                .ok_or_else(|| PhoenixError::not_found(format!("experiment {id} not found")))?;
            experiment.phase
        };
        if current_phase != from {
            return Err(PhoenixError::conflict(format!(
                "experiment {id} is in phase {current_phase}, expected {from}"
            )));
        }
        let experiment = state.experiments.get_mut(&id).expect("checked above");
        experiment.apply_transition(to, message);
        state.history.push(entry);
        Ok(())
    }

    async fn upsert_variant_deployment(&self, deployment: &VariantDeployment) -> Result<(), PhoenixError> {
        let mut state = self.state.lock().unwrap();
        state.deployments.insert((deployment.experiment_id, deployment.variant), deployment.clone());
        Ok(())
    }

    async fn get_variant_deployments(
        &self,
        experiment_id: ExperimentId,
    ) -> Result<Vec<VariantDeployment>, PhoenixError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .deployments
            .values()
            .filter(|d| d.experiment_id == experiment_id)
            .cloned()
            .collect())
    }

    async fn get_variant_deployment(
        &self,
        experiment_id: ExperimentId,
        variant: Variant,
    ) -> Result<VariantDeployment, PhoenixError> {
        let state = self.state.lock().unwrap();
        state
            .deployments
            .get(&(experiment_id, variant))
            .cloned()
            .ok_or_else(|| PhoenixError::not_found(format!("no {variant} deployment for {experiment_id}")))
    }

    async fn append_phase_history(&self, entry: &PhaseHistoryEntry) -> Result<(), PhoenixError> {
        let mut state = self.state.lock().unwrap();
        state.history.push(entry.clone());
        Ok(())
    }

    async fn get_phase_history(&self, experiment_id: ExperimentId) -> Result<Vec<PhaseHistoryEntry>, PhoenixError> {
        let state = self.state.lock().unwrap();
        Ok(state.history.iter().filter(|e| e.experiment_id == experiment_id).cloned().collect())
    }

    async fn write_results(&self, experiment_id: ExperimentId, results: &AnalysisResult) -> Result<(), PhoenixError> {
        let mut state = self.state.lock().unwrap();
        let experiment = state
            .experiments
            .get_mut(&experiment_id)
            .ok_or_else(|| PhoenixError::not_found(format!("experiment {experiment_id} not found")))?;
        if experiment.phase != Phase::Analyzing && !experiment.phase.is_terminal() {
            return Err(PhoenixError::conflict(format!(
                "cannot write results for experiment {experiment_id} in phase {}",
                experiment.phase
            )));
        }
        experiment.attach_results(results.clone());
        Ok(())
    }

    async fn mark_degraded_teardown(&self, experiment_id: ExperimentId) -> Result<(), PhoenixError> {
        let mut state = self.state.lock().unwrap();
        let experiment = state
            .experiments
            .get_mut(&experiment_id)
            .ok_or_else(|| PhoenixError::not_found(format!("experiment {experiment_id} not found")))?;
        experiment.mark_degraded_teardown();
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phoenix_domain::entities::Actor;
    use phoenix_domain::value_objects::{ExperimentConfig, HostId, SuccessCriteria};
    use std::time::Duration;

    fn config() -> ExperimentConfig {
        ExperimentConfig {
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
        }
    }

    #[tokio::test]
    async fn update_phase_rejects_stale_from() {
        let store = InMemoryExperimentStore::new();
        let exp = Experiment::new("exp-1", "desc", config(), "alice", None).unwrap();
        store.create_experiment(&exp).await.unwrap();

        let entry = PhaseHistoryEntry::new(exp.id, Phase::Pending, Phase::Initializing, "go", Actor::Scheduler);
        store
            .update_phase(exp.id, Phase::Pending, Phase::Initializing, "go", Utc::now(), entry)
            .await
            .unwrap();

        let stale_entry =
            PhaseHistoryEntry::new(exp.id, Phase::Pending, Phase::Cancelled, "late cancel", Actor::User);
        let result = store
            .update_phase(exp.id, Phase::Pending, Phase::Cancelled, "late cancel", Utc::now(), stale_entry)
            .await;
        assert!(matches!(result, Err(e) if e.is_conflict()));
    }

    #[tokio::test]
    async fn list_experiments_paginates() {
        let store = InMemoryExperimentStore::new();
        for i in 0..3 {
            let exp = Experiment::new(format!("exp-{i}"), "desc", config(), "alice", None).unwrap();
            store.create_experiment(&exp).await.unwrap();
        }
        let filter = ExperimentFilter { page: 0, page_size: 2, ..Default::default() };
        let page = store.list_experiments(&filter).await.unwrap();
        assert_eq!(page.len(), 2);
    }
}
