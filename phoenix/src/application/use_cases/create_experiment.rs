// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Create-experiment use case: validates the requested configuration,
//! assigns an id, and persists the new experiment in `pending`. Also
//! appends a `pending → pending` history entry marking the experiment's
//! birth, so the audit trail has a record from the moment it exists rather
//! than starting at whatever transition happens to fire first.

use std::sync::Arc;

use phoenix_domain::entities::{Actor, Experiment, PhaseHistoryEntry};
use phoenix_domain::repositories::ExperimentStore;
use phoenix_domain::value_objects::{ExperimentConfig, Phase};
use phoenix_domain::PhoenixError;

use crate::application::commands::CreateExperimentCommand;

pub struct CreateExperimentUseCase {
    store: Arc<dyn ExperimentStore>,
}

impl CreateExperimentUseCase {
    pub fn new(store: Arc<dyn ExperimentStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, command: CreateExperimentCommand) -> Result<Experiment, PhoenixError> {
        let config = ExperimentConfig {
            baseline_pipeline: command.baseline_pipeline,
            candidate_pipeline: command.candidate_pipeline,
            target_hosts: command.target_hosts,
            duration: command.duration,
            variables: command.variables,
            success_criteria: command.success_criteria,
        };

        let experiment = Experiment::new(command.name, command.description, config, command.owner, None)?;
        self.store.create_experiment(&experiment).await?;

        let created = PhaseHistoryEntry::new(experiment.id, Phase::Pending, Phase::Pending, "created", Actor::Api);
        self.store.append_phase_history(&created).await?;

        tracing::info!(experiment_id = %experiment.id, "created experiment");
        Ok(experiment)
    }
}
