// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Experiment Controller
//!
//! The single entry point the HTTP layer calls. Fronts the seven use cases
//! under [`crate::application::use_cases`] so `infrastructure::http` depends
//! on one struct instead of wiring each use case's collaborators by hand —
//! the same shape as the teacher's `PipelineService` aggregating its own
//! per-operation use cases behind one façade.

use std::sync::Arc;

use phoenix_domain::entities::{AnalysisResult, Experiment};
use phoenix_domain::repositories::ExperimentStore;
use phoenix_domain::services::{Analyzer, FleetClient, GeneratorClient, MetricsClient};
use phoenix_domain::value_objects::ExperimentId;
use phoenix_domain::PhoenixError;

use crate::application::commands::{CreateExperimentCommand, ListExperimentsCommand};
use crate::application::services::state_machine::PhaseStateMachine;
use crate::application::use_cases::get_metrics::{MetricsQuery, MetricsSeries};
use crate::application::use_cases::{
    CreateExperimentUseCase, GetAnalysisUseCase, GetExperimentUseCase, GetMetricsUseCase, ListExperimentsUseCase,
    StartExperimentUseCase, StopExperimentUseCase,
};
use crate::infrastructure::config::PhoenixConfig;
use crate::infrastructure::metrics::PhoenixMetrics;
use crate::infrastructure::runtime::ExperimentTaskPool;

pub struct ExperimentController {
    store: Arc<dyn ExperimentStore>,
    create_experiment: CreateExperimentUseCase,
    get_experiment: GetExperimentUseCase,
    list_experiments: ListExperimentsUseCase,
    start_experiment: StartExperimentUseCase,
    stop_experiment: StopExperimentUseCase,
    get_analysis: GetAnalysisUseCase,
    get_metrics: GetMetricsUseCase,
}

impl ExperimentController {
    /// Wires every use case from the same collaborators the composition
    /// root builds once at startup: one store, one state machine, one task
    /// pool, shared between the controller and the scheduler.
    pub fn new(
        store: Arc<dyn ExperimentStore>,
        generator: Arc<dyn GeneratorClient>,
        fleet: Arc<dyn FleetClient>,
        metrics: Arc<dyn MetricsClient>,
        analyzer: Arc<dyn Analyzer>,
        task_pool: Arc<ExperimentTaskPool>,
        operational_metrics: Arc<PhoenixMetrics>,
        config: &PhoenixConfig,
    ) -> Self {
        let state_machine = Arc::new(PhaseStateMachine::new(
            Arc::clone(&store),
            generator,
            fleet,
            Arc::clone(&metrics),
            analyzer,
            operational_metrics,
            config,
        ));
        Self::from_parts(store, metrics, state_machine, task_pool)
    }

    /// Builds the controller directly from an already-constructed state
    /// machine, so the composition root can share the exact instance the
    /// scheduler also drives rather than building a second one.
    pub fn from_parts(
        store: Arc<dyn ExperimentStore>,
        metrics: Arc<dyn MetricsClient>,
        state_machine: Arc<PhaseStateMachine>,
        task_pool: Arc<ExperimentTaskPool>,
    ) -> Self {
        Self {
            store: Arc::clone(&store),
            create_experiment: CreateExperimentUseCase::new(Arc::clone(&store)),
            get_experiment: GetExperimentUseCase::new(Arc::clone(&store)),
            list_experiments: ListExperimentsUseCase::new(Arc::clone(&store)),
            start_experiment: StartExperimentUseCase::new(Arc::clone(&state_machine), Arc::clone(&task_pool)),
            stop_experiment: StopExperimentUseCase::new(state_machine, task_pool),
            get_analysis: GetAnalysisUseCase::new(Arc::clone(&store)),
            get_metrics: GetMetricsUseCase::new(metrics),
        }
    }

    /// Backs `GET /ready`: `true` once the store's own connection/migration
    /// health is confirmed.
    pub async fn is_ready(&self) -> bool {
        self.store.is_ready().await
    }

    pub async fn create_experiment(&self, command: CreateExperimentCommand) -> Result<Experiment, PhoenixError> {
        self.create_experiment.execute(command).await
    }

    pub async fn get_experiment(&self, id: ExperimentId) -> Result<Experiment, PhoenixError> {
        self.get_experiment.execute(id).await
    }

    pub async fn list_experiments(&self, command: ListExperimentsCommand) -> Result<Vec<Experiment>, PhoenixError> {
        self.list_experiments.execute(command).await
    }

    pub async fn start_experiment(&self, id: ExperimentId) -> Result<Experiment, PhoenixError> {
        self.start_experiment.execute(id).await
    }

    pub async fn stop_experiment(&self, id: ExperimentId) -> Result<(), PhoenixError> {
        self.stop_experiment.execute(id).await
    }

    pub async fn get_analysis(&self, id: ExperimentId) -> Result<AnalysisResult, PhoenixError> {
        self.get_analysis.execute(id).await
    }

    pub async fn get_metrics(&self, id: ExperimentId, query: MetricsQuery) -> Result<MetricsSeries, PhoenixError> {
        self.get_metrics.execute(id, query).await
    }
}
