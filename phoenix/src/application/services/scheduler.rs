// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Scheduler
//!
//! A periodic reconciler: on every tick it lists non-terminal experiments
//! and, for each, decides the desired next action purely from phase and
//! wall-clock timestamps — never from in-process timers, so a restart
//! loses no progress. Conflicts from the state machine mean another
//! reconciler already won the race and are logged, not retried.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use phoenix_domain::entities::{Actor, Experiment};
use phoenix_domain::repositories::{ExperimentFilter, ExperimentStore};
use phoenix_domain::value_objects::Phase;

use crate::application::services::state_machine::PhaseStateMachine;
use crate::infrastructure::metrics::PhoenixMetrics;
use crate::infrastructure::runtime::ExperimentTaskPool;

pub struct Scheduler {
    store: Arc<dyn ExperimentStore>,
    state_machine: Arc<PhaseStateMachine>,
    task_pool: Arc<ExperimentTaskPool>,
    operational_metrics: Arc<PhoenixMetrics>,
    tick_interval: Duration,
    initialization_timeout: chrono::Duration,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn ExperimentStore>,
        state_machine: Arc<PhaseStateMachine>,
        task_pool: Arc<ExperimentTaskPool>,
        operational_metrics: Arc<PhoenixMetrics>,
        tick_interval: Duration,
        initialization_timeout: Duration,
    ) -> Self {
        Self {
            store,
            state_machine,
            task_pool,
            operational_metrics,
            tick_interval,
            initialization_timeout: chrono::Duration::from_std(initialization_timeout)
                .unwrap_or_else(|_| chrono::Duration::minutes(10)),
        }
    }

    /// Runs reconciliation ticks until `shutdown` fires. A tick that
    /// overruns `tick_interval` is allowed to finish; the next tick is
    /// skipped rather than queued, since [`tokio::time::interval`]'s
    /// default `MissedTickBehavior` already bounds the skew this way.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("scheduler: shutdown requested, stopping reconciliation loop");
                    return;
                }
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    pub async fn tick(&self) {
        self.operational_metrics.record_reconciliation_tick();
        let filter = ExperimentFilter {
            phases: vec![Phase::Pending, Phase::Initializing, Phase::Running, Phase::Analyzing],
            ..Default::default()
        };
        let experiments = match self.store.list_experiments(&filter).await {
            Ok(experiments) => experiments,
            Err(error) => {
                tracing::warn!(%error, "scheduler: failed to list non-terminal experiments");
                return;
            }
        };
        tracing::debug!(count = experiments.len(), "scheduler: reconciling non-terminal experiments");
        for experiment in experiments {
            self.reconcile_one(experiment).await;
        }
    }

    async fn reconcile_one(&self, experiment: Experiment) {
        let id = experiment.id;
        let now = Utc::now();

        match experiment.phase {
            Phase::Pending => {
                let state_machine = Arc::clone(&self.state_machine);
                self.task_pool.spawn(id, move |cancel| async move {
                    if let Err(error) = state_machine.start(id, Actor::Scheduler, cancel).await {
                        if !error.is_conflict() {
                            tracing::warn!(experiment_id = %id, %error, "scheduler: start failed");
                        }
                    }
                });
            }
            Phase::Initializing => {
                if self.task_pool.is_active(id) {
                    return;
                }
                if now.signed_duration_since(experiment.updated_at) > self.initialization_timeout {
                    if let Err(error) = self.state_machine.fail(id, Phase::Initializing, "initialization timed out").await {
                        if !error.is_conflict() {
                            tracing::warn!(experiment_id = %id, %error, "scheduler: failed to fail timed-out initialization");
                        }
                    }
                    return;
                }
                let state_machine = Arc::clone(&self.state_machine);
                self.task_pool.spawn(id, move |cancel| async move {
                    if let Err(error) = state_machine.resume_initializing(id, cancel).await {
                        if !error.is_conflict() {
                            tracing::warn!(experiment_id = %id, %error, "scheduler: resume_initializing failed");
                        }
                    }
                });
            }
            Phase::Running => {
                let Some(started_at) = experiment.started_at else { return };
                let duration = chrono::Duration::from_std(experiment.config.duration).unwrap_or_default();
                if now < started_at + duration {
                    return;
                }
                let state_machine = Arc::clone(&self.state_machine);
                self.task_pool.spawn(id, move |cancel| async move {
                    if let Err(error) = state_machine.advance_to_analyzing(id, cancel).await {
                        if !error.is_conflict() {
                            tracing::warn!(experiment_id = %id, %error, "scheduler: advance_to_analyzing failed");
                        }
                    }
                });
            }
            Phase::Analyzing => {
                if self.task_pool.is_active(id) {
                    return;
                }
                let state_machine = Arc::clone(&self.state_machine);
                self.task_pool.spawn(id, move |cancel| async move {
                    if let Err(error) = state_machine.resume_analysis(id, cancel).await {
                        if !error.is_conflict() {
                            tracing::warn!(experiment_id = %id, %error, "scheduler: resume_analysis failed");
                        }
                    }
                });
            }
            Phase::Completed | Phase::Failed | Phase::Cancelled => {}
        }
    }
}
