// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Phase State Machine
//!
//! Owns every lifecycle transition and the side effects that follow it.
//! Every transition goes through the store's conditional `update_phase`
//! first; the side effect for a phase only runs once that write has
//! committed, so a crash between the two leaves a real, resumable phase
//! rather than a half-applied one. Analogous to the teacher's
//! `application/services/file_processor.rs` aggregating service, but
//! stateful across suspension points instead of a single pipeline run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use phoenix_domain::entities::{Actor, Experiment, PhaseHistoryEntry, Recommendation, VariantDeployment};
use phoenix_domain::repositories::ExperimentStore;
use phoenix_domain::services::analyzer::SamplePair;
use phoenix_domain::services::{Analyzer, FleetClient, GeneratorClient, MetricSamples, MetricsClient, RenderRequest, WaitReadyOutcome};
use phoenix_domain::value_objects::{ExperimentId, Phase, Variant};
use phoenix_domain::PhoenixError;

use crate::application::metric_naming::metric_query;
use crate::infrastructure::config::PhoenixConfig;
use crate::infrastructure::metrics::PhoenixMetrics;
use crate::infrastructure::retry::{self, RetryOutcome};

/// Number of best-effort teardown attempts per variant before a terminal
/// transition is left with `degraded_teardown` set for human follow-up.
const MAX_TEARDOWN_ATTEMPTS: u32 = 3;

/// Outcome of a single cancellable external step.
enum StepOutcome<T> {
    Done(T),
    Cancelled,
}

/// Drives experiments from `pending` through a terminal phase.
///
/// Depends only on the behavioral contracts (`ExperimentStore`,
/// `GeneratorClient`, `FleetClient`, `MetricsClient`, `Analyzer`), never on
/// a concrete adapter — production wires HTTP/SQLite implementations,
/// tests wire in-memory stubs.
pub struct PhaseStateMachine {
    store: Arc<dyn ExperimentStore>,
    generator: Arc<dyn GeneratorClient>,
    fleet: Arc<dyn FleetClient>,
    metrics: Arc<dyn MetricsClient>,
    analyzer: Arc<dyn Analyzer>,
    operational_metrics: Arc<PhoenixMetrics>,
    deploy_timeout: std::time::Duration,
    metrics_step: chrono::Duration,
}

impl PhaseStateMachine {
    pub fn new(
        store: Arc<dyn ExperimentStore>,
        generator: Arc<dyn GeneratorClient>,
        fleet: Arc<dyn FleetClient>,
        metrics: Arc<dyn MetricsClient>,
        analyzer: Arc<dyn Analyzer>,
        operational_metrics: Arc<PhoenixMetrics>,
        config: &PhoenixConfig,
    ) -> Self {
        Self {
            store,
            generator,
            fleet,
            metrics,
            analyzer,
            operational_metrics,
            deploy_timeout: config.deploy_timeout,
            metrics_step: chrono::Duration::from_std(config.metrics_query_timeout)
                .unwrap_or_else(|_| chrono::Duration::seconds(10)),
        }
    }

    /// Conditional transition plus the matching history append, committed
    /// atomically by the store. Re-fetches the experiment afterward so
    /// callers see the freshly applied timestamps. Terminal phases trigger
    /// best-effort teardown of both variants before returning.
    async fn transition(
        &self,
        id: ExperimentId,
        from: Phase,
        to: Phase,
        message: &str,
        actor: Actor,
    ) -> Result<Experiment, PhoenixError> {
        if !from.can_transition_to(to) {
            return Err(PhoenixError::validation(format!("illegal phase transition: {from} -> {to}")));
        }
        let entry = PhaseHistoryEntry::new(id, from, to, message, actor);
        if let Err(error) = self.store.update_phase(id, from, to, message, Utc::now(), entry).await {
            self.operational_metrics.record_transition_failure();
            return Err(error);
        }
        self.operational_metrics.record_phase_transition(to);
        let experiment = self.store.get_experiment(id).await?;
        if to.is_terminal() {
            self.teardown_both(id).await;
        }
        Ok(experiment)
    }

    async fn cancellable<T>(
        cancel: &CancellationToken,
        fut: impl std::future::Future<Output = Result<T, PhoenixError>>,
    ) -> Result<StepOutcome<T>, PhoenixError> {
        tokio::select! {
            _ = cancel.cancelled() => Ok(StepOutcome::Cancelled),
            result = fut => result.map(StepOutcome::Done),
        }
    }

    /// Like [`Self::cancellable`], but retries a `transient`-classified
    /// failure with bounded exponential backoff before giving up, per the
    /// deploy-chain's retry budget. Non-retryable errors and cancellation
    /// both return immediately, same as a single un-retried attempt would.
    async fn cancellable_retry<T, F, Fut>(cancel: &CancellationToken, operation: F) -> Result<StepOutcome<T>, PhoenixError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PhoenixError>>,
    {
        match retry::retry_transient(cancel, operation).await {
            RetryOutcome::Settled(Ok(value)) => Ok(StepOutcome::Done(value)),
            RetryOutcome::Settled(Err(error)) => Err(error),
            RetryOutcome::Cancelled => Ok(StepOutcome::Cancelled),
        }
    }

    /// Best-effort, idempotent teardown of both variants. Failures are
    /// logged and bounded rather than retried indefinitely; if either
    /// variant never tears down within the attempt budget the experiment is
    /// flagged `degraded_teardown` for an operator to clean up by hand.
    async fn teardown_both(&self, id: ExperimentId) {
        let mut fully_torn_down = true;
        for variant in [Variant::Baseline, Variant::Candidate] {
            let mut succeeded = false;
            for attempt in 1..=MAX_TEARDOWN_ATTEMPTS {
                match self.fleet.teardown(id, variant).await {
                    Ok(()) => {
                        succeeded = true;
                        break;
                    }
                    Err(error) => {
                        tracing::warn!(experiment_id = %id, %variant, attempt, %error, "teardown attempt failed");
                    }
                }
            }
            fully_torn_down &= succeeded;
        }
        if !fully_torn_down {
            self.operational_metrics.record_retry_exhaustion();
            if let Err(error) = self.store.mark_degraded_teardown(id).await {
                tracing::warn!(experiment_id = %id, %error, "failed to record degraded teardown");
            }
        }
    }

    /// `pending → initializing` only, with no side effects. Split out from
    /// [`Self::start`] so a request-handling thread can perform the
    /// transition synchronously and hand the side effects off to a
    /// cancellable background task instead of blocking the caller on the
    /// full deploy chain.
    pub async fn begin_initializing(&self, id: ExperimentId, actor: Actor) -> Result<Experiment, PhoenixError> {
        self.transition(id, Phase::Pending, Phase::Initializing, "starting initialization", actor).await
    }

    /// `pending → initializing`, then runs the initialization side effects
    /// inline. Callers that want the scheduler's non-blocking behavior
    /// should run this inside a cancellable task rather than awaiting it
    /// directly on a request-handling thread.
    pub async fn start(&self, id: ExperimentId, actor: Actor, cancel: CancellationToken) -> Result<(), PhoenixError> {
        let experiment = self.begin_initializing(id, actor).await?;
        self.run_initializing(experiment, cancel).await
    }

    async fn run_initializing(&self, experiment: Experiment, cancel: CancellationToken) -> Result<(), PhoenixError> {
        let id = experiment.id;
        match self.deploy_both_variants(&experiment, &cancel).await {
            Ok(StepOutcome::Done(())) => {
                self.transition(id, Phase::Initializing, Phase::Running, "both variants ready", Actor::Scheduler).await?;
                Ok(())
            }
            Ok(StepOutcome::Cancelled) => self.cancel(id, Actor::User).await,
            Err(error) => {
                self.transition(id, Phase::Initializing, Phase::Failed, &error.to_string(), Actor::Scheduler).await?;
                Ok(())
            }
        }
    }

    /// Re-drives the `initializing` side effects for an experiment already
    /// in that phase — used by the scheduler to resume a chain whose
    /// original in-process task was lost to a restart. Safe to call
    /// repeatedly: every step it performs is idempotent on retry.
    pub async fn resume_initializing(&self, id: ExperimentId, cancel: CancellationToken) -> Result<(), PhoenixError> {
        let experiment = self.store.get_experiment(id).await?;
        self.run_initializing(experiment, cancel).await
    }

    /// Forces a non-terminal experiment to `failed` with the given reason,
    /// for scheduler-driven timeout handling (e.g. `initializing` stuck
    /// past `initialization_timeout`).
    pub async fn fail(&self, id: ExperimentId, from: Phase, reason: &str) -> Result<(), PhoenixError> {
        self.transition(id, from, Phase::Failed, reason, Actor::Scheduler).await?;
        Ok(())
    }

    /// Validates both templates, renders (or reuses an already-rendered
    /// config id, making retries idempotent), deploys both variants, and
    /// waits for both to report ready. Every suspension point is cancellable.
    async fn deploy_both_variants(
        &self,
        experiment: &Experiment,
        cancel: &CancellationToken,
    ) -> Result<StepOutcome<()>, PhoenixError> {
        let config = &experiment.config;
        let namespace = experiment.id.to_string();

        let validate = || async {
            self.generator.validate_template(&config.baseline_pipeline, &config.variables).await?;
            self.generator.validate_template(&config.candidate_pipeline, &config.variables).await?;
            Ok::<(), PhoenixError>(())
        };
        if let StepOutcome::Cancelled = Self::cancellable_retry(cancel, validate).await? {
            return Ok(StepOutcome::Cancelled);
        }

        let existing = self.store.get_variant_deployments(experiment.id).await.unwrap_or_default();
        let baseline_existing = existing.iter().find(|d| d.variant == Variant::Baseline).cloned();
        let candidate_existing = existing.iter().find(|d| d.variant == Variant::Candidate).cloned();

        let (baseline_config_id, candidate_config_id) = if let (Some(b), Some(c)) =
            (&baseline_existing, &candidate_existing)
        {
            (b.config_id.clone(), c.config_id.clone())
        } else {
            let render = || async {
                self.generator
                    .render(RenderRequest {
                        experiment_id: experiment.id,
                        baseline_name: config.baseline_pipeline.clone(),
                        candidate_name: config.candidate_pipeline.clone(),
                        target_hosts: config.target_hosts.clone(),
                        variables: config.variables.clone(),
                    })
                    .await
            };
            let response = match Self::cancellable_retry(cancel, render).await? {
                StepOutcome::Done(r) => r,
                StepOutcome::Cancelled => return Ok(StepOutcome::Cancelled),
            };
            let baseline_dep = VariantDeployment::new(
                experiment.id,
                Variant::Baseline,
                response.baseline_config_id.clone(),
                config.target_hosts.clone(),
                namespace.clone(),
            );
            let candidate_dep = VariantDeployment::new(
                experiment.id,
                Variant::Candidate,
                response.candidate_config_id.clone(),
                config.target_hosts.clone(),
                namespace.clone(),
            );
            self.store.upsert_variant_deployment(&baseline_dep).await?;
            self.store.upsert_variant_deployment(&candidate_dep).await?;
            (response.baseline_config_id, response.candidate_config_id)
        };

        for (variant, config_id) in [(Variant::Baseline, &baseline_config_id), (Variant::Candidate, &candidate_config_id)] {
            let deploy = || self.fleet.deploy(experiment.id, variant, config_id, &config.target_hosts, &config.variables, &namespace);
            if let StepOutcome::Cancelled = Self::cancellable_retry(cancel, deploy).await? {
                return Ok(StepOutcome::Cancelled);
            }
        }

        for variant in [Variant::Baseline, Variant::Candidate] {
            let wait = || self.fleet.wait_ready(experiment.id, variant, &namespace, self.deploy_timeout);
            let outcome = match Self::cancellable_retry(cancel, wait).await? {
                StepOutcome::Done(o) => o,
                StepOutcome::Cancelled => return Ok(StepOutcome::Cancelled),
            };
            match outcome {
                WaitReadyOutcome::Ready => {
                    let mut deployment = self.store.get_variant_deployment(experiment.id, variant).await?;
                    deployment.record_readiness(config.target_hosts.len());
                    self.store.upsert_variant_deployment(&deployment).await?;
                }
                WaitReadyOutcome::Degraded { ready, total } => {
                    let mut deployment = self.store.get_variant_deployment(experiment.id, variant).await?;
                    deployment.record_readiness(ready);
                    self.store.upsert_variant_deployment(&deployment).await?;
                    return Err(PhoenixError::unrecoverable(format!(
                        "{variant} deployment degraded: {ready}/{total} hosts ready"
                    )));
                }
                WaitReadyOutcome::TimedOut => {
                    return Err(PhoenixError::unrecoverable(format!(
                        "{variant} deployment timed out waiting for readiness"
                    )));
                }
                WaitReadyOutcome::Failed { reason } => {
                    let mut deployment = self.store.get_variant_deployment(experiment.id, variant).await?;
                    deployment.record_failure(reason.clone());
                    self.store.upsert_variant_deployment(&deployment).await?;
                    return Err(PhoenixError::unrecoverable(format!("{variant} deployment failed: {reason}")));
                }
            }
        }

        Ok(StepOutcome::Done(()))
    }

    /// `running → analyzing`, invoked once the scheduler observes
    /// `started_at + duration` has elapsed.
    pub async fn advance_to_analyzing(&self, id: ExperimentId, cancel: CancellationToken) -> Result<(), PhoenixError> {
        let experiment =
            self.transition(id, Phase::Running, Phase::Analyzing, "duration elapsed, analyzing", Actor::Scheduler).await?;
        self.run_analysis(experiment, cancel).await
    }

    /// Re-drives the `analyzing` side effects for an experiment already in
    /// that phase, mirroring [`Self::resume_initializing`] for the
    /// analysis window.
    pub async fn resume_analysis(&self, id: ExperimentId, cancel: CancellationToken) -> Result<(), PhoenixError> {
        let experiment = self.store.get_experiment(id).await?;
        self.run_analysis(experiment, cancel).await
    }

    async fn run_analysis(&self, experiment: Experiment, cancel: CancellationToken) -> Result<(), PhoenixError> {
        let id = experiment.id;
        let from = experiment.started_at.unwrap_or(experiment.created_at);
        let to = Utc::now();

        let collect = self.collect_samples(id, from, to);
        let samples = match Self::cancellable(&cancel, collect).await? {
            StepOutcome::Done(s) => s,
            // The phase graph has no `analyzing → cancelled` edge — sampling
            // already started, so a cancellation request here resolves the
            // experiment to `failed` rather than abandoning it mid-analysis.
            StepOutcome::Cancelled => {
                self.transition(id, Phase::Analyzing, Phase::Failed, "cancelled during analysis", Actor::User).await?;
                return Ok(());
            }
        };

        let results = match self.analyzer.analyze(&samples, &experiment.config.success_criteria) {
            Ok(r) => r,
            Err(error) => {
                self.transition(id, Phase::Analyzing, Phase::Failed, &error.to_string(), Actor::Scheduler).await?;
                return Ok(());
            }
        };

        self.store.write_results(id, &results).await?;

        // The phase graph has no edge from `analyzing` back to `running`,
        // so `continue` has nowhere to go but `completed` — same resolution
        // already adopted for `neutral`, just with a message that points at
        // a follow-up experiment instead of a caution note.
        let (to_phase, message): (Phase, String) = match results.recommendation {
            Recommendation::Promote => {
                (Phase::Completed, "promoted: success criteria met with high confidence".into())
            }
            Recommendation::Reject => {
                (Phase::Failed, "rejected: a success criterion failed or quality regressed".into())
            }
            Recommendation::Neutral => {
                (Phase::Completed, "neutral result: no clear winner, review recommended".into())
            }
            Recommendation::Continue => {
                (Phase::Completed, "inconclusive: confidence too low, consider a follow-up experiment".into())
            }
        };
        self.transition(id, Phase::Analyzing, to_phase, &message, Actor::Scheduler).await?;
        Ok(())
    }

    async fn collect_samples(&self, id: ExperimentId, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<MetricSamples, PhoenixError> {
        let cpu = self.sample_pair(id, "cpu_usage_ratio", from, to).await?;
        let memory = self.sample_pair(id, "memory_usage_ratio", from, to).await?;
        let process_count = self.sample_pair(id, "process_count", from, to).await?;
        let error_rate = self.sample_pair(id, "error_rate", from, to).await?;

        let baseline_unique_series = self
            .metrics
            .instant(&metric_query(id, Variant::Baseline, "unique_series_count"), to)
            .await?
            .unwrap_or(0.0);
        let candidate_unique_series = self
            .metrics
            .instant(&metric_query(id, Variant::Candidate, "unique_series_count"), to)
            .await?
            .unwrap_or(0.0);
        let process_coverage = self
            .metrics
            .instant(&metric_query(id, Variant::Candidate, "critical_process_coverage"), to)
            .await?
            .unwrap_or(0.0);

        Ok(MetricSamples { cpu, memory, process_count, error_rate, baseline_unique_series, candidate_unique_series, process_coverage })
    }

    async fn sample_pair(&self, id: ExperimentId, metric: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<SamplePair, PhoenixError> {
        let baseline = self.metrics.range(&metric_query(id, Variant::Baseline, metric), from, to, self.metrics_step).await?;
        let candidate = self.metrics.range(&metric_query(id, Variant::Candidate, metric), from, to, self.metrics_step).await?;
        Ok(SamplePair {
            baseline: baseline.into_iter().map(|p| p.value).collect(),
            candidate: candidate.into_iter().map(|p| p.value).collect(),
        })
    }

    /// Cancels a `pending`, `initializing`, or `running` experiment. A
    /// no-op if it has already reached a terminal phase; returns a
    /// `validation` error for `analyzing`, since the phase graph has no
    /// `analyzing → cancelled` edge — once sampling starts, the experiment
    /// runs to a result instead of being abandoned mid-analysis.
    pub async fn cancel(&self, id: ExperimentId, actor: Actor) -> Result<(), PhoenixError> {
        let experiment = self.store.get_experiment(id).await?;
        if experiment.is_terminal() {
            return Ok(());
        }
        if !experiment.phase.can_transition_to(Phase::Cancelled) {
            return Err(PhoenixError::validation(format!("cannot cancel an experiment in phase {}", experiment.phase)));
        }
        self.transition(id, experiment.phase, Phase::Cancelled, "cancelled", actor).await?;
        Ok(())
    }
}
