// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end lifecycle scenarios, driven entirely through
//! [`PhaseStateMachine`] against the in-memory store and stub
//! collaborators — no network, no SQLite, no real clock dependency.

use std::sync::Arc;
use std::time::Duration;

use phoenix::application::services::state_machine::PhaseStateMachine;
use phoenix::infrastructure::config::PhoenixConfig;
use phoenix::infrastructure::metrics::PhoenixMetrics;
use phoenix::infrastructure::testing::stub_fleet::FleetBehavior;
use phoenix::infrastructure::testing::{InMemoryExperimentStore, StubFleetClient, StubGeneratorClient, StubMetricsClient};

use phoenix_domain::entities::{Actor, Experiment, Recommendation};
use phoenix_domain::repositories::ExperimentStore;
use phoenix_domain::services::analyzer::WelchAnalyzer;
use phoenix_domain::services::Analyzer;
use phoenix_domain::value_objects::{ExperimentConfig, HostId, Phase, SuccessCriteria};

fn config(duration: Duration) -> ExperimentConfig {
    ExperimentConfig {
        baseline_pipeline: "baseline-template".into(),
        candidate_pipeline: "candidate-template".into(),
        target_hosts: vec![HostId::new("h1").unwrap(), HostId::new("h2").unwrap()],
        duration,
        variables: Default::default(),
        success_criteria: SuccessCriteria {
            min_cardinality_reduction: 0.5,
            max_cpu_overhead: 0.1,
            max_memory_overhead: 0.1,
            critical_process_coverage: 0.95,
        },
    }
}

/// Seeds baseline/candidate series for every metric the analysis window
/// queries, varied enough to give Welch's test a non-zero variance so
/// confidence is actually driven by the numbers rather than defaulting to
/// zero on a degenerate all-identical series.
fn seed_metrics(metrics: &StubMetricsClient, id: phoenix_domain::value_objects::ExperimentId, baseline_cpu: f64, candidate_cpu: f64) {
    use phoenix::application::metric_naming::metric_query;
    use phoenix_domain::value_objects::Variant;

    let n = 30;
    let jitter = |base: f64, i: usize| base + (i as f64 % 3.0) * 0.0005;

    metrics.seed(
        metric_query(id, Variant::Baseline, "cpu_usage_ratio"),
        (0..n).map(|i| jitter(baseline_cpu, i)).collect(),
    );
    metrics.seed(
        metric_query(id, Variant::Candidate, "cpu_usage_ratio"),
        (0..n).map(|i| jitter(candidate_cpu, i)).collect(),
    );
    metrics.seed(metric_query(id, Variant::Baseline, "memory_usage_ratio"), (0..n).map(|i| jitter(0.30, i)).collect());
    metrics.seed(metric_query(id, Variant::Candidate, "memory_usage_ratio"), (0..n).map(|i| jitter(0.29, i)).collect());
    metrics.seed(metric_query(id, Variant::Baseline, "process_count"), (0..n).map(|i| jitter(500.0, i)).collect());
    metrics.seed(metric_query(id, Variant::Candidate, "process_count"), (0..n).map(|i| jitter(480.0, i)).collect());
    metrics.seed(metric_query(id, Variant::Baseline, "error_rate"), (0..n).map(|i| jitter(0.01, i)).collect());
    metrics.seed(metric_query(id, Variant::Candidate, "error_rate"), (0..n).map(|i| jitter(0.01, i)).collect());
    metrics.seed(metric_query(id, Variant::Baseline, "unique_series_count"), vec![10000.0]);
    metrics.seed(metric_query(id, Variant::Candidate, "unique_series_count"), vec![3000.0]);
    metrics.seed(metric_query(id, Variant::Candidate, "critical_process_coverage"), vec![0.97]);
}

struct Harness {
    store: Arc<InMemoryExperimentStore>,
    generator: Arc<StubGeneratorClient>,
    fleet: Arc<StubFleetClient>,
    metrics: Arc<StubMetricsClient>,
    state_machine: Arc<PhaseStateMachine>,
}

fn harness(min_sample_size: usize) -> Harness {
    harness_with_fleet(min_sample_size, Arc::new(StubFleetClient::new()))
}

fn harness_with_fleet(min_sample_size: usize, fleet: Arc<StubFleetClient>) -> Harness {
    let store = Arc::new(InMemoryExperimentStore::new());
    let generator = Arc::new(StubGeneratorClient::new());
    let metrics = Arc::new(StubMetricsClient::new());
    let analyzer: Arc<dyn Analyzer> = Arc::new(WelchAnalyzer::new(min_sample_size));
    let operational_metrics = Arc::new(PhoenixMetrics::new().unwrap());
    let config = PhoenixConfig { deploy_timeout: Duration::from_secs(2), ..Default::default() };

    let state_machine = Arc::new(PhaseStateMachine::new(
        store.clone(),
        generator.clone(),
        fleet.clone(),
        metrics.clone(),
        analyzer,
        operational_metrics,
        &config,
    ));

    Harness { store, generator, fleet, metrics, state_machine }
}

async fn create(store: &InMemoryExperimentStore, name: &str, duration: Duration) -> Experiment {
    let experiment = Experiment::new(name, "scenario experiment", config(duration), "alice", None).unwrap();
    store.create_experiment(&experiment).await.unwrap();
    experiment
}

#[tokio::test]
async fn happy_path_promote() {
    let h = harness(3);
    let exp = create(&h.store, "E1", Duration::from_secs(30)).await;
    seed_metrics(&h.metrics, exp.id, 0.40, 0.30);

    let token = tokio_util::sync::CancellationToken::new();
    h.state_machine.start(exp.id, Actor::Api, token.clone()).await.unwrap();
    let running = h.store.get_experiment(exp.id).await.unwrap();
    assert_eq!(running.phase, Phase::Running);

    h.state_machine.advance_to_analyzing(exp.id, token).await.unwrap();
    let done = h.store.get_experiment(exp.id).await.unwrap();

    assert_eq!(done.phase, Phase::Completed);
    let results = done.results.expect("analysis results recorded");
    assert_eq!(results.recommendation, Recommendation::Promote);
    assert!((results.cardinality_reduction - 0.70).abs() < 1e-9);
}

#[tokio::test]
async fn reject_on_quality_regression() {
    let h = harness(3);
    let exp = create(&h.store, "E1b", Duration::from_secs(30)).await;
    seed_metrics(&h.metrics, exp.id, 0.40, 0.38);

    use phoenix::application::metric_naming::metric_query;
    use phoenix_domain::value_objects::Variant;
    h.metrics.seed(metric_query(exp.id, Variant::Baseline, "error_rate"), vec![0.01; 30]);
    h.metrics.seed(metric_query(exp.id, Variant::Candidate, "error_rate"), vec![0.10; 30]);

    let token = tokio_util::sync::CancellationToken::new();
    h.state_machine.start(exp.id, Actor::Api, token.clone()).await.unwrap();
    h.state_machine.advance_to_analyzing(exp.id, token).await.unwrap();

    let done = h.store.get_experiment(exp.id).await.unwrap();
    assert_eq!(done.phase, Phase::Failed);
    assert!(done.message.to_lowercase().contains("quality") || done.message.to_lowercase().contains("regress"));
}

#[tokio::test]
async fn cancel_during_initializing() {
    let h = harness(3);
    let exp = create(&h.store, "E2", Duration::from_secs(30)).await;
    let _ = &h.generator;

    let experiment = h.state_machine.begin_initializing(exp.id, Actor::Api).await.unwrap();
    assert_eq!(experiment.phase, Phase::Initializing);

    h.state_machine.cancel(exp.id, Actor::User).await.unwrap();

    let done = h.store.get_experiment(exp.id).await.unwrap();
    assert_eq!(done.phase, Phase::Cancelled);
    assert!(done.completed_at.is_some());
    assert!(h.fleet.is_torn_down(exp.id, phoenix_domain::value_objects::Variant::Baseline));
    assert!(h.fleet.is_torn_down(exp.id, phoenix_domain::value_objects::Variant::Candidate));
}

#[tokio::test]
async fn conflict_under_concurrent_start() {
    let h = harness(3);
    let exp = create(&h.store, "E4", Duration::from_secs(30)).await;

    let sm_a = h.state_machine.clone();
    let sm_b = h.state_machine.clone();
    let id = exp.id;

    let (a, b) = tokio::join!(
        tokio::spawn(async move { sm_a.begin_initializing(id, Actor::Api).await }),
        tokio::spawn(async move { sm_b.begin_initializing(id, Actor::Api).await }),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one concurrent start must succeed");
    let failure = if a.is_err() { a } else { b };
    assert!(failure.unwrap_err().is_conflict());

    let final_state = h.store.get_experiment(exp.id).await.unwrap();
    assert_eq!(final_state.phase, Phase::Initializing);
}

#[tokio::test]
async fn deploy_timeout_to_failed() {
    let h = harness_with_fleet(3, Arc::new(StubFleetClient::with_behavior(FleetBehavior::TimedOut)));
    let exp = create(&h.store, "E5", Duration::from_secs(30)).await;

    let token = tokio_util::sync::CancellationToken::new();
    h.state_machine.start(exp.id, Actor::Api, token).await.unwrap();

    let done = h.store.get_experiment(exp.id).await.unwrap();
    assert_eq!(done.phase, Phase::Failed);
    assert!(done.message.to_lowercase().contains("timed out"));
    assert!(h.fleet.is_torn_down(exp.id, phoenix_domain::value_objects::Variant::Baseline));
    assert!(h.fleet.is_torn_down(exp.id, phoenix_domain::value_objects::Variant::Candidate));
}

#[tokio::test]
async fn crash_recovery_resumes_from_persisted_phase() {
    let h = harness(3);
    let exp = create(&h.store, "E3", Duration::from_secs(30)).await;

    // Simulate the process having already reached `running` with
    // `started_at` ten seconds in the past, then "crashing" — the only
    // state a fresh `PhaseStateMachine` and task pool see on restart is
    // what the store already persisted.
    let initializing = h.state_machine.begin_initializing(exp.id, Actor::Api).await.unwrap();
    let token = tokio_util::sync::CancellationToken::new();
    h.state_machine.resume_initializing(initializing.id, token.clone()).await.unwrap();

    let running = h.store.get_experiment(exp.id).await.unwrap();
    assert_eq!(running.phase, Phase::Running);

    seed_metrics(&h.metrics, exp.id, 0.40, 0.38);

    // The state machine itself holds no per-experiment state between calls —
    // every transition re-reads the store — so driving the remaining phases
    // here is exactly what a freshly constructed scheduler would do after a
    // restart found this experiment sitting in `running`.
    let _ = token;
    let token2 = tokio_util::sync::CancellationToken::new();
    h.state_machine.advance_to_analyzing(exp.id, token2).await.unwrap();

    let done = h.store.get_experiment(exp.id).await.unwrap();
    assert!(done.phase.is_terminal());
    let history = h.store.get_phase_history(exp.id).await.unwrap();
    let mut seen = std::collections::HashSet::new();
    for entry in &history {
        assert!(seen.insert((entry.from, entry.to)), "no duplicate transition should be recorded twice");
    }
}
