// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Composition Root
//!
//! Builds one of every adapter, wires the state machine the controller and
//! the scheduler share, and runs the HTTP server and the reconciliation
//! loop side by side until a shutdown signal fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use phoenix::infrastructure::adapters::{HttpFleetClient, HttpGeneratorClient, HttpMetricsClient};
use phoenix::infrastructure::metrics::{build_metrics_router, PhoenixMetrics};
use phoenix::infrastructure::repositories::SqliteExperimentStore;
use phoenix::infrastructure::runtime::ExperimentTaskPool;
use phoenix::{ExperimentController, PhaseStateMachine, PhoenixConfig, Scheduler};
use phoenix_domain::repositories::ExperimentStore;
use phoenix_domain::services::analyzer::WelchAnalyzer;
use phoenix_domain::services::{Analyzer, FleetClient, GeneratorClient, MetricsClient};
use phoenix_domain::PhoenixError;

use crate::shutdown::ShutdownCoordinator;

/// Default timeout applied to the generator/fleet/metrics HTTP clients'
/// own request round trips — distinct from `deploy_timeout` and
/// `metrics_query_timeout`, which bound how long the state machine waits
/// for the *operation* those clients front to finish.
const RPC_CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the control plane until `shutdown.token()` is cancelled, then waits
/// out the grace period for in-flight reconciliation tasks before
/// returning.
pub async fn run(config: PhoenixConfig, shutdown: ShutdownCoordinator) -> Result<(), PhoenixError> {
    config.validate()?;

    let store: Arc<dyn ExperimentStore> = Arc::new(SqliteExperimentStore::connect(&config.database_url).await?);
    let generator: Arc<dyn GeneratorClient> =
        Arc::new(HttpGeneratorClient::new(config.generator_endpoint.clone(), RPC_CLIENT_TIMEOUT)?);
    let fleet: Arc<dyn FleetClient> = Arc::new(HttpFleetClient::new(config.fleet_endpoint.clone(), RPC_CLIENT_TIMEOUT)?);
    let metrics: Arc<dyn MetricsClient> =
        Arc::new(HttpMetricsClient::new(config.metrics_endpoint.clone(), RPC_CLIENT_TIMEOUT)?);
    let analyzer: Arc<dyn Analyzer> = Arc::new(WelchAnalyzer::new(config.analyzer_min_sample_size));
    let task_pool = ExperimentTaskPool::new();
    let operational_metrics = Arc::new(PhoenixMetrics::new()?);

    let state_machine = Arc::new(PhaseStateMachine::new(
        Arc::clone(&store),
        generator,
        fleet,
        Arc::clone(&metrics),
        analyzer,
        Arc::clone(&operational_metrics),
        &config,
    ));

    let controller = Arc::new(ExperimentController::from_parts(
        Arc::clone(&store),
        metrics,
        Arc::clone(&state_machine),
        Arc::clone(&task_pool),
    ));

    let scheduler = Arc::new(Scheduler::new(
        store,
        state_machine,
        task_pool,
        Arc::clone(&operational_metrics),
        Duration::from_secs(config.scheduler_interval_seconds),
        config.initialization_timeout,
    ));

    let app = phoenix::infrastructure::http::build_router(controller).merge(build_metrics_router(operational_metrics));

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| PhoenixError::unrecoverable(format!("failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "control API listening");

    let server_shutdown = shutdown.token();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
            .await
    });

    let scheduler_token = shutdown.token();
    let scheduler_handle = tokio::spawn(async move { scheduler.run(scheduler_token).await });

    shutdown.token().cancelled().await;
    tracing::info!("shutdown signal received, waiting for the server and scheduler to stop");

    let _ = tokio::join!(server, scheduler_handle);
    shutdown.complete_shutdown();

    Ok(())
}
