// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Request/response DTOs and the handler functions `routes` wires to each
//! path. Every handler is a thin translation into an
//! [`ExperimentController`] call — no business logic lives here.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use phoenix_domain::entities::Experiment;
use phoenix_domain::value_objects::{ExperimentId, HostId, Phase, SuccessCriteria};
use phoenix_domain::PhoenixError;

use crate::application::commands::{CreateExperimentCommand, ListExperimentsCommand};
use crate::application::services::experiment_controller::ExperimentController;
use crate::application::use_cases::get_metrics::MetricsQuery as UseCaseMetricsQuery;
use crate::infrastructure::http::error::ApiError;

pub type SharedController = Arc<ExperimentController>;

#[derive(Debug, Deserialize)]
pub struct CreateExperimentRequest {
    pub name: String,
    pub description: String,
    pub baseline_pipeline: String,
    pub candidate_pipeline: String,
    pub target_hosts: Vec<String>,
    pub duration_seconds: u64,
    #[serde(default)]
    pub variables: HashMap<String, serde_json::Value>,
    pub success_criteria: SuccessCriteria,
    pub owner: String,
}

impl TryFrom<CreateExperimentRequest> for CreateExperimentCommand {
    type Error = PhoenixError;

    fn try_from(req: CreateExperimentRequest) -> Result<Self, Self::Error> {
        let target_hosts =
            req.target_hosts.into_iter().map(HostId::new).collect::<Result<Vec<_>, _>>()?;
        Ok(CreateExperimentCommand {
            name: req.name,
            description: req.description,
            baseline_pipeline: req.baseline_pipeline,
            candidate_pipeline: req.candidate_pipeline,
            target_hosts,
            duration: Duration::from_secs(req.duration_seconds),
            variables: req.variables,
            success_criteria: req.success_criteria,
            owner: req.owner,
        })
    }
}

pub async fn create_experiment(
    State(controller): State<SharedController>,
    Json(request): Json<CreateExperimentRequest>,
) -> Result<(StatusCode, Json<Experiment>), ApiError> {
    let command: CreateExperimentCommand = request.try_into().map_err(ApiError)?;
    let experiment = controller.create_experiment(command).await.map_err(ApiError)?;
    Ok((StatusCode::CREATED, Json(experiment)))
}

#[derive(Debug, Deserialize)]
pub struct ListExperimentsParams {
    pub status: Option<String>,
    pub owner: Option<String>,
    pub name_prefix: Option<String>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    50
}

pub async fn list_experiments(
    State(controller): State<SharedController>,
    Query(params): Query<ListExperimentsParams>,
) -> Result<Json<Vec<Experiment>>, ApiError> {
    let phases = match params.status {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Phase::from_str(s).map_err(PhoenixError::validation))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ApiError)?,
        None => Vec::new(),
    };
    let command = ListExperimentsCommand {
        phases,
        owner: params.owner,
        name_prefix: params.name_prefix,
        page: params.page,
        page_size: params.page_size,
    };
    let experiments = controller.list_experiments(command).await.map_err(ApiError)?;
    Ok(Json(experiments))
}

pub async fn get_experiment(
    State(controller): State<SharedController>,
    Path(id): Path<ExperimentId>,
) -> Result<Json<Experiment>, ApiError> {
    let experiment = controller.get_experiment(id).await.map_err(ApiError)?;
    Ok(Json(experiment))
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedStatus {
    Running,
    Stopped,
    Cancelled,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RequestedStatus,
}

pub async fn update_experiment_status(
    State(controller): State<SharedController>,
    Path(id): Path<ExperimentId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Experiment>, ApiError> {
    match request.status {
        RequestedStatus::Running => {
            let experiment = controller.start_experiment(id).await.map_err(ApiError)?;
            Ok(Json(experiment))
        }
        RequestedStatus::Stopped | RequestedStatus::Cancelled => {
            controller.stop_experiment(id).await.map_err(ApiError)?;
            let experiment = controller.get_experiment(id).await.map_err(ApiError)?;
            Ok(Json(experiment))
        }
    }
}

pub async fn get_analysis(
    State(controller): State<SharedController>,
    Path(id): Path<ExperimentId>,
) -> Result<Json<phoenix_domain::entities::AnalysisResult>, ApiError> {
    let results = controller.get_analysis(id).await.map_err(ApiError)?;
    Ok(Json(results))
}

#[derive(Debug, Deserialize)]
pub struct MetricsParams {
    pub metric: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(default = "default_step_seconds")]
    pub step_seconds: i64,
}

fn default_step_seconds() -> i64 {
    15
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub baseline: Vec<phoenix_domain::services::MetricPoint>,
    pub candidate: Vec<phoenix_domain::services::MetricPoint>,
}

pub async fn get_metrics(
    State(controller): State<SharedController>,
    Path(id): Path<ExperimentId>,
    Query(params): Query<MetricsParams>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let query = UseCaseMetricsQuery {
        metric: params.metric,
        from: params.from,
        to: params.to,
        step: chrono::Duration::seconds(params.step_seconds),
    };
    let series = controller.get_metrics(id, query).await.map_err(ApiError)?;
    Ok(Json(MetricsResponse { baseline: series.baseline, candidate: series.candidate }))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn ready(State(controller): State<SharedController>) -> StatusCode {
    if controller.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
