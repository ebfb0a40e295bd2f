// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use std::sync::Arc;

use chrono::{DateTime, Utc};

use phoenix_domain::services::{MetricPoint, MetricsClient};
use phoenix_domain::value_objects::{ExperimentId, Variant};
use phoenix_domain::PhoenixError;

use crate::application::metric_naming::metric_query;

/// The window and metric name requested against `/api/v1/experiments/{id}/metrics`.
#[derive(Debug, Clone)]
pub struct MetricsQuery {
    pub metric: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub step: chrono::Duration,
}

/// One named metric's baseline and candidate series over the requested window.
#[derive(Debug, Clone)]
pub struct MetricsSeries {
    pub baseline: Vec<MetricPoint>,
    pub candidate: Vec<MetricPoint>,
}

pub struct GetMetricsUseCase {
    metrics: Arc<dyn MetricsClient>,
}

impl GetMetricsUseCase {
    pub fn new(metrics: Arc<dyn MetricsClient>) -> Self {
        Self { metrics }
    }

    pub async fn execute(&self, id: ExperimentId, query: MetricsQuery) -> Result<MetricsSeries, PhoenixError> {
        let baseline = self
            .metrics
            .range(&metric_query(id, Variant::Baseline, &query.metric), query.from, query.to, query.step)
            .await?;
        let candidate = self
            .metrics
            .range(&metric_query(id, Variant::Candidate, &query.metric), query.from, query.to, query.step)
            .await?;
        Ok(MetricsSeries { baseline, candidate })
    }
}
