// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Read-only contract over the time-series measurement backend. Queries
//! carry `experiment_id`/`variant` labels baked in by the caller so
//! baseline and candidate samples stay separable for any metric.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PhoenixError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricPoint {
    pub at: DateTime<Utc>,
    pub value: f64,
}

#[async_trait]
pub trait MetricsClient: Send + Sync {
    /// `Ok(None)` denotes `no_data`, distinct from an error: a genuinely
    /// absent sample is not a backend failure.
    async fn instant(&self, query: &str, at: DateTime<Utc>) -> Result<Option<f64>, PhoenixError>;

    async fn range(
        &self,
        query: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        step: chrono::Duration,
    ) -> Result<Vec<MetricPoint>, PhoenixError>;
}
