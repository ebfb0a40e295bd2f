// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Deterministic [`MetricsClient`] stand-in. Holds pre-seeded baseline and
//! candidate sample series keyed by query string, letting analyzer tests
//! drive exact promote/reject/neutral outcomes instead of depending on a
//! live time-series backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};

use phoenix_domain::services::{MetricPoint, MetricsClient};
use phoenix_domain::PhoenixError;

pub struct StubMetricsClient {
    series: Mutex<HashMap<String, Vec<f64>>>,
}

impl StubMetricsClient {
    pub fn new() -> Self {
        Self { series: Mutex::new(HashMap::new()) }
    }

    /// Seeds the sample values returned for `range` queries matching
    /// `query`, and the last of those values for `instant` queries.
    pub fn seed(&self, query: impl Into<String>, values: Vec<f64>) {
        self.series.lock().unwrap().insert(query.into(), values);
    }
}

impl Default for StubMetricsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsClient for StubMetricsClient {
    async fn instant(&self, query: &str, _at: DateTime<Utc>) -> Result<Option<f64>, PhoenixError> {
        Ok(self.series.lock().unwrap().get(query).and_then(|v| v.last().copied()))
    }

    async fn range(
        &self,
        query: &str,
        from: DateTime<Utc>,
        _to: DateTime<Utc>,
        step: ChronoDuration,
    ) -> Result<Vec<MetricPoint>, PhoenixError> {
        let values = self.series.lock().unwrap().get(query).cloned().unwrap_or_default();
        Ok(values
            .into_iter()
            .enumerate()
            .map(|(i, value)| MetricPoint { at: from + step * i as i32, value })
            .collect())
    }
}
