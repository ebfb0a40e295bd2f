// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! HTTP adapter for [`MetricsClient`], a Prometheus-flavored instant/range
//! query API over the fleet's telemetry backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use phoenix_domain::services::{MetricPoint, MetricsClient};
use phoenix_domain::PhoenixError;

pub struct HttpMetricsClient {
    base_url: String,
    client: Client,
}

impl HttpMetricsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PhoenixError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PhoenixError::internal_error(format!("failed to build http client: {e}")))?;
        Ok(Self { base_url: base_url.into(), client })
    }
}

fn map_transport_error(err: reqwest::Error) -> PhoenixError {
    if err.is_timeout() || err.is_connect() {
        PhoenixError::transient(err.to_string())
    } else {
        PhoenixError::unrecoverable(err.to_string())
    }
}

fn map_status(status: StatusCode, body: String) -> PhoenixError {
    if status.is_server_error() {
        PhoenixError::transient(body)
    } else {
        PhoenixError::unrecoverable(body)
    }
}

#[derive(serde::Deserialize)]
struct InstantResponse {
    value: Option<f64>,
}

#[async_trait]
impl MetricsClient for HttpMetricsClient {
    async fn instant(&self, query: &str, at: DateTime<Utc>) -> Result<Option<f64>, PhoenixError> {
        let at_str = at.to_rfc3339();
        let response = self
            .client
            .get(format!("{}/api/v1/query", self.base_url))
            .query(&[("query", query), ("time", at_str.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        let parsed: InstantResponse = response
            .json()
            .await
            .map_err(|e| PhoenixError::unrecoverable(format!("malformed instant query response: {e}")))?;
        Ok(parsed.value)
    }

    async fn range(
        &self,
        query: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        step: chrono::Duration,
    ) -> Result<Vec<MetricPoint>, PhoenixError> {
        let step_seconds = step.num_seconds().max(1).to_string();
        let from_str = from.to_rfc3339();
        let to_str = to.to_rfc3339();
        let response = self
            .client
            .get(format!("{}/api/v1/query_range", self.base_url))
            .query(&[
                ("query", query),
                ("start", from_str.as_str()),
                ("end", to_str.as_str()),
                ("step", step_seconds.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        response
            .json::<Vec<MetricPoint>>()
            .await
            .map_err(|e| PhoenixError::unrecoverable(format!("malformed range query response: {e}")))
    }
}
