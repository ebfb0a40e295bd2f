// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! HTTP adapter for [`FleetClient`], the host-agent runtime that actually
//! materializes a pipeline variant.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use phoenix_domain::services::{DeployAck, FleetClient, WaitReadyOutcome};
use phoenix_domain::value_objects::{ExperimentId, HostId, Variant};
use phoenix_domain::PhoenixError;

pub struct HttpFleetClient {
    base_url: String,
    client: Client,
}

impl HttpFleetClient {
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
    match status {
        StatusCode::NOT_FOUND => PhoenixError::not_found(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => PhoenixError::validation(body),
        s if s.is_server_error() => PhoenixError::transient(body),
        _ => PhoenixError::unrecoverable(body),
    }
}

#[derive(Serialize)]
struct DeployBody<'a> {
    config_id: &'a str,
    target_hosts: &'a [HostId],
    variables: &'a HashMap<String, serde_json::Value>,
    namespace: &'a str,
}

#[async_trait]
impl FleetClient for HttpFleetClient {
    async fn deploy(
        &self,
        experiment_id: ExperimentId,
        variant: Variant,
        config_id: &str,
        target_hosts: &[HostId],
        variables: &HashMap<String, serde_json::Value>,
        namespace: &str,
    ) -> Result<DeployAck, PhoenixError> {
        let response = self
            .client
            .post(format!("{}/experiments/{experiment_id}/variants/{variant}/deploy", self.base_url))
            .json(&DeployBody { config_id, target_hosts, variables, namespace })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        response
            .json::<DeployAck>()
            .await
            .map_err(|e| PhoenixError::unrecoverable(format!("malformed deploy response: {e}")))
    }

    async fn wait_ready(
        &self,
        experiment_id: ExperimentId,
        variant: Variant,
        namespace: &str,
        timeout: Duration,
    ) -> Result<WaitReadyOutcome, PhoenixError> {
        let timeout_seconds = timeout.as_secs().to_string();
        let response = self
            .client
            .get(format!("{}/experiments/{experiment_id}/variants/{variant}/readiness", self.base_url))
            .query(&[("namespace", namespace), ("timeout_seconds", timeout_seconds.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        response
            .json::<WaitReadyOutcome>()
            .await
            .map_err(|e| PhoenixError::unrecoverable(format!("malformed readiness response: {e}")))
    }

    async fn teardown(&self, experiment_id: ExperimentId, variant: Variant) -> Result<(), PhoenixError> {
        let response = self
            .client
            .delete(format!("{}/experiments/{experiment_id}/variants/{variant}", self.base_url))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(map_status(status, body))
        }
    }
}
