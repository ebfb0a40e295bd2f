// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! HTTP adapter for [`GeneratorClient`], the config-template renderer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;

use phoenix_domain::services::{GeneratorClient, RenderRequest, RenderResponse, TemplateInfo};
use phoenix_domain::PhoenixError;

pub struct HttpGeneratorClient {
    base_url: String,
    client: Client,
}

impl HttpGeneratorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PhoenixError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PhoenixError::internal_error(format!("failed to build http client: {e}")))?;
        Ok(Self { base_url: base_url.into(), client })
    }
}

/// Maps a transport-level failure onto the taxonomy: timeouts and
/// connection errors are `transient` (worth retrying), anything else is
/// `unrecoverable` since it signals a malformed request this process sent.
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

#[async_trait]
impl GeneratorClient for HttpGeneratorClient {
    async fn validate_template(
        &self,
        name: &str,
        variables: &HashMap<String, serde_json::Value>,
    ) -> Result<(), PhoenixError> {
        let response = self
            .client
            .post(format!("{}/templates/{}/validate", self.base_url, name))
            .json(variables)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(map_status(status, body))
        }
    }

    async fn render(&self, request: RenderRequest) -> Result<RenderResponse, PhoenixError> {
        let response = self
            .client
            .post(format!("{}/render", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        response
            .json::<RenderResponse>()
            .await
            .map_err(|e| PhoenixError::unrecoverable(format!("malformed render response: {e}")))
    }

    async fn list_templates(&self) -> Result<Vec<TemplateInfo>, PhoenixError> {
        let response = self
            .client
            .get(format!("{}/templates", self.base_url))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, body));
        }

        response
            .json::<Vec<TemplateInfo>>()
            .await
            .map_err(|e| PhoenixError::unrecoverable(format!("malformed templates response: {e}")))
    }
}
