// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Deterministic [`GeneratorClient`] stand-in: always renders successfully
//! unless configured otherwise, so scenario tests can opt into failure
//! without a real template-rendering service.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use phoenix_domain::services::{GeneratorClient, RenderRequest, RenderResponse, TemplateInfo};
use phoenix_domain::PhoenixError;

/// Controls how [`StubGeneratorClient`] responds; set before handing the
/// stub to the code under test.
#[derive(Debug, Clone)]
pub enum GeneratorBehavior {
    Succeed,
    RejectTemplate(String),
}

pub struct StubGeneratorClient {
    behavior: Mutex<GeneratorBehavior>,
    render_calls: Mutex<u32>,
}

impl StubGeneratorClient {
    pub fn new() -> Self {
        Self { behavior: Mutex::new(GeneratorBehavior::Succeed), render_calls: Mutex::new(0) }
    }

    pub fn with_behavior(behavior: GeneratorBehavior) -> Self {
        Self { behavior: Mutex::new(behavior), render_calls: Mutex::new(0) }
    }

    pub fn render_call_count(&self) -> u32 {
        *self.render_calls.lock().unwrap()
    }
}

impl Default for StubGeneratorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeneratorClient for StubGeneratorClient {
    async fn validate_template(
        &self,
        _name: &str,
        _variables: &HashMap<String, serde_json::Value>,
    ) -> Result<(), PhoenixError> {
        match &*self.behavior.lock().unwrap() {
            GeneratorBehavior::Succeed => Ok(()),
            GeneratorBehavior::RejectTemplate(reason) => Err(PhoenixError::validation(reason.clone())),
        }
    }

    async fn render(&self, request: RenderRequest) -> Result<RenderResponse, PhoenixError> {
        *self.render_calls.lock().unwrap() += 1;
        match &*self.behavior.lock().unwrap() {
            GeneratorBehavior::Succeed => Ok(RenderResponse {
                baseline_config_id: format!("{}-baseline", request.experiment_id),
                candidate_config_id: format!("{}-candidate", request.experiment_id),
                revision: "rev-1".into(),
            }),
            GeneratorBehavior::RejectTemplate(reason) => Err(PhoenixError::unrecoverable(reason.clone())),
        }
    }

    async fn list_templates(&self) -> Result<Vec<TemplateInfo>, PhoenixError> {
        Ok(vec![TemplateInfo { name: "default".into(), description: "stub template".into() }])
    }
}
