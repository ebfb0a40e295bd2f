// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use std::sync::Arc;

use phoenix_domain::entities::AnalysisResult;
use phoenix_domain::repositories::ExperimentStore;
use phoenix_domain::value_objects::ExperimentId;
use phoenix_domain::PhoenixError;

pub struct GetAnalysisUseCase {
    store: Arc<dyn ExperimentStore>,
}

impl GetAnalysisUseCase {
    pub fn new(store: Arc<dyn ExperimentStore>) -> Self {
        Self { store }
    }

    /// Returns the published analysis, or `not_found` if the experiment
    /// hasn't reached a transition out of `analyzing` yet.
    pub async fn execute(&self, id: ExperimentId) -> Result<AnalysisResult, PhoenixError> {
        let experiment = self.store.get_experiment(id).await?;
        experiment
            .results
            .ok_or_else(|| PhoenixError::not_found(format!("experiment {id} has no analysis results yet")))
    }
}
