// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use std::sync::Arc;

use phoenix_domain::entities::Experiment;
use phoenix_domain::repositories::ExperimentStore;
use phoenix_domain::value_objects::ExperimentId;
use phoenix_domain::PhoenixError;

pub struct GetExperimentUseCase {
    store: Arc<dyn ExperimentStore>,
}

impl GetExperimentUseCase {
    pub fn new(store: Arc<dyn ExperimentStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, id: ExperimentId) -> Result<Experiment, PhoenixError> {
        self.store.get_experiment(id).await
    }
}
