// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Start-experiment use case: performs the `pending → initializing`
//! transition synchronously so the caller gets an immediate, consistent
//! response, then hands the deploy/render/wait chain off to the task pool
//! so the request thread never blocks on fleet I/O.

use std::sync::Arc;

use phoenix_domain::entities::{Actor, Experiment};
use phoenix_domain::value_objects::ExperimentId;
use phoenix_domain::PhoenixError;

use crate::application::services::state_machine::PhaseStateMachine;
use crate::infrastructure::runtime::ExperimentTaskPool;

pub struct StartExperimentUseCase {
    state_machine: Arc<PhaseStateMachine>,
    task_pool: Arc<ExperimentTaskPool>,
}

impl StartExperimentUseCase {
    pub fn new(state_machine: Arc<PhaseStateMachine>, task_pool: Arc<ExperimentTaskPool>) -> Self {
        Self { state_machine, task_pool }
    }

    pub async fn execute(&self, id: ExperimentId) -> Result<Experiment, PhoenixError> {
        let experiment = self.state_machine.begin_initializing(id, Actor::Api).await?;

        let state_machine = Arc::clone(&self.state_machine);
        self.task_pool.spawn(id, move |cancel| async move {
            if let Err(error) = state_machine.resume_initializing(id, cancel).await {
                if !error.is_conflict() {
                    tracing::warn!(experiment_id = %id, %error, "initialization side effects failed");
                }
            }
        });

        Ok(experiment)
    }
}
