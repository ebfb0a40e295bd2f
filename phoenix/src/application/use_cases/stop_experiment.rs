// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stop-experiment use case: cancels any in-flight task pool work for the
//! experiment first, then drives the `* → cancelled` transition. Cancelling
//! the task first means a slow deploy step gets aborted promptly instead of
//! racing the transition to completion; the transition itself still reads
//! the experiment's current phase before writing, so it is correct even if
//! the aborted task had already committed a step of its own.

use std::sync::Arc;

use phoenix_domain::entities::Actor;
use phoenix_domain::value_objects::ExperimentId;
use phoenix_domain::PhoenixError;

use crate::application::services::state_machine::PhaseStateMachine;
use crate::infrastructure::runtime::ExperimentTaskPool;

pub struct StopExperimentUseCase {
    state_machine: Arc<PhaseStateMachine>,
    task_pool: Arc<ExperimentTaskPool>,
}

impl StopExperimentUseCase {
    pub fn new(state_machine: Arc<PhaseStateMachine>, task_pool: Arc<ExperimentTaskPool>) -> Self {
        Self { state_machine, task_pool }
    }

    pub async fn execute(&self, id: ExperimentId) -> Result<(), PhoenixError> {
        self.task_pool.cancel(id);
        self.state_machine.cancel(id, Actor::Api).await
    }
}
