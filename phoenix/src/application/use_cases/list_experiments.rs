// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use std::sync::Arc;

use phoenix_domain::entities::Experiment;
use phoenix_domain::repositories::{ExperimentFilter, ExperimentStore};
use phoenix_domain::PhoenixError;

use crate::application::commands::ListExperimentsCommand;

pub struct ListExperimentsUseCase {
    store: Arc<dyn ExperimentStore>,
}

impl ListExperimentsUseCase {
    pub fn new(store: Arc<dyn ExperimentStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, command: ListExperimentsCommand) -> Result<Vec<Experiment>, PhoenixError> {
        let filter = ExperimentFilter {
            phases: command.phases,
            owner: command.owner,
            name_prefix: command.name_prefix,
            since: None,
            until: None,
            page: command.page,
            page_size: command.page_size,
        };
        self.store.list_experiments(&filter).await
    }
}
