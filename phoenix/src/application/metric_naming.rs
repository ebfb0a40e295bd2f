// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The label convention every [`phoenix_domain::services::MetricsClient`]
//! query uses to separate baseline and candidate series for one
//! experiment, shared between the state machine's analysis window and the
//! `get_experiment_metrics` use case so both query the same series.

use phoenix_domain::value_objects::{ExperimentId, Variant};

pub fn metric_query(experiment_id: ExperimentId, variant: Variant, metric: &str) -> String {
    format!("{metric}{{experiment_id=\"{experiment_id}\",variant=\"{variant}\"}}")
}
