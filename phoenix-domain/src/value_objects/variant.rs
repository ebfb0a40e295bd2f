// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The two pipeline variants an experiment compares.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two pipeline configurations compared in an experiment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// The current, already-deployed pipeline.
    Baseline,
    /// The proposed pipeline being evaluated.
    Candidate,
}

impl Variant {
    /// Both variants, in a stable order, for iterating deployments.
    pub const ALL: [Variant; 2] = [Variant::Baseline, Variant::Candidate];
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Baseline => write!(f, "baseline"),
            Variant::Candidate => write!(f, "candidate"),
        }
    }
}
