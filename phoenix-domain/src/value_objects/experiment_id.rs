// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Experiment Identifier
//!
//! `ExperimentId` is the opaque, stable identifier every store and client
//! contract threads through: the store keys rows by it, the fleet client
//! keys deployments by `(experiment_id, variant)`, and metrics queries
//! inject it as a label so baseline/candidate samples stay separable.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::PhoenixError;

/// Type-safe identifier for an [`crate::entities::Experiment`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ExperimentId(Uuid);

impl ExperimentId {
    /// Generates a new, random experiment id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an experiment id from its string form (API input, DB round-trip).
    pub fn parse(s: &str) -> Result<Self, PhoenixError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| PhoenixError::validation(format!("invalid experiment id '{s}': {e}")))
    }

    /// Returns the underlying UUID, for storage and logging.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ExperimentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ExperimentId {
    type Err = PhoenixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ExperimentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ExperimentId> for Uuid {
    fn from(id: ExperimentId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_string() {
        let id = ExperimentId::new();
        let parsed = ExperimentId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(ExperimentId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(ExperimentId::new(), ExperimentId::new());
    }
}
