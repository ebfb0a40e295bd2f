// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Experiment Configuration
//!
//! The immutable inputs that define an experiment at creation time: which
//! two templates to compare, where to run them, for how long, with what
//! template variables, and against what success bar.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::value_objects::{HostId, SuccessCriteria};
use crate::PhoenixError;

/// The configuration an experiment is created with.
///
/// `target_hosts` is stored de-duplicated but otherwise in the order the
/// caller supplied; ordering matters for human-readable logs and for
/// deterministic rendering by the generator, which the contract promises
/// is itself deterministic given identical inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub baseline_pipeline: String,
    pub candidate_pipeline: String,
    pub target_hosts: Vec<HostId>,
    #[serde(with = "duration_seconds")]
    pub duration: Duration,
    #[serde(default)]
    pub variables: HashMap<String, serde_json::Value>,
    pub success_criteria: SuccessCriteria,
}

impl ExperimentConfig {
    /// Validates every invariant listed in the data model: non-empty host
    /// set, resolvable-looking template names, positive duration, and a
    /// well-formed success-criteria block.
    pub fn validate(&self) -> Result<(), PhoenixError> {
        if self.baseline_pipeline.trim().is_empty() {
            return Err(PhoenixError::validation("baseline_pipeline must not be empty"));
        }
        if self.candidate_pipeline.trim().is_empty() {
            return Err(PhoenixError::validation("candidate_pipeline must not be empty"));
        }
        if self.target_hosts.is_empty() {
            return Err(PhoenixError::validation("target_hosts must be non-empty"));
        }
        if self.duration.is_zero() {
            return Err(PhoenixError::validation("duration must be positive"));
        }
        self.success_criteria.validate()?;
        Ok(())
    }
}

mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ExperimentConfig {
        ExperimentConfig {
            baseline_pipeline: "baseline-v1".into(),
            candidate_pipeline: "candidate-v2".into(),
            target_hosts: vec![HostId::new("h1").unwrap(), HostId::new("h2").unwrap()],
            duration: Duration::from_secs(30),
            variables: HashMap::new(),
            success_criteria: SuccessCriteria {
                min_cardinality_reduction: 0.5,
                max_cpu_overhead: 0.1,
                max_memory_overhead: 0.1,
                critical_process_coverage: 0.95,
            },
        }
    }

    #[test]
    fn accepts_a_well_formed_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_empty_host_set() {
        let mut c = valid_config();
        c.target_hosts.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        let mut c = valid_config();
        c.duration = Duration::ZERO;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_blank_template_names() {
        let mut c = valid_config();
        c.baseline_pipeline = "  ".into();
        assert!(c.validate().is_err());
    }
}
