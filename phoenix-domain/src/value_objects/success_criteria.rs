// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Success Criteria
//!
//! The business thresholds an experiment's candidate must clear before the
//! analyzer will recommend `promote`. These are policy, not statistics: the
//! analyzer (`phoenix_domain::services::analyzer`) computes the observed
//! overheads and reduction; `SuccessCriteria` decides what "good enough"
//! means for this particular experiment.

use serde::{Deserialize, Serialize};

use crate::PhoenixError;

/// Business thresholds a candidate pipeline must meet to be promoted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessCriteria {
    /// Minimum acceptable cardinality reduction, as a fraction in `[0, 1]`.
    pub min_cardinality_reduction: f64,
    /// Maximum acceptable CPU overhead, as a fraction (may be negative if
    /// the candidate is expected to use *less* CPU than the baseline).
    pub max_cpu_overhead: f64,
    /// Maximum acceptable memory overhead, as a fraction (may be negative).
    pub max_memory_overhead: f64,
    /// Minimum fraction of critical processes whose metrics must survive
    /// the candidate pipeline's filtering, in `[0, 1]`.
    pub critical_process_coverage: f64,
}

impl SuccessCriteria {
    /// Validates that fractions expected to be in `[0, 1]` actually are.
    ///
    /// `max_cpu_overhead` and `max_memory_overhead` are intentionally left
    /// unbounded below zero: a negative overhead ceiling is a valid (if
    /// unusual) way to require the candidate to be strictly cheaper than
    /// the baseline.
    pub fn validate(&self) -> Result<(), PhoenixError> {
        if !(0.0..=1.0).contains(&self.min_cardinality_reduction) {
            return Err(PhoenixError::validation(
                "min_cardinality_reduction must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&self.critical_process_coverage) {
            return Err(PhoenixError::validation(
                "critical_process_coverage must be in [0, 1]",
            ));
        }
        if !self.max_cpu_overhead.is_finite() || !self.max_memory_overhead.is_finite() {
            return Err(PhoenixError::validation(
                "overhead ceilings must be finite numbers",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SuccessCriteria {
        SuccessCriteria {
            min_cardinality_reduction: 0.5,
            max_cpu_overhead: 0.1,
            max_memory_overhead: 0.1,
            critical_process_coverage: 0.95,
        }
    }

    #[test]
    fn accepts_a_well_formed_criteria_set() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fractions() {
        let mut c = valid();
        c.min_cardinality_reduction = 1.5;
        assert!(c.validate().is_err());

        let mut c = valid();
        c.critical_process_coverage = -0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn allows_negative_overhead_ceilings() {
        let mut c = valid();
        c.max_cpu_overhead = -0.2;
        assert!(c.validate().is_ok());
    }
}
