// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Analysis Result
//!
//! The snapshot an [`crate::services::analyzer::Analyzer`] produces from a
//! completed experiment window, embedded into `Experiment.results` on the
//! way out of `analyzing`. Carries both the raw per-metric comparisons and
//! the derived business recommendation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The business recommendation the analyzer derives from an experiment's
/// samples and success criteria.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Candidate should replace the baseline fleet-wide.
    Promote,
    /// Candidate should not proceed; a quality signal regressed or a
    /// success criterion failed beyond its margin.
    Reject,
    /// Not enough data, or confidence is in the mid-range; extend and
    /// re-analyze.
    Continue,
    /// Data is sufficient but there is no clear winner either way.
    Neutral,
}

/// Coarse risk bucket derived from the worst per-metric overhead observed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Aggregated output of a single analyzer run over one experiment's window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub baseline_cpu: f64,
    pub candidate_cpu: f64,
    pub baseline_memory: f64,
    pub candidate_memory: f64,
    pub baseline_process_count: f64,
    pub candidate_process_count: f64,
    /// `1 - (candidate unique series / baseline unique series)`.
    pub cardinality_reduction: f64,
    /// Relative CPU change, `(candidate - baseline) / baseline`.
    pub cpu_overhead: f64,
    /// Relative memory change, `(candidate - baseline) / baseline`.
    pub memory_overhead: f64,
    /// Fraction of critical processes whose metrics survived the
    /// candidate's filtering.
    pub process_coverage: f64,
    /// Statistical confidence in `[0, 1]` that the observed effect is real.
    pub confidence: f64,
    /// `true` iff every metric's sample count per side met the configured
    /// minimum.
    pub sufficient_data: bool,
    pub recommendation: Recommendation,
    pub risk_level: RiskLevel,
    pub analysis_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A published `cpu_overhead`/`memory_overhead` must be reproducible
    /// from the published baseline/candidate means within `1e-9` — this is
    /// one of the testable properties in the control plane's invariant
    /// suite.
    #[test]
    fn overhead_round_trips_from_published_means() {
        let result = AnalysisResult {
            baseline_cpu: 0.40,
            candidate_cpu: 0.38,
            baseline_memory: 100.0,
            candidate_memory: 110.0,
            baseline_process_count: 10000.0,
            candidate_process_count: 3000.0,
            cardinality_reduction: 0.70,
            cpu_overhead: (0.38 - 0.40) / 0.40,
            memory_overhead: (110.0 - 100.0) / 100.0,
            process_coverage: 0.97,
            confidence: 0.95,
            sufficient_data: true,
            recommendation: Recommendation::Promote,
            risk_level: RiskLevel::Low,
            analysis_time: Utc::now(),
        };

        let recomputed_cpu = (result.candidate_cpu - result.baseline_cpu) / result.baseline_cpu;
        let recomputed_mem = (result.candidate_memory - result.baseline_memory) / result.baseline_memory;

        assert!((recomputed_cpu - result.cpu_overhead).abs() < 1e-9);
        assert!((recomputed_mem - result.memory_overhead).abs() < 1e-9);
    }
}
