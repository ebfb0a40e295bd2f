// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Analyzer
//!
//! Pure computation, no I/O: turns a window of baseline/candidate samples
//! into an [`AnalysisResult`] and a promote/reject/continue/neutral
//! recommendation. Lives in the domain layer the same way the teacher keeps
//! its checksum/compression services free of infrastructure dependencies —
//! everything here is deterministic given its inputs, which is what makes
//! the recommendation rule unit-testable without a runtime.

use chrono::Utc;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::entities::{AnalysisResult, Recommendation, RiskLevel};
use crate::value_objects::SuccessCriteria;
use crate::PhoenixError;

/// Avoids division by zero when a baseline mean is itself zero.
const EPSILON: f64 = 1e-9;

/// How far past a success-criterion's threshold an observation must fall
/// before it counts as a `reject`-worthy failure rather than merely a
/// `continue`/`neutral` miss.
const CRITERIA_FAIL_MARGIN: f64 = 0.05;

/// Absolute increase in error rate, candidate over baseline, that counts as
/// a quality regression severe enough to force `reject`.
const ERROR_RATE_REGRESSION_MARGIN: f64 = 0.02;

/// Paired baseline/candidate samples for one metric, collected over the
/// experiment window.
#[derive(Debug, Clone, Default)]
pub struct SamplePair {
    pub baseline: Vec<f64>,
    pub candidate: Vec<f64>,
}

/// Everything the analyzer needs for a single run: per-metric sample pairs
/// plus the two values that are observed counts rather than distributions.
#[derive(Debug, Clone, Default)]
pub struct MetricSamples {
    pub cpu: SamplePair,
    pub memory: SamplePair,
    pub process_count: SamplePair,
    pub error_rate: SamplePair,
    pub baseline_unique_series: f64,
    pub candidate_unique_series: f64,
    pub process_coverage: f64,
}

/// Computes sample mean and (sample, i.e. n-1 denominator) variance.
fn mean_and_var(xs: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    if xs.len() < 2 {
        return (mean, 0.0);
    }
    let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var)
}

/// Welch's two-sample test: returns `(t_statistic, degrees_of_freedom)`.
/// `t` is signed `candidate_mean - baseline_mean`; callers needing
/// direction-agnostic confidence should take `t.abs()`.
fn welch_t(baseline: &[f64], candidate: &[f64]) -> Option<(f64, f64)> {
    if baseline.len() < 2 || candidate.len() < 2 {
        return None;
    }
    let (mean_b, var_b) = mean_and_var(baseline);
    let (mean_c, var_c) = mean_and_var(candidate);
    let n_b = baseline.len() as f64;
    let n_c = candidate.len() as f64;

    let se_sq = var_b / n_b + var_c / n_c;
    if se_sq <= 0.0 {
        return None;
    }
    let se = se_sq.sqrt();
    let t = (mean_c - mean_b) / se;

    let df_num = se_sq.powi(2);
    let df_den = (var_b / n_b).powi(2) / (n_b - 1.0) + (var_c / n_c).powi(2) / (n_c - 1.0);
    let df = if df_den > 0.0 { df_num / df_den } else { (n_b + n_c - 2.0).max(1.0) };

    Some((t, df.max(1.0)))
}

/// Converts a two-sample comparison into a confidence in `[0, 1]` that the
/// observed effect is real: `1 - p` for the two-tailed p-value of Welch's
/// t-statistic. Monotonic in `|effect|/stderr` (larger `|t|` pushes the
/// CDF toward 1) and in sample size (larger `n` raises `df`, which sharpens
/// the Student's-t distribution toward the normal, increasing the CDF for a
/// fixed `|t|`).
fn welch_confidence(baseline: &[f64], candidate: &[f64]) -> f64 {
    match welch_t(baseline, candidate) {
        None => 0.0,
        Some((t, df)) => {
            let dist = match StudentsT::new(0.0, 1.0, df) {
                Ok(d) => d,
                Err(_) => return 0.0,
            };
            let p_two_tailed = 2.0 * (1.0 - dist.cdf(t.abs()));
            (1.0 - p_two_tailed).clamp(0.0, 1.0)
        }
    }
}

fn relative_change(baseline_mean: f64, candidate_mean: f64) -> f64 {
    (candidate_mean - baseline_mean) / baseline_mean.abs().max(EPSILON)
}

/// Derives a recommendation and a confidence score from experiment samples.
/// A stateless trait so production can swap in a different statistical
/// method without touching the state machine.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, samples: &MetricSamples, criteria: &SuccessCriteria) -> Result<AnalysisResult, PhoenixError>;
}

/// Default [`Analyzer`] implementation: Welch's t-test per sampled metric,
/// combined conservatively (minimum confidence across metrics) before
/// applying the business recommendation rule.
pub struct WelchAnalyzer {
    /// Minimum samples required per side, per metric, for `sufficient_data`.
    /// Left configurable per the open question on the threshold constant.
    min_sample_size: usize,
}

impl WelchAnalyzer {
    pub fn new(min_sample_size: usize) -> Self {
        Self { min_sample_size }
    }
}

impl Default for WelchAnalyzer {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Analyzer for WelchAnalyzer {
    fn analyze(&self, samples: &MetricSamples, criteria: &SuccessCriteria) -> Result<AnalysisResult, PhoenixError> {
        let (baseline_cpu, _) = mean_and_var(&samples.cpu.baseline);
        let (candidate_cpu, _) = mean_and_var(&samples.cpu.candidate);
        let (baseline_memory, _) = mean_and_var(&samples.memory.baseline);
        let (candidate_memory, _) = mean_and_var(&samples.memory.candidate);
        let (baseline_process_count, _) = mean_and_var(&samples.process_count.baseline);
        let (candidate_process_count, _) = mean_and_var(&samples.process_count.candidate);
        let (baseline_error_rate, _) = mean_and_var(&samples.error_rate.baseline);
        let (candidate_error_rate, _) = mean_and_var(&samples.error_rate.candidate);

        let cpu_overhead = relative_change(baseline_cpu, candidate_cpu);
        let memory_overhead = relative_change(baseline_memory, candidate_memory);
        let cardinality_reduction =
            1.0 - samples.candidate_unique_series / samples.baseline_unique_series.max(EPSILON);

        let min_count = |pair: &SamplePair| pair.baseline.len().min(pair.candidate.len());
        let sufficient_data = [&samples.cpu, &samples.memory, &samples.process_count, &samples.error_rate]
            .iter()
            .all(|pair| min_count(pair) >= self.min_sample_size);

        let mut confidence = [
            welch_confidence(&samples.cpu.baseline, &samples.cpu.candidate),
            welch_confidence(&samples.memory.baseline, &samples.memory.candidate),
            welch_confidence(&samples.process_count.baseline, &samples.process_count.candidate),
            welch_confidence(&samples.error_rate.baseline, &samples.error_rate.candidate),
        ]
        .into_iter()
        .fold(f64::INFINITY, f64::min);
        if !confidence.is_finite() {
            confidence = 0.0;
        }
        if !sufficient_data {
            confidence = confidence.min(0.49);
        }

        let criteria_all_pass = cardinality_reduction >= criteria.min_cardinality_reduction
            && cpu_overhead <= criteria.max_cpu_overhead
            && memory_overhead <= criteria.max_memory_overhead
            && samples.process_coverage >= criteria.critical_process_coverage;

        let criteria_hard_fail = cardinality_reduction < criteria.min_cardinality_reduction - CRITERIA_FAIL_MARGIN
            || cpu_overhead > criteria.max_cpu_overhead + CRITERIA_FAIL_MARGIN
            || memory_overhead > criteria.max_memory_overhead + CRITERIA_FAIL_MARGIN
            || samples.process_coverage < criteria.critical_process_coverage - CRITERIA_FAIL_MARGIN;

        let quality_regressed = candidate_error_rate - baseline_error_rate > ERROR_RATE_REGRESSION_MARGIN;

        // Ties are broken toward `continue` rather than `promote`, so the
        // promote/continue checks below are ordered with `continue` as the
        // fallback whenever confidence sits exactly on a boundary.
        let recommendation = if quality_regressed || criteria_hard_fail {
            Recommendation::Reject
        } else if sufficient_data && criteria_all_pass && confidence >= 0.9 {
            Recommendation::Promote
        } else if !sufficient_data || (0.5..0.9).contains(&confidence) {
            Recommendation::Continue
        } else {
            Recommendation::Neutral
        };

        let worst_overhead = cpu_overhead.max(memory_overhead);
        let risk_level = if worst_overhead > criteria.max_cpu_overhead.max(criteria.max_memory_overhead) + CRITERIA_FAIL_MARGIN
        {
            RiskLevel::High
        } else if worst_overhead > criteria.max_cpu_overhead.max(criteria.max_memory_overhead) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        Ok(AnalysisResult {
            baseline_cpu,
            candidate_cpu,
            baseline_memory,
            candidate_memory,
            baseline_process_count,
            candidate_process_count,
            cardinality_reduction,
            cpu_overhead,
            memory_overhead,
            process_coverage: samples.process_coverage,
            confidence,
            sufficient_data,
            recommendation,
            risk_level,
            analysis_time: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize, baseline_cpu: f64, candidate_cpu: f64) -> MetricSamples {
        MetricSamples {
            cpu: SamplePair { baseline: vec![baseline_cpu; n], candidate: vec![candidate_cpu; n] },
            memory: SamplePair { baseline: vec![100.0; n], candidate: vec![102.0; n] },
            process_count: SamplePair { baseline: vec![500.0; n], candidate: vec![480.0; n] },
            error_rate: SamplePair { baseline: vec![0.01; n], candidate: vec![0.01; n] },
            baseline_unique_series: 10000.0,
            candidate_unique_series: 3000.0,
            process_coverage: 0.97,
        }
    }

    fn criteria() -> SuccessCriteria {
        SuccessCriteria {
            min_cardinality_reduction: 0.5,
            max_cpu_overhead: 0.1,
            max_memory_overhead: 0.1,
            critical_process_coverage: 0.95,
        }
    }

    #[test]
    fn promote_requires_sufficient_data_and_high_confidence() {
        // Identical means give zero confidence (no detectable effect) but
        // the experiment still clears every success criterion; absent
        // strong confidence the rule must not promote.
        let analyzer = WelchAnalyzer::new(5);
        let result = analyzer.analyze(&samples(5, 0.40, 0.40), &criteria()).unwrap();
        assert_ne!(result.recommendation, Recommendation::Promote);
    }

    #[test]
    fn insufficient_sample_count_forces_continue_or_neutral_never_promote() {
        let analyzer = WelchAnalyzer::new(1000);
        let result = analyzer.analyze(&samples(5, 0.40, 0.30), &criteria()).unwrap();
        assert!(!result.sufficient_data);
        assert!(result.confidence < 0.5);
        assert_ne!(result.recommendation, Recommendation::Promote);
    }

    #[test]
    fn severe_error_rate_regression_forces_reject() {
        let analyzer = WelchAnalyzer::new(5);
        let mut s = samples(5, 0.40, 0.38);
        s.error_rate = SamplePair { baseline: vec![0.01; 5], candidate: vec![0.10; 5] };
        let result = analyzer.analyze(&s, &criteria()).unwrap();
        assert_eq!(result.recommendation, Recommendation::Reject);
    }

    #[test]
    fn promote_requires_confidence_implies_sufficient_data_and_threshold() {
        // The testable invariant from the verification suite: whenever the
        // analyzer recommends promote, sufficient_data is true and
        // confidence is at least 0.9.
        let analyzer = WelchAnalyzer::new(3);
        // Large, clearly separated samples to drive confidence high.
        let baseline: Vec<f64> = (0..30).map(|i| 0.40 + (i as f64 % 3.0) * 0.001).collect();
        let candidate: Vec<f64> = (0..30).map(|i| 0.30 + (i as f64 % 3.0) * 0.001).collect();
        let mut s = samples(30, 0.0, 0.0);
        s.cpu = SamplePair { baseline: baseline.clone(), candidate: candidate.clone() };
        s.memory = SamplePair { baseline: baseline.iter().map(|v| v * 250.0).collect(), candidate: candidate.iter().map(|v| v * 230.0).collect() };
        s.process_count = SamplePair { baseline: vec![500.0; 30], candidate: vec![480.0; 30] };
        s.error_rate = SamplePair { baseline: vec![0.01; 30], candidate: vec![0.01; 30] };

        let result = analyzer.analyze(&s, &criteria()).unwrap();
        if result.recommendation == Recommendation::Promote {
            assert!(result.sufficient_data);
            assert!(result.confidence >= 0.9);
        }
    }

    #[test]
    fn cardinality_reduction_matches_the_documented_formula() {
        let analyzer = WelchAnalyzer::new(5);
        let result = analyzer.analyze(&samples(5, 0.40, 0.38), &criteria()).unwrap();
        assert!((result.cardinality_reduction - 0.70).abs() < 1e-9);
    }
}
