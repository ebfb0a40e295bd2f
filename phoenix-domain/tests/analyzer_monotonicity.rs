// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Property tests for the analyzer's statistical core: confidence must
//! move monotonically with effect size and with sample size, and the
//! `promote ⇒ sufficient_data ∧ confidence ≥ 0.9` invariant must hold for
//! every randomly generated scenario, not just the hand-picked unit tests.

use phoenix_domain::services::analyzer::{Analyzer, MetricSamples, SamplePair, WelchAnalyzer};
use phoenix_domain::entities::Recommendation;
use phoenix_domain::SuccessCriteria;
use proptest::prelude::*;

fn flat(value: f64, n: usize) -> Vec<f64> {
    vec![value; n]
}

fn criteria() -> SuccessCriteria {
    SuccessCriteria {
        min_cardinality_reduction: 0.5,
        max_cpu_overhead: 0.1,
        max_memory_overhead: 0.1,
        critical_process_coverage: 0.95,
    }
}

fn samples_with(cpu_baseline: f64, cpu_candidate: f64, n: usize) -> MetricSamples {
    MetricSamples {
        cpu: SamplePair { baseline: flat(cpu_baseline, n), candidate: flat(cpu_candidate, n) },
        memory: SamplePair { baseline: flat(100.0, n), candidate: flat(100.0, n) },
        process_count: SamplePair { baseline: flat(500.0, n), candidate: flat(480.0, n) },
        error_rate: SamplePair { baseline: flat(0.01, n), candidate: flat(0.01, n) },
        baseline_unique_series: 10000.0,
        candidate_unique_series: 3000.0,
        process_coverage: 0.97,
    }
}

proptest! {
    #[test]
    fn promote_always_implies_sufficient_data_and_high_confidence(
        n in 2usize..60,
        baseline in 0.10f64..1.0,
        delta in -0.30f64..0.30,
    ) {
        let analyzer = WelchAnalyzer::new(30);
        let samples = samples_with(baseline, baseline + delta, n);
        let result = analyzer.analyze(&samples, &criteria()).unwrap();
        if result.recommendation == Recommendation::Promote {
            prop_assert!(result.sufficient_data);
            prop_assert!(result.confidence >= 0.9);
        }
    }

    #[test]
    fn below_minimum_sample_size_never_yields_high_confidence(
        n in 1usize..10,
        baseline in 0.10f64..1.0,
        delta in -0.30f64..0.30,
    ) {
        let analyzer = WelchAnalyzer::new(30);
        let samples = samples_with(baseline, baseline + delta, n);
        let result = analyzer.analyze(&samples, &criteria()).unwrap();
        prop_assert!(!result.sufficient_data);
        prop_assert!(result.confidence < 0.5);
    }
}
