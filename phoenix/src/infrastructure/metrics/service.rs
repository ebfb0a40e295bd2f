// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Prometheus metrics for the reconciliation engine itself — operational
//! counters about how the control plane is running, never the telemetry
//! the experiments under management are collecting.

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

use phoenix_domain::value_objects::Phase;
use phoenix_domain::PhoenixError;

/// Counters tracking the scheduler's reconciliation loop and the state
/// machine's phase transitions. Registered once at startup and shared
/// behind an `Arc` between the scheduler, the state machine, and the
/// `/metrics` endpoint.
pub struct PhoenixMetrics {
    registry: Registry,
    reconciliation_ticks_total: IntCounter,
    phase_transitions_total: IntCounterVec,
    transition_failures_total: IntCounter,
    retry_exhaustion_total: IntCounter,
}

impl PhoenixMetrics {
    pub fn new() -> Result<Self, PhoenixError> {
        let registry = Registry::new();

        let reconciliation_ticks_total = IntCounter::with_opts(
            Opts::new("reconciliation_ticks_total", "Total scheduler reconciliation ticks").namespace("phoenix"),
        )
        .map_err(|e| PhoenixError::unrecoverable(format!("failed to create reconciliation_ticks_total: {e}")))?;

        let phase_transitions_total = IntCounterVec::new(
            Opts::new("phase_transitions_total", "Total experiment phase transitions, by destination phase")
                .namespace("phoenix"),
            &["to_phase"],
        )
        .map_err(|e| PhoenixError::unrecoverable(format!("failed to create phase_transitions_total: {e}")))?;

        let transition_failures_total = IntCounter::with_opts(
            Opts::new("transition_failures_total", "Total phase transitions that failed to commit to the store")
                .namespace("phoenix"),
        )
        .map_err(|e| PhoenixError::unrecoverable(format!("failed to create transition_failures_total: {e}")))?;

        let retry_exhaustion_total = IntCounter::with_opts(
            Opts::new(
                "retry_exhaustion_total",
                "Total times a bounded retry loop (e.g. variant teardown) exhausted its attempt budget",
            )
            .namespace("phoenix"),
        )
        .map_err(|e| PhoenixError::unrecoverable(format!("failed to create retry_exhaustion_total: {e}")))?;

        registry
            .register(Box::new(reconciliation_ticks_total.clone()))
            .map_err(|e| PhoenixError::unrecoverable(format!("failed to register reconciliation_ticks_total: {e}")))?;
        registry
            .register(Box::new(phase_transitions_total.clone()))
            .map_err(|e| PhoenixError::unrecoverable(format!("failed to register phase_transitions_total: {e}")))?;
        registry
            .register(Box::new(transition_failures_total.clone()))
            .map_err(|e| PhoenixError::unrecoverable(format!("failed to register transition_failures_total: {e}")))?;
        registry
            .register(Box::new(retry_exhaustion_total.clone()))
            .map_err(|e| PhoenixError::unrecoverable(format!("failed to register retry_exhaustion_total: {e}")))?;

        Ok(Self {
            registry,
            reconciliation_ticks_total,
            phase_transitions_total,
            transition_failures_total,
            retry_exhaustion_total,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_reconciliation_tick(&self) {
        self.reconciliation_ticks_total.inc();
    }

    pub fn record_phase_transition(&self, to: Phase) {
        self.phase_transitions_total.with_label_values(&[&to.to_string()]).inc();
    }

    pub fn record_transition_failure(&self) {
        self.transition_failures_total.inc();
    }

    pub fn record_retry_exhaustion(&self) {
        self.retry_exhaustion_total.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_without_error() {
        let metrics = PhoenixMetrics::new().unwrap();
        metrics.record_reconciliation_tick();
        metrics.record_phase_transition(Phase::Running);
        metrics.record_transition_failure();
        metrics.record_retry_exhaustion();
        assert!(!metrics.registry().gather().is_empty());
    }
}
