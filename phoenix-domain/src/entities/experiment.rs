// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Experiment
//!
//! The aggregate root of the control plane: one `Experiment` tracks a single
//! baseline/candidate comparison from creation through its terminal phase.
//! The entity enforces the timestamp and result invariants described in the
//! lifecycle specification; the legality of the phase transitions themselves
//! is delegated to [`Phase::can_transition_to`] and ultimately to the store's
//! conditional update, since this entity has no way to detect a concurrent
//! writer on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::AnalysisResult;
use crate::value_objects::{ExperimentConfig, ExperimentId, Phase};
use crate::PhoenixError;

/// A single baseline-vs-candidate experiment and its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub id: ExperimentId,
    pub name: String,
    pub description: String,
    pub config: ExperimentConfig,
    pub phase: Phase,
    /// Human-readable status detail, surfaced verbatim by the API
    /// (e.g. the failure reason, or a caution note on a neutral result).
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set the first time the experiment enters `running`; stays set
    /// afterward, including across recovery.
    pub started_at: Option<DateTime<Utc>>,
    /// Set the first time the experiment enters a terminal phase.
    pub completed_at: Option<DateTime<Utc>>,
    /// Populated only on the transition out of `analyzing`.
    pub results: Option<AnalysisResult>,
    pub owner: String,
    /// `true` if the experiment's teardown ran against a deployment that
    /// never reached `ready` (fewer target hosts torn down than requested).
    pub degraded_teardown: bool,
    /// Optional caller-supplied revision tag for the config bundle that
    /// produced this experiment, carried through for audit.
    pub revision: Option<String>,
}

impl Experiment {
    /// Builds a brand-new experiment in `pending`, validating its
    /// configuration up front so invalid input never reaches the store.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        config: ExperimentConfig,
        owner: impl Into<String>,
        revision: Option<String>,
    ) -> Result<Self, PhoenixError> {
        config.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: ExperimentId::new(),
            name: name.into(),
            description: description.into(),
            config,
            phase: Phase::Pending,
            message: String::new(),
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            results: None,
            owner: owner.into(),
            degraded_teardown: false,
            revision,
        })
    }

    /// Applies a committed transition to this in-memory copy, maintaining
    /// the timestamp invariants. Callers are expected to have already
    /// confirmed the transition is legal (via [`Phase::can_transition_to`])
    /// and durable (via the store's conditional update) before calling this
    /// — it does not re-check legality itself, so that a caller replaying a
    /// store-confirmed history can apply it unconditionally.
    pub fn apply_transition(&mut self, to: Phase, message: impl Into<String>) {
        let now = Utc::now();
        if to == Phase::Running && self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if to.is_terminal() && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.phase = to;
        self.message = message.into();
        self.updated_at = now;
    }

    /// Attaches the analyzer's output; only meaningful on the transition out
    /// of `analyzing`, but left uncontested here since enforcement of *when*
    /// belongs to the state machine, not the entity.
    pub fn attach_results(&mut self, results: AnalysisResult) {
        self.results = Some(results);
        self.updated_at = Utc::now();
    }

    pub fn mark_degraded_teardown(&mut self) {
        self.degraded_teardown = true;
        self.updated_at = Utc::now();
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{HostId, SuccessCriteria};
    use std::time::Duration;

    fn config() -> ExperimentConfig {
        ExperimentConfig {
            baseline_pipeline: "baseline-v1".into(),
            candidate_pipeline: "candidate-v2".into(),
            target_hosts: vec![HostId::new("h1").unwrap()],
            duration: Duration::from_secs(60),
            variables: Default::default(),
            success_criteria: SuccessCriteria {
                min_cardinality_reduction: 0.5,
                max_cpu_overhead: 0.1,
                max_memory_overhead: 0.1,
                critical_process_coverage: 0.95,
            },
        }
    }

    #[test]
    fn new_experiment_starts_pending_with_no_timestamps_set() {
        let exp = Experiment::new("exp-1", "desc", config(), "alice", None).unwrap();
        assert_eq!(exp.phase, Phase::Pending);
        assert!(exp.started_at.is_none());
        assert!(exp.completed_at.is_none());
        assert!(exp.results.is_none());
    }

    #[test]
    fn started_at_is_set_once_on_first_entry_to_running() {
        let mut exp = Experiment::new("exp-1", "desc", config(), "alice", None).unwrap();
        exp.apply_transition(Phase::Initializing, "deploying");
        exp.apply_transition(Phase::Running, "live");
        let first = exp.started_at.unwrap();

        // A later, unrelated transition must not move started_at again.
        exp.apply_transition(Phase::Analyzing, "collecting samples");
        assert_eq!(exp.started_at.unwrap(), first);
    }

    #[test]
    fn completed_at_is_set_on_first_terminal_entry_only() {
        let mut exp = Experiment::new("exp-1", "desc", config(), "alice", None).unwrap();
        exp.apply_transition(Phase::Initializing, "deploying");
        exp.apply_transition(Phase::Cancelled, "user cancelled");
        assert!(exp.completed_at.is_some());
        assert!(exp.is_terminal());
    }

    #[test]
    fn rejects_invalid_configuration_at_construction() {
        let mut bad = config();
        bad.target_hosts.clear();
        assert!(Experiment::new("exp-1", "desc", bad, "alice", None).is_err());
    }
}
