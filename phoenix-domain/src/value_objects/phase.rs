// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Experiment Phase
//!
//! `Phase` is the closed set of lifecycle states an experiment can occupy,
//! and the single source of truth for which transitions are legal. The
//! phase graph is intentionally exhaustive and intentionally *not*
//! extensible at runtime: every transition the state machine performs is
//! checked against [`Phase::can_transition_to`] before it ever reaches the
//! store's conditional update.
//!
//! ```text
//! pending → initializing | cancelled
//! initializing → running | failed | cancelled
//! running → analyzing | failed | cancelled
//! analyzing → completed | failed
//! ```
//!
//! Terminal phases (`completed`, `failed`, `cancelled`) have no outgoing
//! transitions; an experiment that reaches one never mutates again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A phase in an experiment's lifecycle.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Pending,
    Initializing,
    Running,
    Analyzing,
    Completed,
    Failed,
    Cancelled,
}

impl Phase {
    /// All phases, in the order a healthy experiment passes through them.
    pub const ALL: [Phase; 7] = [
        Phase::Pending,
        Phase::Initializing,
        Phase::Running,
        Phase::Analyzing,
        Phase::Completed,
        Phase::Failed,
        Phase::Cancelled,
    ];

    /// `true` for phases that never mutate again once entered.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed | Phase::Cancelled)
    }

    /// The phases this phase may legally transition to.
    ///
    /// This is the exhaustive allowed-transitions graph from the lifecycle
    /// specification; it is the only place that graph is encoded, so every
    /// other invariant check (history-path validity, the state machine's
    /// pre-write guard) is expressed in terms of it.
    pub fn allowed_next(&self) -> &'static [Phase] {
        match self {
            Phase::Pending => &[Phase::Initializing, Phase::Cancelled],
            Phase::Initializing => &[Phase::Running, Phase::Failed, Phase::Cancelled],
            Phase::Running => &[Phase::Analyzing, Phase::Failed, Phase::Cancelled],
            Phase::Analyzing => &[Phase::Completed, Phase::Failed],
            Phase::Completed | Phase::Failed | Phase::Cancelled => &[],
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: Phase) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Pending => "pending",
            Phase::Initializing => "initializing",
            Phase::Running => "running",
            Phase::Analyzing => "analyzing",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
            Phase::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Phase::Pending),
            "initializing" => Ok(Phase::Initializing),
            "running" => Ok(Phase::Running),
            "analyzing" => Ok(Phase::Analyzing),
            "completed" => Ok(Phase::Completed),
            "failed" => Ok(Phase::Failed),
            "cancelled" => Ok(Phase::Cancelled),
            other => Err(format!("unknown phase '{other}'")),
        }
    }
}

/// Verifies a sequence of phases (e.g. reconstructed from phase history) is
/// a valid path in the allowed-transitions graph, starting at `pending`.
///
/// A step that stays in the same phase (`pair[0] == pair[1]`) is accepted
/// without consulting the graph: the only entry that ever repeats a phase
/// is the synthetic `pending → pending` record written when an experiment
/// is created, marking its place in the audit trail before any real
/// transition has happened.
pub fn is_valid_phase_path(path: &[Phase]) -> bool {
    match path.first() {
        Some(Phase::Pending) => {}
        _ => return false,
    }
    path.windows(2).all(|pair| pair[0] == pair[1] || pair[0].can_transition_to(pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases_have_no_outgoing_transitions() {
        for phase in [Phase::Completed, Phase::Failed, Phase::Cancelled] {
            assert!(phase.is_terminal());
            assert!(phase.allowed_next().is_empty());
        }
    }

    #[test]
    fn happy_path_promote_is_valid() {
        let path = [
            Phase::Pending,
            Phase::Initializing,
            Phase::Running,
            Phase::Analyzing,
            Phase::Completed,
        ];
        assert!(is_valid_phase_path(&path));
    }

    #[test]
    fn a_leading_self_loop_marks_the_creation_record() {
        let path = [Phase::Pending, Phase::Pending, Phase::Initializing, Phase::Running];
        assert!(is_valid_phase_path(&path));
    }

    #[test]
    fn cancel_during_initializing_is_valid() {
        let path = [Phase::Pending, Phase::Initializing, Phase::Cancelled];
        assert!(is_valid_phase_path(&path));
    }

    #[test]
    fn skipping_a_phase_is_invalid() {
        let path = [Phase::Pending, Phase::Running];
        assert!(!is_valid_phase_path(&path));
    }

    #[test]
    fn not_starting_at_pending_is_invalid() {
        let path = [Phase::Initializing, Phase::Running];
        assert!(!is_valid_phase_path(&path));
    }

    #[test]
    fn display_and_parse_round_trip() {
        for phase in Phase::ALL {
            let parsed: Phase = phase.to_string().parse().unwrap();
            assert_eq!(parsed, phase);
        }
    }
}
