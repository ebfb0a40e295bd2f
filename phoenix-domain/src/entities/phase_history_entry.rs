// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Phase History
//!
//! An append-only audit trail, one entry per committed transition. Entries
//! are immutable once written and totally ordered per experiment by the
//! same commit that performs the store's conditional phase update — this
//! is what lets a crashed scheduler reconstruct "where was this experiment"
//! on restart without any other bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ExperimentId, Phase};

/// Who initiated a phase transition.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Scheduler,
    Api,
    User,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Scheduler => write!(f, "scheduler"),
            Actor::Api => write!(f, "api"),
            Actor::User => write!(f, "user"),
        }
    }
}

/// One committed phase transition, recorded for audit, debugging, and
/// idempotency reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseHistoryEntry {
    pub experiment_id: ExperimentId,
    pub from: Phase,
    pub to: Phase,
    pub at: DateTime<Utc>,
    pub reason: String,
    pub actor: Actor,
}

impl PhaseHistoryEntry {
    pub fn new(
        experiment_id: ExperimentId,
        from: Phase,
        to: Phase,
        reason: impl Into<String>,
        actor: Actor,
    ) -> Self {
        Self {
            experiment_id,
            from,
            to,
            at: Utc::now(),
            reason: reason.into(),
            actor,
        }
    }
}

/// Extracts the phase path (`from` of the first entry, then every `to`) a
/// sequence of history entries for a single experiment represents, for
/// validation against [`crate::value_objects::phase::is_valid_phase_path`].
pub fn phase_path(history: &[PhaseHistoryEntry]) -> Vec<Phase> {
    let mut path = Vec::with_capacity(history.len() + 1);
    if let Some(first) = history.first() {
        path.push(first.from);
    }
    path.extend(history.iter().map(|e| e.to));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::phase::is_valid_phase_path;

    #[test]
    fn phase_path_reconstructs_a_valid_graph_path() {
        let id = ExperimentId::new();
        let history = vec![
            PhaseHistoryEntry::new(id, Phase::Pending, Phase::Initializing, "started", Actor::Api),
            PhaseHistoryEntry::new(id, Phase::Initializing, Phase::Running, "deployed", Actor::Scheduler),
        ];
        assert!(is_valid_phase_path(&phase_path(&history)));
    }
}
