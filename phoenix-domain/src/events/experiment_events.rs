// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::AnalysisResult;
use crate::value_objects::{ExperimentId, Phase};

/// Something that happened to an experiment, raised by the state machine
/// immediately after the corresponding store commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExperimentEvent {
    Created {
        experiment_id: ExperimentId,
        at: DateTime<Utc>,
    },
    PhaseTransitioned {
        experiment_id: ExperimentId,
        from: Phase,
        to: Phase,
        message: String,
        at: DateTime<Utc>,
    },
    AnalysisCompleted {
        experiment_id: ExperimentId,
        result: AnalysisResult,
        at: DateTime<Utc>,
    },
    TeardownDegraded {
        experiment_id: ExperimentId,
        reason: String,
        at: DateTime<Utc>,
    },
}

impl ExperimentEvent {
    pub fn experiment_id(&self) -> ExperimentId {
        match self {
            ExperimentEvent::Created { experiment_id, .. }
            | ExperimentEvent::PhaseTransitioned { experiment_id, .. }
            | ExperimentEvent::AnalysisCompleted { experiment_id, .. }
            | ExperimentEvent::TeardownDegraded { experiment_id, .. } => *experiment_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_id_is_extracted_from_every_variant() {
        let id = ExperimentId::new();
        let events = vec![
            ExperimentEvent::Created { experiment_id: id, at: Utc::now() },
            ExperimentEvent::PhaseTransitioned {
                experiment_id: id,
                from: Phase::Pending,
                to: Phase::Initializing,
                message: "started".into(),
                at: Utc::now(),
            },
            ExperimentEvent::TeardownDegraded {
                experiment_id: id,
                reason: "1 of 2 hosts unreachable".into(),
                at: Utc::now(),
            },
        ];
        for event in events {
            assert_eq!(event.experiment_id(), id);
        }
    }
}
