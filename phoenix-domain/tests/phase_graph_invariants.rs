// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Property tests for the phase-transition graph: every path a random walk
//! through [`Phase::allowed_next`] can produce must be accepted by
//! [`is_valid_phase_path`], and no walk can ever continue past a terminal
//! phase.

use phoenix_domain::value_objects::phase::is_valid_phase_path;
use phoenix_domain::Phase;
use proptest::prelude::*;

fn arb_step_choice() -> impl Strategy<Value = usize> {
    0usize..8
}

proptest! {
    #[test]
    fn every_graph_walk_from_pending_is_a_valid_path(choices in proptest::collection::vec(arb_step_choice(), 0..10)) {
        let mut path = vec![Phase::Pending];
        for choice in choices {
            let current = *path.last().unwrap();
            let options = current.allowed_next();
            if options.is_empty() {
                break;
            }
            path.push(options[choice % options.len()]);
        }
        prop_assert!(is_valid_phase_path(&path));
    }

    #[test]
    fn a_walk_never_produces_two_transitions_out_of_a_terminal_phase(choices in proptest::collection::vec(arb_step_choice(), 0..10)) {
        let mut path = vec![Phase::Pending];
        for choice in choices {
            let current = *path.last().unwrap();
            if current.is_terminal() {
                break;
            }
            let options = current.allowed_next();
            if options.is_empty() {
                break;
            }
            path.push(options[choice % options.len()]);
        }
        let terminal_positions: Vec<usize> = path
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_terminal())
            .map(|(i, _)| i)
            .collect();
        for &pos in &terminal_positions {
            prop_assert_eq!(pos, path.len() - 1, "terminal phase must be the last entry in the path");
        }
    }
}

#[test]
fn inserting_an_arbitrary_skip_invalidates_the_path() {
    let path = [Phase::Pending, Phase::Running];
    assert!(!is_valid_phase_path(&path));
}
