// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Services
//!
//! [`state_machine::PhaseStateMachine`] owns lifecycle transitions and their
//! per-phase side effects; [`experiment_controller::ExperimentController`]
//! fronts the per-operation use cases for the API layer;
//! [`scheduler::Scheduler`] periodically reconciles non-terminal
//! experiments against the state machine.

pub mod experiment_controller;
pub mod scheduler;
pub mod state_machine;
