// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! Orchestration that depends only on `phoenix_domain` contracts, never on
//! a concrete adapter. [`services::experiment_controller::ExperimentController`]
//! fronts the per-operation use cases; [`services::state_machine::PhaseStateMachine`]
//! owns lifecycle transitions and their side effects;
//! [`services::scheduler::Scheduler`] drives reconciliation.

pub mod commands;
pub mod metric_naming;
pub mod services;
pub mod use_cases;
