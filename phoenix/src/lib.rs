// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Phoenix
//!
//! Application and infrastructure layers for the experiment control plane.
//! Where [`phoenix_domain`] defines *what* an experiment is and which
//! transitions are legal, this crate provides *how* the control plane runs
//! it: use cases that orchestrate the domain contracts, a state machine
//! that performs per-phase side effects against real collaborators, a
//! reconciliation scheduler, and the concrete adapters (SQLite, HTTP
//! clients, an axum API) that satisfy the domain's repository and service
//! traits.
//!
//! ## Layering
//!
//! - [`application`] — use cases, the experiment controller, the phase
//!   state machine, and the reconciliation scheduler. Depends only on
//!   `phoenix_domain` trait objects, never on a concrete adapter.
//! - [`infrastructure`] — configuration, logging, operational metrics, the
//!   `sqlx`/SQLite store, `reqwest`-based RPC clients, in-memory test
//!   doubles, and the `axum` HTTP surface.

pub mod application;
pub mod infrastructure;

pub use application::services::experiment_controller::ExperimentController;
pub use application::services::scheduler::Scheduler;
pub use application::services::state_machine::PhaseStateMachine;
pub use infrastructure::config::PhoenixConfig;
