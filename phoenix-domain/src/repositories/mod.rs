// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repository Contracts
//!
//! Behavioral contracts for durable persistence, defined here so the
//! application and domain layers can depend on them without knowing the
//! concrete storage technology. `phoenix::infrastructure` supplies the
//! production (`sqlx`/SQLite) implementation; tests supply an in-memory one.

mod experiment_store;

pub use experiment_store::{ExperimentFilter, ExperimentStore};
