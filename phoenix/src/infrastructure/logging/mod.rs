// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging
//!
//! Structured logging throughout `phoenix` goes straight through
//! `tracing`'s macros at the call site; there is no wrapper service to
//! route through. Subscriber initialization is a once-per-process,
//! bootstrap-time concern and lives in `phoenix-bootstrap::logger`, not
//! here, so that library code never decides its own output format or
//! fans out log lines before the binary has chosen one.
//!
//! This module holds the few conventions shared across call sites:
//! field names every structured log line should use when they apply.

/// Canonical `tracing` field names, kept here so call sites spell them
/// identically instead of drifting (`experiment_id` vs `id` vs `exp_id`).
pub mod fields {
    pub const EXPERIMENT_ID: &str = "experiment_id";
    pub const VARIANT: &str = "variant";
    pub const PHASE: &str = "phase";
    pub const ACTOR: &str = "actor";
}
