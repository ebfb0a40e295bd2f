// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Events
//!
//! Notifications raised alongside a committed state change, for the
//! scheduler's own audit logging and for any future subscriber (the
//! WebSocket fan-out named as an external collaborator in the system
//! overview). Events are descriptive, not authoritative — the store and
//! phase history remain the source of truth; nothing replays events to
//! reconstruct state.

mod experiment_events;

pub use experiment_events::ExperimentEvent;
