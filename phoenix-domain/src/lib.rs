// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Phoenix Domain
//!
//! The pure business logic of the experiment control plane: what an
//! experiment is, which phase transitions are legal, how a completed
//! experiment's samples turn into a promote/reject recommendation. This
//! crate has no knowledge of SQLite, HTTP, or any particular RPC transport —
//! it depends on nothing from `tokio`, `sqlx`, or `reqwest`, so it can be
//! exercised in a plain `#[test]` with no runtime.
//!
//! ## Module structure
//!
//! - [`entities`] — things with identity: [`entities::Experiment`] is the
//!   aggregate root; [`entities::VariantDeployment`],
//!   [`entities::PhaseHistoryEntry`], and [`entities::AnalysisResult`] are
//!   independent, store-keyed records reloaded per transition rather than
//!   held as in-memory pointers from the experiment (see the design notes
//!   on cyclic references).
//! - [`value_objects`] — immutable, self-validating types with no identity:
//!   [`value_objects::Phase`] encodes the entire lifecycle graph,
//!   [`value_objects::ExperimentConfig`] and
//!   [`value_objects::SuccessCriteria`] encode the creation-time and
//!   promotion-time inputs.
//! - [`services`] — behavioral contracts for the control plane's external
//!   collaborators ([`services::GeneratorClient`], [`services::FleetClient`],
//!   [`services::MetricsClient`]) plus the one domain service that is pure
//!   computation, [`services::Analyzer`].
//! - [`repositories`] — the durable persistence contract,
//!   [`repositories::ExperimentStore`].
//! - [`events`] — notifications raised alongside a committed transition.
//! - [`error`] — the single [`PhoenixError`] type every layer agrees on.
//!
//! This crate deliberately has no `aggregates` module: the teacher workspace
//! wraps its root entity in a dedicated aggregate type because its entity
//! owns nested child entities and rebuilds from an event stream. Phoenix's
//! experiment has no owned children — deployments and phase history are
//! independent, store-keyed records per the design notes — so `Experiment`
//! itself is the consistency boundary; an extra wrapper type would add
//! indirection without a second entity to coordinate.

pub mod entities;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::PhoenixError;
pub use events::ExperimentEvent;
pub use value_objects::{ExperimentConfig, ExperimentId, HostId, Phase, SuccessCriteria, Variant};
