// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete [`phoenix_domain::repositories::ExperimentStore`] implementations.

pub mod schema;
pub mod sqlite_store;

pub use sqlite_store::SqliteExperimentStore;
