// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Phoenix Bootstrap
//!
//! The composition root: the one place in the workspace that knows every
//! concrete type. `phoenix_domain` defines the contracts, `phoenix`
//! implements the use cases and adapters against them, and this crate
//! wires one of each adapter together, starts the HTTP server and the
//! reconciliation scheduler side by side, and takes the process down
//! cleanly on SIGTERM/SIGINT.
//!
//! ## Layout
//!
//! - [`cli`] — the `clap` argument surface.
//! - [`logger`] — installs the global `tracing` subscriber.
//! - [`shutdown`] — grace-period-aware cancellation, shared by the HTTP
//!   server and the scheduler.
//! - [`exit_code`] — maps a fatal [`phoenix_domain::PhoenixError`] onto a
//!   Unix exit status.
//! - [`composition_root`] — builds every collaborator and runs the
//!   server and scheduler to completion.

pub mod cli;
pub mod composition_root;
pub mod exit_code;
pub mod logger;
pub mod shutdown;

pub use cli::Cli;
pub use composition_root::run;
pub use exit_code::ExitCode;
pub use shutdown::ShutdownCoordinator;
