// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging Bootstrap
//!
//! Installs the one global `tracing` subscriber the whole process uses.
//! `phoenix`'s own modules never touch a subscriber — they log through
//! `tracing`'s macros and trust whoever owns `main` to have called
//! [`init`] first.

use phoenix_domain::PhoenixError;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `level` (falling back to
/// `info` for anything that doesn't parse as a `tracing` level or
/// `EnvFilter` directive), honoring `RUST_LOG` if set so operators can
/// override the configured level without a redeploy.
pub fn init(level: &str) -> Result<(), PhoenixError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| PhoenixError::invalid_config(format!("failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_bare_level_name() {
        // try_init only succeeds once per process; this just exercises the
        // EnvFilter construction path without asserting on global state.
        let _ = EnvFilter::try_new("info").expect("info should parse as a directive");
        let _ = init; // smoke-test that the function compiles with this signature
    }
}
