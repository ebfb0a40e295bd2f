// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command Line Interface
//!
//! Phoenix is a long-running server, not a batch tool, so its CLI surface
//! is small: where to find configuration and which pieces of it to
//! override for a single run.

use clap::Parser;

/// The experiment control plane.
#[derive(Debug, Parser)]
#[command(name = "phoenix", version, about = "Experiment control plane for A/B testing telemetry collection pipelines")]
pub struct Cli {
    /// Path to a TOML configuration file. Missing is not an error — the
    /// built-in defaults and `PHOENIX_*` environment overrides still apply.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Overrides `http_port` from the loaded configuration.
    #[arg(long, value_name = "PORT")]
    pub http_port: Option<u16>,

    /// Overrides `log_level` from the loaded configuration.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Seconds to wait for in-flight reconciliation tasks to finish before
    /// a SIGTERM/SIGINT forces the process down.
    #[arg(long, value_name = "SECONDS", default_value_t = crate::shutdown::DEFAULT_GRACE_PERIOD_SECS)]
    pub shutdown_grace_period_secs: u64,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_require_no_flags() {
        let cli = Cli::parse_from(["phoenix"]);
        assert_eq!(cli.config, None);
        assert_eq!(cli.http_port, None);
        assert_eq!(cli.shutdown_grace_period_secs, crate::shutdown::DEFAULT_GRACE_PERIOD_SECS);
    }

    #[test]
    fn flags_override_individually() {
        let cli = Cli::parse_from(["phoenix", "--config", "phoenix.toml", "--http-port", "9090"]);
        assert_eq!(cli.config.as_deref(), Some("phoenix.toml"));
        assert_eq!(cli.http_port, Some(9090));
    }
}
