// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Binary entry point: parse arguments, load configuration, install
//! logging, then hand off to the composition root until a shutdown signal
//! brings it back down.

use std::time::Duration;

use phoenix::PhoenixConfig;
use phoenix_bootstrap::{cli::Cli, composition_root, exit_code, logger, ShutdownCoordinator};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let mut config = match PhoenixConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("failed to load configuration: {error}");
            std::process::exit(exit_code::ExitCode::from_error(&error).as_i32());
        }
    };

    if let Some(port) = cli.http_port {
        config.http_port = port;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    if let Err(error) = logger::init(&config.log_level) {
        eprintln!("failed to initialize logging: {error}");
        std::process::exit(exit_code::ExitCode::from_error(&error).as_i32());
    }

    let shutdown = ShutdownCoordinator::new(Duration::from_secs(cli.shutdown_grace_period_secs));
    spawn_signal_handlers(shutdown.clone());

    let result = composition_root::run(config, shutdown).await;
    let code = exit_code::result_to_exit_code(&result);
    if let Err(error) = &result {
        tracing::error!(%error, exit_code = code.as_i32(), "phoenix exiting with an error");
    }
    std::process::exit(code.as_i32());
}

/// Drives `shutdown.initiate_shutdown()` from either SIGINT or (on Unix)
/// SIGTERM, whichever arrives first.
fn spawn_signal_handlers(shutdown: ShutdownCoordinator) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(error) => {
                    tracing::warn!(%error, "failed to install SIGTERM handler, only SIGINT will trigger shutdown");
                    let _ = tokio::signal::ctrl_c().await;
                    shutdown.initiate_shutdown();
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        shutdown.initiate_shutdown();
    });
}
