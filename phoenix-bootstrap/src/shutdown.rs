// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shutdown Coordination
//!
//! Manages graceful shutdown across the HTTP server and the scheduler loop.
//! Built on [`tokio_util::sync::CancellationToken`] rather than a hand-rolled
//! one, since the scheduler and the task pool already standardize on it —
//! one cancellation primitive for the whole workspace.
//!
//! ```rust
//! use phoenix_bootstrap::shutdown::ShutdownCoordinator;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
//! let token = coordinator.token();
//!
//! tokio::spawn(async move {
//!     tokio::select! {
//!         _ = token.cancelled() => println!("worker shutting down"),
//!         _ = tokio::time::sleep(Duration::from_secs(1)) => println!("working"),
//!     }
//! });
//!
//! coordinator.initiate_shutdown();
//! coordinator.wait_for_shutdown().await;
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Default grace period for graceful shutdown, in seconds.
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 5;

/// Owns the root cancellation token and tracks whether shutdown completed
/// within its grace period.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
    grace_period: Duration,
    shutdown_initiated: Arc<AtomicBool>,
    shutdown_complete: Arc<Notify>,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            grace_period,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            shutdown_complete: Arc::new(Notify::new()),
        }
    }

    /// A clone of the root token, to be passed to the scheduler and the
    /// HTTP server's graceful-shutdown future.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_initiated.load(Ordering::SeqCst)
    }

    /// Cancels the token exactly once, even if called from multiple signal
    /// handlers racing each other.
    pub fn initiate_shutdown(&self) {
        if self
            .shutdown_initiated
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            tracing::info!(grace_period = ?self.grace_period, "initiating graceful shutdown");
            self.token.cancel();
        }
    }

    /// Races shutdown completion against the grace period. Returns `true`
    /// if [`Self::complete_shutdown`] fired first, `false` on timeout.
    pub async fn wait_for_shutdown(&self) -> bool {
        if !self.is_shutting_down() {
            tracing::warn!("wait_for_shutdown called before shutdown was initiated");
            return true;
        }

        tokio::select! {
            _ = self.shutdown_complete.notified() => {
                tracing::info!("shutdown completed gracefully");
                true
            }
            _ = tokio::time::sleep(self.grace_period) => {
                tracing::warn!("shutdown grace period expired, forcing exit");
                false
            }
        }
    }

    pub fn complete_shutdown(&self) {
        self.shutdown_complete.notify_waiters();
    }

    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        if !self.is_shutting_down() {
            return true;
        }
        tokio::select! {
            _ = self.shutdown_complete.notified() => true,
            _ = tokio::time::sleep(timeout) => false,
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_GRACE_PERIOD_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_not_shutting_down() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
        assert!(!coordinator.is_shutting_down());
        assert!(!coordinator.token().is_cancelled());
    }

    #[test]
    fn initiate_cancels_the_token_exactly_once() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
        let token = coordinator.token();
        coordinator.initiate_shutdown();
        coordinator.initiate_shutdown();
        assert!(coordinator.is_shutting_down());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn wait_for_shutdown_returns_true_on_completion() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
        coordinator.initiate_shutdown();

        let other = coordinator.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            other.complete_shutdown();
        });

        let result = tokio::time::timeout(Duration::from_millis(500), coordinator.wait_for_shutdown()).await;
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn wait_for_shutdown_times_out_without_completion() {
        let coordinator = ShutdownCoordinator::new(Duration::from_millis(20));
        coordinator.initiate_shutdown();
        assert!(!coordinator.wait_for_shutdown().await);
    }

    #[tokio::test]
    async fn wait_with_timeout_honors_a_custom_duration() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(10));
        coordinator.initiate_shutdown();
        assert!(!coordinator.wait_with_timeout(Duration::from_millis(20)).await);
    }
}
