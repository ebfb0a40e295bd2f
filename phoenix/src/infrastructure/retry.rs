// /////////////////////////////////////////////////////////////////////////////
// Phoenix
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Backoff Retry
//!
//! Bounded exponential backoff with jitter for the `transient`-classified
//! failures `PhoenixError::is_recoverable` flags — a dropped connection to
//! the generator or fleet service, a 5xx, a request timeout. Anything else
//! (`validation`, `conflict`, `unrecoverable`) is returned to the caller on
//! the first attempt; only the control plane's own phase transition ever
//! turns a retry-exhausted failure into `failed`.
//!
//! `tokio::time::sleep` stands in for the synchronous backoff loop this is
//! adapted from; every operation and every sleep is run under the caller's
//! `CancellationToken` so a retry loop never outlives a cancelled
//! experiment.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use phoenix_domain::PhoenixError;

/// Maximum number of attempts within a single phase before the caller
/// should give up and transition the experiment to `failed`.
pub const MAX_ATTEMPTS: u32 = 5;

/// Delay before the first retry.
pub const BASE_DELAY: Duration = Duration::from_secs(1);

/// Delay never grows past this, no matter how many attempts remain.
pub const MAX_DELAY: Duration = Duration::from_secs(30);

/// `base * 2^(attempt - 1)`, capped at `max`, then jittered by `+/-50%` so a
/// fleet of experiments retrying the same outage don't all wake up on the
/// same tick.
fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let scaled = BASE_DELAY.saturating_mul(1u32.checked_shl(exponent).unwrap_or(u32::MAX));
    apply_jitter(scaled.min(MAX_DELAY))
}

fn apply_jitter(delay: Duration) -> Duration {
    let factor = rand::thread_rng().gen_range(0.5..=1.5);
    Duration::from_millis(((delay.as_millis() as f64) * factor).round() as u64)
}

/// Outcome of a retried operation: either it eventually succeeded (or
/// failed with a non-retryable error), or the caller's token fired while a
/// retry was pending.
pub enum RetryOutcome<T> {
    Settled(Result<T, PhoenixError>),
    Cancelled,
}

/// Runs `operation` up to [`MAX_ATTEMPTS`] times, retrying only when the
/// error is [`PhoenixError::is_recoverable`] and attempts remain. Returns as
/// soon as the operation succeeds, the error is non-retryable, or attempts
/// are exhausted — in the last case the final transient error is returned
/// rather than swallowed, so the caller's `failed` message still names the
/// underlying cause.
pub async fn retry_transient<T, F, Fut>(cancel: &CancellationToken, mut operation: F) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PhoenixError>>,
{
    let mut attempt = 1;
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return RetryOutcome::Cancelled,
            result = operation() => result,
        };

        match result {
            Ok(value) => return RetryOutcome::Settled(Ok(value)),
            Err(error) if error.is_recoverable() && attempt < MAX_ATTEMPTS => {
                let delay = backoff_delay(attempt);
                tracing::warn!(attempt, ?delay, %error, "transient failure, retrying after backoff");
                tokio::select! {
                    _ = cancel.cancelled() => return RetryOutcome::Cancelled,
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
            Err(error) => return RetryOutcome::Settled(Err(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn backoff_grows_and_caps_within_jitter_bounds() {
        for attempt in 1..=MAX_ATTEMPTS {
            let delay = backoff_delay(attempt);
            assert!(delay <= MAX_DELAY.mul_f64(1.51), "attempt {attempt} delay {delay:?} exceeds jittered cap");
        }
    }

    #[tokio::test]
    async fn succeeds_without_retry_when_first_attempt_succeeds() {
        let cancel = CancellationToken::new();
        let calls = AtomicU32::new(0);
        let outcome = retry_transient(&cancel, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, PhoenixError>(42) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match outcome {
            RetryOutcome::Settled(Ok(v)) => assert_eq!(v, 42),
            _ => panic!("expected a settled success"),
        }
    }

    #[tokio::test]
    async fn non_retryable_errors_stop_after_one_attempt() {
        let cancel = CancellationToken::new();
        let calls = AtomicU32::new(0);
        let outcome = retry_transient(&cancel, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(PhoenixError::validation("bad template")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(outcome, RetryOutcome::Settled(Err(e)) if !e.is_recoverable()));
    }

    #[tokio::test]
    async fn cancelling_stops_the_retry_loop() {
        // An operation that never resolves forces the race to settle on
        // the cancellation branch deterministically.
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome: RetryOutcome<()> = retry_transient(&cancel, || std::future::pending()).await;

        assert!(matches!(outcome, RetryOutcome::Cancelled));
    }
}
