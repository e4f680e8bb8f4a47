//! Bounded cooperative polling
//!
//! Every wait in the harness is the same loop: probe, sleep, re-probe,
//! with a hard deadline. [`poll_until`] is that loop; a wait either
//! succeeds within its budget or fails with [`Elapsed`], never hangs.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};

/// Deadline expiry for a bounded poll
#[derive(Debug, Error)]
#[error("condition not met within {waited:?} ({attempts} attempts)")]
pub struct Elapsed {
    /// Total time spent polling
    pub waited: Duration,

    /// Number of probe attempts made
    pub attempts: u32,
}

/// Poll `probe` until it yields a value or `deadline` elapses.
///
/// The probe runs at least once, even with a zero deadline. Between
/// attempts the task sleeps for `interval`. Transient failures are the
/// probe's business: return `None` to keep polling.
pub async fn poll_until<T, F, Fut>(
    deadline: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<T, Elapsed>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if let Some(value) = probe().await {
            return Ok(value);
        }
        if start.elapsed() >= deadline {
            return Err(Elapsed {
                waited: start.elapsed(),
                attempts,
            });
        }
        tracing::trace!(attempts, "condition pending, sleeping {:?}", interval);
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn returns_as_soon_as_the_probe_yields() {
        let calls = Cell::new(0u32);

        let result = poll_until(Duration::from_secs(5), Duration::from_millis(100), || {
            let calls = &calls;
            async move {
                calls.set(calls.get() + 1);
                (calls.get() >= 3).then(|| calls.get())
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fails_with_elapsed_at_the_deadline() {
        let result: Result<(), Elapsed> = poll_until(
            Duration::from_secs(1),
            Duration::from_millis(250),
            || async { None },
        )
        .await;

        let elapsed = result.unwrap_err();
        assert!(elapsed.waited >= Duration::from_secs(1));
        // probes at t = 0, 250, 500, 750, 1000 ms
        assert_eq!(elapsed.attempts, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_deadline_still_probes_once() {
        let result = poll_until(Duration::ZERO, Duration::from_millis(100), || async {
            Some(42)
        })
        .await;
        assert_eq!(result.unwrap(), 42);

        let result: Result<(), Elapsed> =
            poll_until(Duration::ZERO, Duration::from_millis(100), || async { None }).await;
        assert_eq!(result.unwrap_err().attempts, 1);
    }
}
