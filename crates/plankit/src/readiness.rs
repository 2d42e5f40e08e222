//! Bounded wait for the log to finish rendering.

use crate::error::{Error, Result};
use crate::types::ReadinessConfig;
use std::thread;
use std::time::Duration;

/// Predicate telling whether the log is complete enough to summarize.
pub trait ReadinessProbe {
    /// Whether the log is ready.
    fn is_ready(&self) -> bool;
}

impl<F> ReadinessProbe for F
where
    F: Fn() -> bool,
{
    fn is_ready(&self) -> bool {
        self()
    }
}

/// Callback trait for wait progress notifications.
pub trait WaitCallback {
    /// Called after a failed probe, before sleeping.
    ///
    /// # Arguments
    /// * `attempt` - Attempt that just failed (1-indexed)
    /// * `max_attempts` - Maximum number of attempts
    /// * `interval` - Time until the next attempt
    fn on_wait(&self, attempt: u32, max_attempts: u32, interval: Duration);
}

/// Callback that reports each failed attempt at debug level.
pub struct LogCallback;

impl WaitCallback for LogCallback {
    fn on_wait(&self, attempt: u32, max_attempts: u32, interval: Duration) {
        log::debug!(
            "log not ready (attempt {attempt}/{max_attempts}), retrying in {}ms",
            interval.as_millis()
        );
    }
}

/// Poll `probe` until it reports ready or the attempt budget runs out.
///
/// The probe is consulted at most `config.max_retry` times with a fixed
/// `config.interval` between attempts; no sleep follows the final attempt.
///
/// # Returns
/// The number of attempts it took, or [`Error::ReadinessTimeout`].
pub fn wait_until_ready(
    config: &ReadinessConfig,
    probe: &dyn ReadinessProbe,
    callback: Option<&dyn WaitCallback>,
) -> Result<u32> {
    let mut waited = Duration::ZERO;

    for attempt in 0..config.max_retry {
        if probe.is_ready() {
            return Ok(attempt + 1);
        }

        if attempt + 1 >= config.max_retry {
            break;
        }

        if let Some(cb) = callback {
            cb.on_wait(attempt + 1, config.max_retry, config.interval);
        }

        thread::sleep(config.interval);
        waited += config.interval;
    }

    Err(Error::ReadinessTimeout {
        attempts: config.max_retry,
        waited,
    })
}
