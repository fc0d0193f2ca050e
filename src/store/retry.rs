//! Bounded retry with exponential backoff.

use crate::config::RetryConfig;

/// Runs `operation` until it succeeds or `config.max_attempts` attempts have failed.
///
/// Returns the result together with the number of attempts made. A
/// `max_attempts` of zero still runs the operation once.
pub fn with_retry<T, E, F>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> (Result<T, E>, u32)
where
    F: FnMut() -> Result<T, E>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation() {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(
                        "{}: Succeeded on attempt {}/{}",
                        operation_name,
                        attempt,
                        max_attempts
                    );
                }
                return (Ok(value), attempt);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!(
                    "{}: All {} attempts failed. Last error: {}",
                    operation_name,
                    max_attempts,
                    e
                );
                return (Err(e), attempt);
            }
            Err(e) => {
                let delay = config.delay_for_retry(attempt);
                tracing::warn!(
                    "{}: Attempt {}/{} failed ({}), retrying in {:?}",
                    operation_name,
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                attempt += 1;
            }
        }
    }
}
