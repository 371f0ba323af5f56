use crate::warn;
use core::future::Future;
use std::fmt::Display;

/// Runs `op` up to `attempts` times, sleeping `delay` between failures; returns the last error.
pub async fn retry_with_delay<F, Fut, T, E>(
    label: &str,
    attempts: usize,
    delay: std::time::Duration,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    assert!(attempts >= 1);
    let mut left = attempts;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if left > 1 => {
                left -= 1;
                warn!("{} failed, {} attempts left: {}", label, left, e);
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
