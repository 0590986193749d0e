use std::future::Future;
use std::time::Duration;

use tokio::time::error::Elapsed;

/// Runs a remote call under a time ceiling
///
/// An elapsed ceiling is reported through the call's own error type, so a
/// dependency outage surfaces as a fast failure instead of a hung request.
pub async fn bounded<T, E, F>(limit: Duration, call: F) -> Result<T, E>
where
  F: Future<Output = Result<T, E>>,
  E: From<Elapsed>,
{
  tokio::time::timeout(limit, call).await?
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::StoreError;

  #[tokio::test(start_paused = true)]
  async fn test_bounded_times_out_slow_calls() {
    let result: Result<(), StoreError> = bounded(Duration::from_secs(2), async {
      tokio::time::sleep(Duration::from_secs(10)).await;
      Ok(())
    })
    .await;

    assert!(matches!(result, Err(StoreError::Timeout)));
  }

  #[tokio::test]
  async fn test_bounded_passes_through_results() {
    let result: Result<u32, StoreError> = bounded(Duration::from_secs(2), async { Ok(7) }).await;
    assert_eq!(result.unwrap(), 7);

    let result: Result<u32, StoreError> = bounded(Duration::from_secs(2), async {
      Err(StoreError::Unavailable("down".to_string()))
    })
    .await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
  }
}
