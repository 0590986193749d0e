pub mod otp_store;
pub mod rate_limiter;

pub use otp_store::RedisOtpStore;
pub use rate_limiter::RedisRateLimiter;

use redis::aio::ConnectionManager;
use std::time::Duration;

use crate::domain::auth::errors::StoreError;

/// Opens a managed connection and checks it answers PING within `timeout`
pub async fn connect(url: &str, timeout: Duration) -> Result<ConnectionManager, StoreError> {
  let client = redis::Client::open(url)?;
  let mut conn = tokio::time::timeout(timeout, ConnectionManager::new(client)).await??;
  ping(&mut conn).await?;
  Ok(conn)
}

pub(crate) async fn ping(conn: &mut ConnectionManager) -> Result<(), StoreError> {
  let pong: String = redis::cmd("PING").query_async(conn).await?;
  if pong != "PONG" {
    return Err(StoreError::UnexpectedReply(pong));
  }
  Ok(())
}
