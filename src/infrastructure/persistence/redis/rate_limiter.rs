use async_trait::async_trait;
use redis::Script;
use redis::aio::ConnectionManager;
use std::time::Duration;

use crate::domain::auth::errors::StoreError;
use crate::domain::auth::ports::RateLimiter;
use crate::domain::auth::value_objects::PhoneNumber;

const KEY_PREFIX: &str = "rate";

// The window opens on the first attempt; later attempts only increment
const FIXED_WINDOW_SCRIPT: &str = r#"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
  redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return current
"#;

/// Redis fixed-window rate limiter keyed by `rate:<phone>`
pub struct RedisRateLimiter {
  conn: ConnectionManager,
  limit: u32,
  window: Duration,
  script: Script,
}

impl RedisRateLimiter {
  /// Creates a new instance of RedisRateLimiter
  pub fn new(conn: ConnectionManager, limit: u32, window: Duration) -> Self {
    Self {
      conn,
      limit,
      window,
      script: Script::new(FIXED_WINDOW_SCRIPT),
    }
  }

  fn key(phone: &PhoneNumber) -> String {
    format!("{}:{}", KEY_PREFIX, phone)
  }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
  async fn allow(&self, phone: &PhoneNumber) -> Result<bool, StoreError> {
    let mut conn = self.conn.clone();

    let current: i64 = self
      .script
      .key(Self::key(phone))
      .arg(self.window.as_secs().max(1))
      .invoke_async(&mut conn)
      .await?;

    let allowed = current <= i64::from(self.limit);
    tracing::debug!(phone = %phone, current, allowed, "Fixed window rate limit check");

    Ok(allowed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::redis::test_support::setup_test_redis;

  #[tokio::test]
  async fn test_fixed_window_limit() {
    let (conn, _container) = setup_test_redis().await;
    let limiter = RedisRateLimiter::new(conn, 3, Duration::from_secs(60));
    let phone = PhoneNumber::new("+100").unwrap();
    let other = PhoneNumber::new("+200").unwrap();

    for _ in 0..3 {
      assert!(limiter.allow(&phone).await.unwrap());
    }
    assert!(!limiter.allow(&phone).await.unwrap());
    assert!(limiter.allow(&other).await.unwrap());
  }

  #[tokio::test]
  async fn test_window_expiry_resets_counter() {
    let (conn, _container) = setup_test_redis().await;
    let limiter = RedisRateLimiter::new(conn, 1, Duration::from_secs(1));
    let phone = PhoneNumber::new("+100").unwrap();

    assert!(limiter.allow(&phone).await.unwrap());
    assert!(!limiter.allow(&phone).await.unwrap());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(limiter.allow(&phone).await.unwrap());
  }
}
