use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use super::poisoned;
use crate::domain::auth::errors::StoreError;
use crate::domain::auth::ports::RateLimiter;
use crate::domain::auth::value_objects::PhoneNumber;

struct Window {
  count: u32,
  expires_at: Instant,
}

/// Fixed-window rate limiter keeping counters in a map
pub struct MemoryRateLimiter {
  limit: u32,
  window: Duration,
  counters: Mutex<HashMap<String, Window>>,
}

impl MemoryRateLimiter {
  pub fn new(limit: u32, window: Duration) -> Self {
    Self {
      limit,
      window,
      counters: Mutex::new(HashMap::new()),
    }
  }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
  async fn allow(&self, phone: &PhoneNumber) -> Result<bool, StoreError> {
    let mut counters = self.counters.lock().map_err(poisoned)?;
    let now = Instant::now();

    if counters
      .get(phone.as_str())
      .is_some_and(|window| window.expires_at <= now)
    {
      counters.remove(phone.as_str());
    }

    // The window starts with the first attempt, like INCR followed by EXPIRE
    let window = counters
      .entry(phone.as_str().to_string())
      .or_insert_with(|| Window {
        count: 0,
        expires_at: now + self.window,
      });
    window.count = window.count.saturating_add(1);

    Ok(window.count <= self.limit)
  }
}
