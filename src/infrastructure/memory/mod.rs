//! In-process implementations of the store and repository ports
//!
//! They keep the same per-key semantics as the Redis and PostgreSQL
//! adapters (overwrite on issue, compare-and-delete on consume, fixed
//! windows, unique phones) and measure time with `tokio::time::Instant`,
//! so tests can drive expiry with a paused clock.

mod otp_store;
mod rate_limiter;
mod user_repository;

pub use otp_store::MemoryOtpStore;
pub use rate_limiter::MemoryRateLimiter;
pub use user_repository::MemoryUserRepository;

use crate::domain::auth::errors::StoreError;

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
  StoreError::Unavailable("in-memory store lock poisoned".to_string())
}
