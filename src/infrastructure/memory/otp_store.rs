use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::Instant;

use super::poisoned;
use crate::domain::auth::entities::OneTimePasscode;
use crate::domain::auth::errors::StoreError;
use crate::domain::auth::ports::{ConsumeOutcome, OtpStore};
use crate::domain::auth::value_objects::{OtpCode, PhoneNumber};

struct PendingCode {
  code: String,
  expires_at: Instant,
}

/// OTP store keeping pending codes in a map
#[derive(Default)]
pub struct MemoryOtpStore {
  codes: Mutex<HashMap<String, PendingCode>>,
}

impl MemoryOtpStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the live code for a phone number, if any
  pub fn pending_code(&self, phone: &str) -> Option<String> {
    let codes = self.codes.lock().ok()?;
    codes
      .get(phone)
      .filter(|pending| pending.expires_at > Instant::now())
      .map(|pending| pending.code.clone())
  }

  /// Number of live codes
  pub fn len(&self) -> usize {
    let now = Instant::now();
    self
      .codes
      .lock()
      .map(|codes| codes.values().filter(|p| p.expires_at > now).count())
      .unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
  async fn issue(&self, otp: &OneTimePasscode) -> Result<(), StoreError> {
    let mut codes = self.codes.lock().map_err(poisoned)?;
    codes.insert(
      otp.phone.as_str().to_string(),
      PendingCode {
        code: otp.code.as_str().to_string(),
        expires_at: Instant::now() + otp.ttl,
      },
    );
    Ok(())
  }

  async fn consume(
    &self,
    phone: &PhoneNumber,
    supplied: &OtpCode,
  ) -> Result<ConsumeOutcome, StoreError> {
    let mut codes = self.codes.lock().map_err(poisoned)?;

    let outcome = match codes.get(phone.as_str()) {
      None => ConsumeOutcome::NotFound,
      Some(pending) if pending.expires_at <= Instant::now() => ConsumeOutcome::NotFound,
      Some(pending) if pending.code == supplied.as_str() => ConsumeOutcome::Valid,
      Some(_) => ConsumeOutcome::Invalid,
    };

    match outcome {
      ConsumeOutcome::Valid => {
        codes.remove(phone.as_str());
      }
      ConsumeOutcome::NotFound => {
        // Drop an expired leftover, as the TTL would have
        codes.remove(phone.as_str());
      }
      ConsumeOutcome::Invalid => {}
    }

    Ok(outcome)
  }

  async fn ping(&self) -> Result<(), StoreError> {
    self.codes.lock().map(|_| ()).map_err(poisoned)
  }
}
