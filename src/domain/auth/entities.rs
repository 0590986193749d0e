use chrono::{DateTime, Utc};
use std::time::Duration;

use super::value_objects::{OtpCode, PhoneNumber};

/// Pending one-time passcode for a phone number
///
/// At most one is live per phone: issuing a new one replaces the previous
/// record in the store. It disappears on successful verification or when
/// its time-to-live elapses.
#[derive(Debug, Clone)]
pub struct OneTimePasscode {
  /// Phone number the code was issued for
  pub phone: PhoneNumber,
  /// The six digit code
  pub code: OtpCode,
  /// Timestamp when the code was issued
  pub issued_at: DateTime<Utc>,
  /// How long the code stays consumable
  pub ttl: Duration,
}

impl OneTimePasscode {
  /// Creates a new passcode issued now
  pub fn new(phone: PhoneNumber, code: OtpCode, ttl: Duration) -> Self {
    Self {
      phone,
      code,
      issued_at: Utc::now(),
      ttl,
    }
  }

  /// Timestamp after which the store treats the code as absent
  pub fn expires_at(&self) -> DateTime<Utc> {
    self.issued_at + chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::zero())
  }
}

/// Signed bearer token handed out after a successful verification
#[derive(Debug, Clone)]
pub struct IssuedToken {
  /// Encoded token
  pub token: String,
  /// Expiration timestamp embedded in the token
  pub expires_at: DateTime<Utc>,
}
