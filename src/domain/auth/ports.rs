use async_trait::async_trait;

use super::entities::{IssuedToken, OneTimePasscode};
use super::errors::{GeneratorError, StoreError, TokenError};
use super::value_objects::{OtpCode, PhoneNumber};

/// Result of presenting a code to the OTP store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
  /// The code matched and the pending record has been deleted
  Valid,
  /// A code is pending but differs; the record is left in place
  Invalid,
  /// No pending code (never issued, expired or already consumed)
  NotFound,
}

/// Service trait for one-time code generation
pub trait CodeGenerator: Send + Sync {
  /// Draws a uniformly random code from a cryptographically secure source
  fn generate(&self) -> Result<OtpCode, GeneratorError>;
}

/// Keyed store holding at most one pending code per phone number
#[async_trait]
pub trait OtpStore: Send + Sync {
  /// Stores the code, replacing any pending one, with expiry `otp.ttl` from now
  async fn issue(&self, otp: &OneTimePasscode) -> Result<(), StoreError>;

  /// Atomically compares the supplied code and deletes the record on a match
  async fn consume(
    &self,
    phone: &PhoneNumber,
    supplied: &OtpCode,
  ) -> Result<ConsumeOutcome, StoreError>;

  /// Checks connectivity to the underlying store
  async fn ping(&self) -> Result<(), StoreError>;
}

/// Fixed-window counter of issuance attempts per phone number
#[async_trait]
pub trait RateLimiter: Send + Sync {
  /// Counts one attempt and reports whether it falls within the limit
  async fn allow(&self, phone: &PhoneNumber) -> Result<bool, StoreError>;
}

/// Stateless signer and verifier of bearer tokens
pub trait TokenService: Send + Sync {
  /// Signs a token bound to the phone number
  fn issue(&self, phone: &PhoneNumber) -> Result<IssuedToken, TokenError>;

  /// Verifies a token and returns the phone number it was issued for
  fn validate(&self, token: &str) -> Result<PhoneNumber, TokenError>;
}
