use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{OtpCode, PhoneNumber};

/// Command for verifying a one-time passcode
#[derive(Debug, Clone)]
pub struct VerifyOtpCommand {
  pub phone: String,
  pub code: String,
}

/// Response after a successful verification
#[derive(Debug, Clone)]
pub struct VerifyOtpResponse {
  /// Bearer token for subsequent requests
  pub token: String,
  /// Token expiration timestamp
  pub expires_at: DateTime<Utc>,
}

/// Use case for exchanging a one-time passcode for a bearer token
pub struct VerifyOtpUseCase {
  auth_service: Arc<AuthService>,
}

impl VerifyOtpUseCase {
  /// Creates a new instance of VerifyOtpUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the verify OTP use case
  ///
  /// # Errors
  /// Returns `AuthError::Validation` for malformed input,
  /// `AuthError::Unauthorized` for a wrong, used or expired code.
  pub async fn execute(&self, command: VerifyOtpCommand) -> Result<VerifyOtpResponse, AuthError> {
    let phone = PhoneNumber::new(command.phone)?;
    let code = OtpCode::new(command.code)?;

    let issued = self.auth_service.verify_otp(phone, code).await?;

    Ok(VerifyOtpResponse {
      token: issued.token,
      expires_at: issued.expires_at,
    })
  }
}
