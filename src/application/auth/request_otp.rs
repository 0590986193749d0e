use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::PhoneNumber;

/// Command for requesting a one-time passcode
#[derive(Debug, Clone)]
pub struct RequestOtpCommand {
  /// Phone number the code is issued for
  pub phone: String,
}

/// Response after a code was issued
///
/// The code itself is not part of the response; it is delivered out of band.
#[derive(Debug, Clone)]
pub struct RequestOtpResponse {
  pub phone: String,
  /// When the issued code stops being consumable
  pub expires_at: DateTime<Utc>,
}

/// Use case for issuing a one-time passcode
pub struct RequestOtpUseCase {
  auth_service: Arc<AuthService>,
}

impl RequestOtpUseCase {
  /// Creates a new instance of RequestOtpUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the request OTP use case
  ///
  /// # Errors
  /// Returns `AuthError::Validation` for a malformed phone number,
  /// `AuthError::RateLimited` or `AuthError::TemporaryFailure` from the
  /// issuance flow.
  pub async fn execute(&self, command: RequestOtpCommand) -> Result<RequestOtpResponse, AuthError> {
    let phone = PhoneNumber::new(command.phone)?;

    let otp = self.auth_service.request_otp(phone).await?;

    Ok(RequestOtpResponse {
      expires_at: otp.expires_at(),
      phone: otp.phone.into_inner(),
    })
  }
}
