use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::PhoneNumber;

/// Use case for resolving a bearer token to the phone number it was issued for
pub struct AuthenticateRequestUseCase {
  auth_service: Arc<AuthService>,
}

impl AuthenticateRequestUseCase {
  /// Creates a new instance of AuthenticateRequestUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::Unauthorized` for any invalid token.
  pub fn execute(&self, bearer_token: &str) -> Result<PhoneNumber, AuthError> {
    self.auth_service.authenticate(bearer_token)
  }
}
