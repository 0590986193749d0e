//! Wiring of the application over in-memory adapters, shared by tests

use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::services::{AuthService, AuthServiceConfig};
use crate::domain::auth::value_objects::{OtpCode, PhoneNumber};
use crate::domain::user::UserService;
use crate::infrastructure::memory::{MemoryOtpStore, MemoryRateLimiter, MemoryUserRepository};
use crate::infrastructure::security::{JwtTokenService, SecureCodeGenerator};

pub const TEST_SECRET: &str = "test_secret_key";

pub struct TestApp {
  pub auth_service: Arc<AuthService>,
  pub user_service: Arc<UserService>,
  pub otp_store: Arc<MemoryOtpStore>,
  pub user_repo: Arc<MemoryUserRepository>,
}

impl TestApp {
  pub fn new(rate_limit: u32) -> Self {
    let otp_store = Arc::new(MemoryOtpStore::new());
    let user_repo = Arc::new(MemoryUserRepository::new());
    let config = AuthServiceConfig::default();

    let auth_service = Arc::new(AuthService::new(
      otp_store.clone(),
      Arc::new(MemoryRateLimiter::new(rate_limit, Duration::from_secs(600))),
      Arc::new(SecureCodeGenerator::new()),
      Arc::new(JwtTokenService::new(
        TEST_SECRET,
        "otp-auth-service",
        Duration::from_secs(24 * 3600),
      )),
      user_repo.clone(),
      config.clone(),
    ));
    let user_service = Arc::new(UserService::new(user_repo.clone(), config.call_timeout));

    Self {
      auth_service,
      user_service,
      otp_store,
      user_repo,
    }
  }

  /// Requests a code and reads it back from the store
  pub async fn issue_code(&self, phone: &str) -> String {
    let otp = self
      .auth_service
      .request_otp(PhoneNumber::new(phone).unwrap())
      .await
      .unwrap();
    otp.code.as_str().to_string()
  }

  /// Runs a full login, registering the user, and returns the bearer token
  pub async fn login(&self, phone: &str) -> String {
    let code = self.issue_code(phone).await;
    self
      .auth_service
      .verify_otp(PhoneNumber::new(phone).unwrap(), OtpCode::new(code).unwrap())
      .await
      .unwrap()
      .token
  }
}
