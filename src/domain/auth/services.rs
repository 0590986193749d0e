use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use super::entities::{IssuedToken, OneTimePasscode};
use super::errors::AuthError;
use super::ports::{CodeGenerator, ConsumeOutcome, OtpStore, RateLimiter, TokenService};
use super::value_objects::{OtpCode, PhoneNumber};
use crate::domain::timeout::bounded;
use crate::domain::user::{RepositoryError, UserRepository};

const DEFAULT_OTP_TTL_SECONDS: u64 = 120;
const DEFAULT_CALL_TIMEOUT_MS: u64 = 2000;

/// Tunables for the authentication flows
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  /// How long an issued code stays consumable
  pub otp_ttl: Duration,
  /// Ceiling applied to every store and database call
  pub call_timeout: Duration,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      otp_ttl: Duration::from_secs(DEFAULT_OTP_TTL_SECONDS),
      call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
    }
  }
}

/// Authentication service composing the OTP and token flows
///
/// Issuance: rate limiter, then code generator, then OTP store.
/// Verification: OTP store, then user lookup/creation, then token issuer.
/// Neither flow retries internally; every store call is bounded by
/// `AuthServiceConfig::call_timeout`.
pub struct AuthService {
  otp_store: Arc<dyn OtpStore>,
  rate_limiter: Arc<dyn RateLimiter>,
  code_generator: Arc<dyn CodeGenerator>,
  token_service: Arc<dyn TokenService>,
  user_repo: Arc<dyn UserRepository>,
  config: AuthServiceConfig,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(
    otp_store: Arc<dyn OtpStore>,
    rate_limiter: Arc<dyn RateLimiter>,
    code_generator: Arc<dyn CodeGenerator>,
    token_service: Arc<dyn TokenService>,
    user_repo: Arc<dyn UserRepository>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      otp_store,
      rate_limiter,
      code_generator,
      token_service,
      user_repo,
      config,
    }
  }

  /// Issues a fresh one-time passcode for the phone number
  ///
  /// The code is delivered out of band by logging it.
  ///
  /// # Errors
  /// Returns `AuthError::RateLimited` when the phone exhausted its window,
  /// `AuthError::TemporaryFailure` when the generator or a store fails.
  pub async fn request_otp(&self, phone: PhoneNumber) -> Result<OneTimePasscode, AuthError> {
    let allowed = bounded(self.config.call_timeout, self.rate_limiter.allow(&phone))
      .await
      .map_err(|e| temporary_failure("rate limit check failed", &phone, e))?;

    if !allowed {
      tracing::warn!(phone = %phone, "OTP request rate limited");
      return Err(AuthError::RateLimited);
    }

    let code = self
      .code_generator
      .generate()
      .map_err(|e| temporary_failure("otp generation failed", &phone, e))?;

    let otp = OneTimePasscode::new(phone, code, self.config.otp_ttl);

    bounded(self.config.call_timeout, self.otp_store.issue(&otp))
      .await
      .map_err(|e| temporary_failure("otp storage failed", &otp.phone, e))?;

    tracing::info!(
      phone = %otp.phone,
      code = otp.code.as_str(),
      expires_at = %otp.expires_at(),
      "OTP generated"
    );

    Ok(otp)
  }

  /// Verifies a code and issues a bearer token for the phone number
  ///
  /// A user is created on first successful verification. A wrong code does
  /// not consume the pending one.
  ///
  /// # Errors
  /// Returns `AuthError::Unauthorized` for wrong, expired or already used
  /// codes, `AuthError::TemporaryFailure` when a dependency fails.
  pub async fn verify_otp(
    &self,
    phone: PhoneNumber,
    code: OtpCode,
  ) -> Result<IssuedToken, AuthError> {
    let outcome = bounded(self.config.call_timeout, self.otp_store.consume(&phone, &code))
      .await
      .map_err(|e| temporary_failure("otp validation failed", &phone, e))?;

    if outcome != ConsumeOutcome::Valid {
      tracing::info!(phone = %phone, outcome = ?outcome, "OTP verification rejected");
      return Err(AuthError::Unauthorized);
    }

    self.ensure_user(&phone).await?;

    let token = self
      .token_service
      .issue(&phone)
      .map_err(|e| temporary_failure("token signing failed", &phone, e))?;

    tracing::info!(phone = %phone, expires_at = %token.expires_at, "OTP verified, token issued");

    Ok(token)
  }

  /// Validates a bearer token and returns the phone number it is bound to
  ///
  /// # Errors
  /// Returns `AuthError::Unauthorized` for any token problem.
  pub fn authenticate(&self, bearer_token: &str) -> Result<PhoneNumber, AuthError> {
    self.token_service.validate(bearer_token).map_err(|e| {
      tracing::warn!(error = %e, "Bearer token rejected");
      AuthError::Unauthorized
    })
  }

  /// Creates the user for the phone number unless it already exists
  async fn ensure_user(&self, phone: &PhoneNumber) -> Result<(), AuthError> {
    let exists = bounded(self.config.call_timeout, self.user_repo.exists(phone))
      .await
      .map_err(|e| temporary_failure("user lookup failed", phone, e))?;

    if exists {
      return Ok(());
    }

    match bounded(self.config.call_timeout, self.user_repo.create(phone)).await {
      Ok(user) => {
        tracing::info!(phone = %phone, user_id = user.id, "User created");
        Ok(())
      }
      Err(RepositoryError::DuplicateKey(_)) => {
        tracing::debug!(phone = %phone, "User created by a concurrent request");
        Ok(())
      }
      Err(e) => Err(temporary_failure("user creation failed", phone, e)),
    }
  }
}

/// Logs a dependency error and folds it into `AuthError::TemporaryFailure`
fn temporary_failure(context: &'static str, phone: &PhoneNumber, error: impl Display) -> AuthError {
  tracing::error!(phone = %phone, error = %error, "{}", context);
  AuthError::TemporaryFailure(context.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::{GeneratorError, StoreError};
  use crate::infrastructure::memory::{MemoryOtpStore, MemoryRateLimiter, MemoryUserRepository};
  use crate::infrastructure::security::{JwtTokenService, SecureCodeGenerator};
  use async_trait::async_trait;

  const SECRET: &str = "test_secret_key";

  struct Harness {
    service: AuthService,
    otp_store: Arc<MemoryOtpStore>,
    user_repo: Arc<MemoryUserRepository>,
  }

  fn harness(rate_limit: u32) -> Harness {
    harness_with(rate_limit, Arc::new(SecureCodeGenerator::new()))
  }

  fn harness_with(rate_limit: u32, generator: Arc<dyn CodeGenerator>) -> Harness {
    let otp_store = Arc::new(MemoryOtpStore::new());
    let user_repo = Arc::new(MemoryUserRepository::new());
    let service = AuthService::new(
      otp_store.clone(),
      Arc::new(MemoryRateLimiter::new(rate_limit, Duration::from_secs(60))),
      generator,
      Arc::new(JwtTokenService::new(
        SECRET,
        "otp-auth-service",
        Duration::from_secs(24 * 3600),
      )),
      user_repo.clone(),
      AuthServiceConfig::default(),
    );

    Harness {
      service,
      otp_store,
      user_repo,
    }
  }

  fn phone(value: &str) -> PhoneNumber {
    PhoneNumber::new(value).unwrap()
  }

  struct UnavailableStore;

  #[async_trait]
  impl OtpStore for UnavailableStore {
    async fn issue(&self, _otp: &OneTimePasscode) -> Result<(), StoreError> {
      Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn consume(
      &self,
      _phone: &PhoneNumber,
      _supplied: &OtpCode,
    ) -> Result<ConsumeOutcome, StoreError> {
      Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
      Err(StoreError::Unavailable("connection refused".to_string()))
    }
  }

  struct HangingRateLimiter;

  #[async_trait]
  impl RateLimiter for HangingRateLimiter {
    async fn allow(&self, _phone: &PhoneNumber) -> Result<bool, StoreError> {
      tokio::time::sleep(Duration::from_secs(60)).await;
      Ok(true)
    }
  }

  struct BrokenGenerator;

  impl CodeGenerator for BrokenGenerator {
    fn generate(&self) -> Result<OtpCode, GeneratorError> {
      Err(GeneratorError::RandomnessUnavailable("entropy exhausted".to_string()))
    }
  }

  fn service_with_store(otp_store: Arc<dyn OtpStore>, rate_limiter: Arc<dyn RateLimiter>) -> AuthService {
    AuthService::new(
      otp_store,
      rate_limiter,
      Arc::new(SecureCodeGenerator::new()),
      Arc::new(JwtTokenService::new(
        SECRET,
        "otp-auth-service",
        Duration::from_secs(24 * 3600),
      )),
      Arc::new(MemoryUserRepository::new()),
      AuthServiceConfig::default(),
    )
  }

  #[tokio::test]
  async fn test_request_then_verify_authenticates() {
    let h = harness(5);

    let otp = h.service.request_otp(phone("+100")).await.unwrap();
    let token = h
      .service
      .verify_otp(phone("+100"), otp.code.clone())
      .await
      .unwrap();

    assert_eq!(h.service.authenticate(&token.token).unwrap(), phone("+100"));
  }

  #[tokio::test]
  async fn test_sixth_request_in_window_is_rate_limited() {
    let h = harness(5);

    for _ in 0..5 {
      h.service.request_otp(phone("+200")).await.unwrap();
    }

    let result = h.service.request_otp(phone("+200")).await;
    assert!(matches!(result, Err(AuthError::RateLimited)));
  }

  #[tokio::test]
  async fn test_rate_limit_is_per_phone() {
    let h = harness(1);

    h.service.request_otp(phone("+200")).await.unwrap();
    assert!(h.service.request_otp(phone("+201")).await.is_ok());
  }

  #[tokio::test]
  async fn test_rate_limited_request_keeps_pending_code() {
    let h = harness(1);

    let otp = h.service.request_otp(phone("+200")).await.unwrap();
    assert!(matches!(
      h.service.request_otp(phone("+200")).await,
      Err(AuthError::RateLimited)
    ));

    assert!(h.service.verify_otp(phone("+200"), otp.code).await.is_ok());
  }

  #[tokio::test]
  async fn test_verify_without_issuance_is_unauthorized() {
    let h = harness(5);

    let result = h
      .service
      .verify_otp(phone("+300"), OtpCode::new("000000").unwrap())
      .await;

    assert!(matches!(result, Err(AuthError::Unauthorized)));
    assert_eq!(h.user_repo.len(), 0);
  }

  #[tokio::test]
  async fn test_code_is_single_use() {
    let h = harness(5);

    let otp = h.service.request_otp(phone("+100")).await.unwrap();
    h.service
      .verify_otp(phone("+100"), otp.code.clone())
      .await
      .unwrap();

    let result = h.service.verify_otp(phone("+100"), otp.code).await;
    assert!(matches!(result, Err(AuthError::Unauthorized)));
  }

  #[tokio::test]
  async fn test_wrong_code_leaves_pending_code_consumable() {
    let h = harness(5);

    let otp = h.service.request_otp(phone("+100")).await.unwrap();
    let wrong = if otp.code.as_str() == "999999" {
      "100000"
    } else {
      "999999"
    };

    let result = h
      .service
      .verify_otp(phone("+100"), OtpCode::new(wrong).unwrap())
      .await;
    assert!(matches!(result, Err(AuthError::Unauthorized)));

    assert!(h.service.verify_otp(phone("+100"), otp.code).await.is_ok());
  }

  #[tokio::test]
  async fn test_new_code_replaces_previous_one() {
    let h = harness(100);

    let first = h.service.request_otp(phone("+100")).await.unwrap();
    let mut second = h.service.request_otp(phone("+100")).await.unwrap();
    // Redraw until the codes differ so the assertion is meaningful
    while second.code == first.code {
      second = h.service.request_otp(phone("+100")).await.unwrap();
    }

    let result = h.service.verify_otp(phone("+100"), first.code).await;
    assert!(matches!(result, Err(AuthError::Unauthorized)));
    assert!(h.service.verify_otp(phone("+100"), second.code).await.is_ok());
  }

  #[tokio::test]
  async fn test_user_created_once_across_logins() {
    let h = harness(5);

    for _ in 0..2 {
      let otp = h.service.request_otp(phone("+100")).await.unwrap();
      h.service.verify_otp(phone("+100"), otp.code).await.unwrap();
    }

    assert_eq!(h.user_repo.len(), 1);
    assert!(h.user_repo.exists(&phone("+100")).await.unwrap());
  }

  #[tokio::test]
  async fn test_verification_is_not_rate_limited() {
    let h = harness(1);

    let otp = h.service.request_otp(phone("+100")).await.unwrap();
    for _ in 0..10 {
      let _ = h
        .service
        .verify_otp(phone("+100"), OtpCode::new("000000").unwrap())
        .await;
    }

    assert!(h.service.verify_otp(phone("+100"), otp.code).await.is_ok());
  }

  #[tokio::test]
  async fn test_generator_failure_is_temporary_and_stores_nothing() {
    let h = harness_with(5, Arc::new(BrokenGenerator));

    let result = h.service.request_otp(phone("+100")).await;
    assert!(matches!(result, Err(AuthError::TemporaryFailure(_))));
    assert!(h.otp_store.is_empty());
  }

  #[tokio::test]
  async fn test_store_outage_is_temporary_failure() {
    let service = service_with_store(
      Arc::new(UnavailableStore),
      Arc::new(MemoryRateLimiter::new(5, Duration::from_secs(60))),
    );

    let request = service.request_otp(phone("+100")).await;
    assert!(matches!(request, Err(AuthError::TemporaryFailure(_))));

    let verify = service
      .verify_otp(phone("+100"), OtpCode::new("123456").unwrap())
      .await;
    assert!(matches!(verify, Err(AuthError::TemporaryFailure(_))));
  }

  #[tokio::test(start_paused = true)]
  async fn test_hanging_rate_limiter_times_out() {
    let service = service_with_store(Arc::new(MemoryOtpStore::new()), Arc::new(HangingRateLimiter));

    let result = service.request_otp(phone("+100")).await;
    assert!(matches!(result, Err(AuthError::TemporaryFailure(_))));
  }

  #[tokio::test]
  async fn test_authenticate_rejects_garbage_and_foreign_tokens() {
    let h = harness(5);
    assert!(matches!(
      h.service.authenticate("not-a-token"),
      Err(AuthError::Unauthorized)
    ));

    let foreign = JwtTokenService::new(
      "another_secret",
      "otp-auth-service",
      Duration::from_secs(3600),
    )
    .issue(&phone("+100"))
    .unwrap();
    assert!(matches!(
      h.service.authenticate(&foreign.token),
      Err(AuthError::Unauthorized)
    ));
  }
}
