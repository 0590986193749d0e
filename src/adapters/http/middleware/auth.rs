use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::{
  future::{Ready, ready},
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  application::auth::AuthenticateRequestUseCase,
  domain::auth::value_objects::PhoneNumber,
};

/// Phone number of the bearer of a valid token
///
/// Taking this extractor as a handler argument protects the route: the
/// handler only runs once the Authorization header carried a token that
/// `AuthenticateRequestUseCase` accepted.
///
/// # Example
///
/// ```ignore
/// async fn handler(caller: AuthenticatedPhone) -> HttpResponse {
///   HttpResponse::Ok().body(caller.phone().to_string())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedPhone(PhoneNumber);

impl AuthenticatedPhone {
  pub fn phone(&self) -> &PhoneNumber {
    &self.0
  }

  pub fn into_inner(self) -> PhoneNumber {
    self.0
  }
}

impl FromRequest for AuthenticatedPhone {
  type Error = ApiError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedPhone, ApiError> {
  let use_case = req
    .app_data::<web::Data<Arc<AuthenticateRequestUseCase>>>()
    .ok_or_else(|| ApiError::Internal("AuthenticateRequestUseCase not configured".to_string()))?;

  let token = extract_bearer_token(req)?;

  let phone = use_case
    .execute(token)
    .map_err(|_| ApiError::Auth(AuthErrorKind::InvalidToken))?;

  tracing::debug!(phone = %phone, "Bearer token accepted");
  Ok(AuthenticatedPhone(phone))
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &HttpRequest) -> Result<&str, ApiError> {
  let value = req
    .headers()
    .get(header::AUTHORIZATION)
    .ok_or(ApiError::Auth(AuthErrorKind::MissingAuthorization))?;

  value
    .to_str()
    .ok()
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|token| !token.is_empty())
    .ok_or(ApiError::Auth(AuthErrorKind::MalformedAuthorization))
}
