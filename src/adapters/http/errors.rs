use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::auth::errors::AuthError;
use crate::domain::user::UserError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (401 Unauthorized or 429 Too Many Requests)
  Auth(AuthErrorKind),

  /// Resource not found (404 Not Found)
  NotFound(String),

  /// A backing store failed or timed out (503 Service Unavailable)
  Unavailable(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Serialize)]
pub enum AuthErrorKind {
  /// Wrong, used or expired one-time passcode (401)
  InvalidOtp,

  /// No Authorization header (401)
  MissingAuthorization,

  /// Authorization header without the Bearer scheme (401)
  MalformedAuthorization,

  /// Bearer token rejected (401)
  InvalidToken,

  /// Rate limit exceeded (429)
  RateLimitExceeded,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::UNAUTHORIZED,
      },
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::InvalidOtp => ("invalid_otp", "Invalid OTP".to_string()),
        AuthErrorKind::MissingAuthorization => (
          "missing_authorization",
          "Authorization header required".to_string(),
        ),
        AuthErrorKind::MalformedAuthorization => (
          "invalid_authorization_header",
          "Invalid authorization header format".to_string(),
        ),
        AuthErrorKind::InvalidToken => ("invalid_token", "Invalid or expired token".to_string()),
        AuthErrorKind::RateLimitExceeded => {
          ("rate_limit_exceeded", "Rate limit exceeded".to_string())
        }
      },
      ApiError::NotFound(msg) => ("not_found", msg.clone()),
      ApiError::Unavailable(msg) => {
        // The cause was logged where it happened; clients get a retry hint
        tracing::warn!("Service unavailable: {}", msg);
        (
          "service_unavailable",
          "Temporary service issue. Please try again.".to_string(),
        )
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details in production
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert AuthError to ApiError
///
/// `Unauthorized` reaching a handler comes from code verification; the
/// bearer extractor maps token failures itself.
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::Validation(err) => ApiError::Validation(err.to_string()),
      AuthError::RateLimited => ApiError::Auth(AuthErrorKind::RateLimitExceeded),
      AuthError::Unauthorized => ApiError::Auth(AuthErrorKind::InvalidOtp),
      AuthError::TemporaryFailure(msg) => ApiError::Unavailable(msg),
    }
  }
}

/// Convert UserError to ApiError
impl From<UserError> for ApiError {
  fn from(error: UserError) -> Self {
    match error {
      UserError::NotFound => ApiError::NotFound("User not found".to_string()),
      UserError::TemporaryFailure(msg) => ApiError::Unavailable(msg),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidToken).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::RateLimitExceeded).status_code(),
      StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(
      ApiError::NotFound("test".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Unavailable("test".to_string()).status_code(),
      StatusCode::SERVICE_UNAVAILABLE
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let api_error: ApiError = AuthError::Unauthorized.into();
    assert_eq!(api_error.status_code(), StatusCode::UNAUTHORIZED);

    let api_error: ApiError = AuthError::RateLimited.into();
    assert_eq!(api_error.status_code(), StatusCode::TOO_MANY_REQUESTS);

    let api_error: ApiError = AuthError::TemporaryFailure("redis down".to_string()).into();
    assert_eq!(api_error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
  }

  #[actix_web::test]
  async fn test_unavailable_hides_cause() {
    let response = ApiError::Unavailable("otp storage failed".to_string()).error_response();
    let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();

    assert!(!body.contains("otp storage failed"));
    assert!(body.contains("service_unavailable"));
  }
}
