use thiserror::Error;

/// Outcome taxonomy exposed by the authentication service
///
/// Dependency errors never cross this boundary as-is: they are logged and
/// folded into `TemporaryFailure`.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("Rate limit exceeded, please try again later")]
  RateLimited,

  #[error("Invalid or expired credentials")]
  Unauthorized,

  #[error("Temporary failure: {0}")]
  TemporaryFailure(String),
}

/// Errors raised by the keyed ephemeral store (OTP store and rate limiter)
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Store unavailable: {0}")]
  Unavailable(String),

  #[error("Store call timed out")]
  Timeout,

  #[error("Unexpected store reply: {0}")]
  UnexpectedReply(String),
}

/// Errors raised by the one-time code generator
#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error("Secure random source unavailable: {0}")]
  RandomnessUnavailable(String),
}

/// Bearer token signing and validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  #[error("Malformed token")]
  Malformed,

  #[error("Token signature mismatch")]
  SignatureMismatch,

  #[error("Token has expired")]
  Expired,

  #[error("Token is not valid yet")]
  NotYetValid,

  #[error("Failed to sign token: {0}")]
  Signing(String),
}

/// Input validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Invalid field: {field}")]
  InvalidField { field: String },

  #[error("Missing required field: {field}")]
  MissingField { field: String },
}

// Automatic conversions from external error types

impl From<redis::RedisError> for StoreError {
  fn from(error: redis::RedisError) -> Self {
    if error.is_timeout() {
      StoreError::Timeout
    } else {
      StoreError::Unavailable(error.to_string())
    }
  }
}

impl From<tokio::time::error::Elapsed> for StoreError {
  fn from(_: tokio::time::error::Elapsed) -> Self {
    StoreError::Timeout
  }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
  fn from(error: jsonwebtoken::errors::Error) -> Self {
    use jsonwebtoken::errors::ErrorKind;
    match error.kind() {
      ErrorKind::ExpiredSignature => TokenError::Expired,
      ErrorKind::ImmatureSignature => TokenError::NotYetValid,
      // A token declaring another algorithm cannot carry a valid HS256 signature
      ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureMismatch,
      _ => TokenError::Malformed,
    }
  }
}
