use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::health::{DependencyStatus, HealthReport};
use crate::domain::user::{User, UserPage};

/// Request for issuing a one-time passcode
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestOtpRequest {
  /// User's phone number
  #[validate(length(min = 1, message = "Phone number is required"))]
  pub phone: String,
}

/// Request for verifying a one-time passcode
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyOtpRequest {
  #[validate(length(min = 1, message = "Phone number is required"))]
  pub phone: String,

  /// Six digit code received out of band
  #[validate(length(min = 1, message = "Code is required"))]
  pub code: String,
}

/// Query string for the user listing
///
/// Values are kept raw: unparsable numbers fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
  pub offset: Option<String>,
  pub limit: Option<String>,
  pub search: Option<String>,
}

/// Standard success response for operations without data
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
  pub message: String,
}

/// Response after successful verification
#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpResponse {
  pub message: String,

  /// Bearer token for the Authorization header
  pub token: String,

  /// Token expiration timestamp
  pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
  pub id: i64,
  pub phone: String,
  pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      phone: user.phone,
      created_at: user.created_at,
    }
  }
}

/// One page of users
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
  pub users: Vec<UserResponse>,
  /// Number of users matching the search, across all pages
  pub total: i64,
  pub offset: i64,
  pub limit: i64,
}

impl From<UserPage> for UserListResponse {
  fn from(page: UserPage) -> Self {
    Self {
      users: page.users.into_iter().map(Into::into).collect(),
      total: page.total,
      offset: page.offset,
      limit: page.limit,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
  /// "up" or "down"
  pub status: String,
}

impl From<&DependencyStatus> for ComponentHealth {
  fn from(status: &DependencyStatus) -> Self {
    let status = if status.is_up() { "up" } else { "down" };
    Self {
      status: status.to_string(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
  /// "healthy" or "unhealthy"
  pub status: String,
  pub postgres: ComponentHealth,
  pub redis: ComponentHealth,
}

impl From<&HealthReport> for HealthResponse {
  fn from(report: &HealthReport) -> Self {
    let status = if report.is_healthy() {
      "healthy"
    } else {
      "unhealthy"
    };
    Self {
      status: status.to_string(),
      postgres: (&report.postgres).into(),
      redis: (&report.redis).into(),
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,
}
