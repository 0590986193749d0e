use std::sync::Arc;
use std::time::Duration;

use super::entities::{User, UserPage, UserQuery};
use super::errors::UserError;
use super::ports::UserRepository;
use crate::domain::timeout::bounded;

/// Read-side service over registered users
pub struct UserService {
  user_repo: Arc<dyn UserRepository>,
  call_timeout: Duration,
}

impl UserService {
  /// Creates a new instance of UserService
  pub fn new(user_repo: Arc<dyn UserRepository>, call_timeout: Duration) -> Self {
    Self {
      user_repo,
      call_timeout,
    }
  }

  /// Fetches a single user by id
  ///
  /// # Errors
  /// Returns `UserError::NotFound` for unknown ids.
  pub async fn get(&self, id: i64) -> Result<User, UserError> {
    bounded(self.call_timeout, self.user_repo.find_by_id(id))
      .await
      .map_err(|e| {
        tracing::error!(user_id = id, error = %e, "User lookup failed");
        UserError::TemporaryFailure("user lookup failed".to_string())
      })?
      .ok_or(UserError::NotFound)
  }

  /// Lists one page of users, newest first, with the total match count
  pub async fn list(&self, query: UserQuery) -> Result<UserPage, UserError> {
    let users = bounded(self.call_timeout, self.user_repo.list(&query))
      .await
      .map_err(|e| {
        tracing::error!(error = %e, "User listing failed");
        UserError::TemporaryFailure("user listing failed".to_string())
      })?;

    let total = bounded(
      self.call_timeout,
      self.user_repo.count(query.search.as_deref()),
    )
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "User count failed");
      UserError::TemporaryFailure("user count failed".to_string())
    })?;

    Ok(UserPage {
      users,
      total,
      offset: query.offset,
      limit: query.limit,
    })
  }
}
