use std::sync::Arc;

use crate::domain::user::{User, UserError, UserService};

/// Use case for fetching a single user by id
pub struct GetUserUseCase {
  user_service: Arc<UserService>,
}

impl GetUserUseCase {
  /// Creates a new instance of GetUserUseCase
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  /// # Errors
  /// Returns `UserError::NotFound` if no user has this id.
  pub async fn execute(&self, id: i64) -> Result<User, UserError> {
    self.user_service.get(id).await
  }
}
