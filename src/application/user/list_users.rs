use std::sync::Arc;

use crate::domain::user::{UserError, UserPage, UserQuery, UserService};

/// Query for listing users with raw request parameters
#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
  pub offset: Option<i64>,
  pub limit: Option<i64>,
  pub search: Option<String>,
}

/// Use case for listing registered users
pub struct ListUsersUseCase {
  user_service: Arc<UserService>,
}

impl ListUsersUseCase {
  /// Creates a new instance of ListUsersUseCase
  pub fn new(user_service: Arc<UserService>) -> Self {
    Self { user_service }
  }

  /// Executes the list users use case
  ///
  /// Out-of-range paging values fall back to their defaults.
  pub async fn execute(&self, query: ListUsersQuery) -> Result<UserPage, UserError> {
    let query = UserQuery::from_params(query.offset, query.limit, query.search);
    self.user_service.list(query).await
  }
}
