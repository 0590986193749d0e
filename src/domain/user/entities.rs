use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity, identified by a unique phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: i64,
  /// Phone number the user authenticated with (unique)
  pub phone: String,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(id: i64, phone: String, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      phone,
      created_at,
    }
  }
}

/// Pagination and search parameters for listing users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
  pub offset: i64,
  pub limit: i64,
  /// Case-insensitive substring matched against the phone number
  pub search: Option<String>,
}

impl UserQuery {
  pub const DEFAULT_LIMIT: i64 = 10;
  pub const MAX_LIMIT: i64 = 100;

  /// Builds a query from raw request parameters
  ///
  /// Out-of-range values fall back to the defaults instead of failing: a
  /// negative offset becomes 0, a limit outside `1..=100` becomes 10, and
  /// a blank search is ignored.
  pub fn from_params(offset: Option<i64>, limit: Option<i64>, search: Option<String>) -> Self {
    let offset = offset.filter(|o| *o >= 0).unwrap_or(0);
    let limit = limit
      .filter(|l| (1..=Self::MAX_LIMIT).contains(l))
      .unwrap_or(Self::DEFAULT_LIMIT);
    let search = search
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty());

    Self {
      offset,
      limit,
      search,
    }
  }
}

impl Default for UserQuery {
  fn default() -> Self {
    Self::from_params(None, None, None)
  }
}

/// One page of users together with the total number of matches
#[derive(Debug, Clone)]
pub struct UserPage {
  pub users: Vec<User>,
  pub total: i64,
  pub offset: i64,
  pub limit: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_query_defaults() {
    let query = UserQuery::default();
    assert_eq!(query.offset, 0);
    assert_eq!(query.limit, 10);
    assert_eq!(query.search, None);
  }

  #[test]
  fn test_query_out_of_range_values_fall_back() {
    let query = UserQuery::from_params(Some(-5), Some(101), Some("   ".to_string()));
    assert_eq!(query.offset, 0);
    assert_eq!(query.limit, 10);
    assert_eq!(query.search, None);

    let query = UserQuery::from_params(Some(20), Some(0), None);
    assert_eq!(query.offset, 20);
    assert_eq!(query.limit, 10);
  }

  #[test]
  fn test_query_keeps_valid_values() {
    let query = UserQuery::from_params(Some(30), Some(100), Some(" +98 ".to_string()));
    assert_eq!(query.offset, 30);
    assert_eq!(query.limit, 100);
    assert_eq!(query.search.as_deref(), Some("+98"));
  }
}
