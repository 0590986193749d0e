use async_trait::async_trait;

use super::entities::{User, UserQuery};
use super::errors::RepositoryError;
use crate::domain::auth::value_objects::PhoneNumber;

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Checks whether a user with the given phone number exists
  async fn exists(&self, phone: &PhoneNumber) -> Result<bool, RepositoryError>;

  /// Creates a new user for the phone number
  ///
  /// Fails with `RepositoryError::DuplicateKey` if the phone is taken.
  async fn create(&self, phone: &PhoneNumber) -> Result<User, RepositoryError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

  /// Lists users, newest first
  async fn list(&self, query: &UserQuery) -> Result<Vec<User>, RepositoryError>;

  /// Counts users matching the optional phone search
  async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError>;

  /// Checks connectivity to the underlying database
  async fn ping(&self) -> Result<(), RepositoryError>;
}
