use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::domain::auth::value_objects::PhoneNumber;
use crate::domain::user::{RepositoryError, User, UserQuery, UserRepository};

#[derive(Default)]
struct Users {
  rows: Vec<User>,
  next_id: i64,
}

/// User repository backed by a vector
#[derive(Default)]
pub struct MemoryUserRepository {
  users: Mutex<Users>,
}

impl MemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of stored users
  pub fn len(&self) -> usize {
    self.users.lock().map(|users| users.rows.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Users>, RepositoryError> {
    self
      .users
      .lock()
      .map_err(|_| RepositoryError::ConnectionFailed("in-memory lock poisoned".to_string()))
  }
}

fn phone_matches(user: &User, search: Option<&str>) -> bool {
  search.is_none_or(|needle| {
    user
      .phone
      .to_lowercase()
      .contains(&needle.to_lowercase())
  })
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
  async fn exists(&self, phone: &PhoneNumber) -> Result<bool, RepositoryError> {
    let users = self.lock()?;
    Ok(users.rows.iter().any(|u| u.phone == phone.as_str()))
  }

  async fn create(&self, phone: &PhoneNumber) -> Result<User, RepositoryError> {
    let mut users = self.lock()?;
    if users.rows.iter().any(|u| u.phone == phone.as_str()) {
      return Err(RepositoryError::DuplicateKey(format!(
        "phone {} already registered",
        phone
      )));
    }

    users.next_id += 1;
    let user = User::from_db(users.next_id, phone.as_str().to_string(), Utc::now());
    users.rows.push(user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
    let users = self.lock()?;
    Ok(users.rows.iter().find(|u| u.id == id).cloned())
  }

  async fn list(&self, query: &UserQuery) -> Result<Vec<User>, RepositoryError> {
    let users = self.lock()?;
    let mut selected: Vec<User> = users
      .rows
      .iter()
      .filter(|u| phone_matches(u, query.search.as_deref()))
      .cloned()
      .collect();

    // Newest first; ids break ties between users created in the same instant
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    Ok(
      selected
        .into_iter()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .collect(),
    )
  }

  async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError> {
    let users = self.lock()?;
    Ok(users.rows.iter().filter(|u| phone_matches(u, search)).count() as i64)
  }

  async fn ping(&self) -> Result<(), RepositoryError> {
    self.lock().map(|_| ())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn phone(value: &str) -> PhoneNumber {
    PhoneNumber::new(value).unwrap()
  }

  #[tokio::test]
  async fn test_create_rejects_duplicate_phone() {
    let repo = MemoryUserRepository::new();
    repo.create(&phone("+100")).await.unwrap();

    assert!(matches!(
      repo.create(&phone("+100")).await,
      Err(RepositoryError::DuplicateKey(_))
    ));
    assert_eq!(repo.len(), 1);
  }

  #[tokio::test]
  async fn test_list_orders_newest_first_and_paginates() {
    let repo = MemoryUserRepository::new();
    for p in ["+100", "+200", "+300"] {
      repo.create(&phone(p)).await.unwrap();
    }

    let page = repo
      .list(&UserQuery::from_params(Some(1), Some(1), None))
      .await
      .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].phone, "+200");
  }

  #[tokio::test]
  async fn test_search_filters_list_and_count() {
    let repo = MemoryUserRepository::new();
    for p in ["+98912", "+98935", "+4420"] {
      repo.create(&phone(p)).await.unwrap();
    }

    let query = UserQuery::from_params(None, None, Some("989".to_string()));
    assert_eq!(repo.list(&query).await.unwrap().len(), 2);
    assert_eq!(repo.count(Some("989")).await.unwrap(), 2);
    assert_eq!(repo.count(None).await.unwrap(), 3);
  }
}
