use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::auth::value_objects::PhoneNumber;
use crate::domain::user::{RepositoryError, User, UserQuery, UserRepository};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: i64,
  phone: String,
  created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(row.id, row.phone, row.created_at)
  }
}

/// Builds an ILIKE pattern matching `search` anywhere, with wildcards escaped
fn search_pattern(search: Option<&str>) -> Option<String> {
  search.map(|s| {
    let escaped = s
      .replace('\\', "\\\\")
      .replace('%', "\\%")
      .replace('_', "\\_");
    format!("%{}%", escaped)
  })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn exists(&self, phone: &PhoneNumber) -> Result<bool, RepositoryError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE phone = $1)")
      .bind(phone.as_str())
      .fetch_one(&self.pool)
      .await?;

    Ok(exists)
  }

  async fn create(&self, phone: &PhoneNumber) -> Result<User, RepositoryError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (phone)
            VALUES ($1)
            RETURNING id, phone, created_at
            "#,
    )
    .bind(phone.as_str())
    .fetch_one(&self.pool)
    .await?;

    Ok(row.into())
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, phone, created_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await;

    match result {
      Ok(Some(row)) => Ok(Some(row.into())),
      Ok(None) => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn list(&self, query: &UserQuery) -> Result<Vec<User>, RepositoryError> {
    let rows = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, phone, created_at
            FROM users
            WHERE ($1::TEXT IS NULL OR phone ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
    )
    .bind(search_pattern(query.search.as_deref()))
    .bind(query.limit)
    .bind(query.offset)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError> {
    let total: i64 =
      sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR phone ILIKE $1)")
        .bind(search_pattern(search))
        .fetch_one(&self.pool)
        .await?;

    Ok(total)
  }

  async fn ping(&self) -> Result<(), RepositoryError> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  fn phone(value: &str) -> PhoneNumber {
    PhoneNumber::new(value).unwrap()
  }

  #[test]
  fn test_search_pattern_escapes_wildcards() {
    assert_eq!(search_pattern(None), None);
    assert_eq!(search_pattern(Some("98")).as_deref(), Some("%98%"));
    assert_eq!(search_pattern(Some("1_%")).as_deref(), Some("%1\\_\\%%"));
  }

  #[tokio::test]
  async fn test_create_and_find_user() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let created = repo.create(&phone("+989121234567")).await.unwrap();
    assert_eq!(created.phone, "+989121234567");
    assert!(repo.exists(&phone("+989121234567")).await.unwrap());

    let found = repo.find_by_id(created.id).await.unwrap();
    assert_eq!(found, Some(created));
    assert_eq!(repo.find_by_id(i64::MAX).await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_duplicate_phone() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.create(&phone("+15550001")).await.unwrap();
    let result = repo.create(&phone("+15550001")).await;

    match result {
      Err(RepositoryError::DuplicateKey(_)) => {}
      other => panic!("Expected DuplicateKey error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_list_search_and_count() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    for p in ["+98912000", "+98935000", "+4420000"] {
      repo.create(&phone(p)).await.unwrap();
    }

    assert_eq!(repo.count(None).await.unwrap(), 3);
    assert_eq!(repo.count(Some("989")).await.unwrap(), 2);

    let page = repo
      .list(&UserQuery::from_params(None, Some(2), None))
      .await
      .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].phone, "+4420000");

    let rest = repo
      .list(&UserQuery::from_params(Some(2), Some(2), None))
      .await
      .unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].phone, "+98912000");

    repo.ping().await.unwrap();
  }
}
