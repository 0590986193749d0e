use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::ports::OtpStore;
use crate::domain::timeout::bounded;
use crate::domain::user::UserRepository;

/// State of a single dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
  Up,
  Down(String),
}

impl DependencyStatus {
  pub fn is_up(&self) -> bool {
    matches!(self, DependencyStatus::Up)
  }
}

/// Health of the service's backing stores
#[derive(Debug, Clone)]
pub struct HealthReport {
  pub postgres: DependencyStatus,
  pub redis: DependencyStatus,
}

impl HealthReport {
  pub fn is_healthy(&self) -> bool {
    self.postgres.is_up() && self.redis.is_up()
  }
}

/// Use case for probing PostgreSQL and Redis
pub struct CheckHealthUseCase {
  otp_store: Arc<dyn OtpStore>,
  user_repo: Arc<dyn UserRepository>,
  timeout: Duration,
}

impl CheckHealthUseCase {
  /// Creates a new instance of CheckHealthUseCase
  pub fn new(
    otp_store: Arc<dyn OtpStore>,
    user_repo: Arc<dyn UserRepository>,
    timeout: Duration,
  ) -> Self {
    Self {
      otp_store,
      user_repo,
      timeout,
    }
  }

  /// Pings both stores concurrently, each under the call timeout
  pub async fn execute(&self) -> HealthReport {
    let (postgres, redis) = tokio::join!(
      bounded(self.timeout, self.user_repo.ping()),
      bounded(self.timeout, self.otp_store.ping()),
    );

    let postgres = match postgres {
      Ok(()) => DependencyStatus::Up,
      Err(e) => {
        tracing::error!(error = %e, "PostgreSQL health check failed");
        DependencyStatus::Down(e.to_string())
      }
    };
    let redis = match redis {
      Ok(()) => DependencyStatus::Up,
      Err(e) => {
        tracing::error!(error = %e, "Redis health check failed");
        DependencyStatus::Down(e.to_string())
      }
    };

    HealthReport { postgres, redis }
  }
}
