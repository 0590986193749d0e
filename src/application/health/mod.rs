//! Health check use case

mod check_health;

pub use check_health::{CheckHealthUseCase, DependencyStatus, HealthReport};
