use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use otp_auth::{
  adapters::http::{ApiDependencies, RequestIdMiddleware, configure_api_routes},
  application::auth::{AuthenticateRequestUseCase, RequestOtpUseCase, VerifyOtpUseCase},
  application::health::CheckHealthUseCase,
  application::user::{GetUserUseCase, ListUsersUseCase},
  domain::auth::services::{AuthService, AuthServiceConfig},
  domain::user::UserService,
  infrastructure::{
    config::Config,
    persistence::postgres::PostgresUserRepository,
    persistence::redis::{self as redis_store, RedisOtpStore, RedisRateLimiter},
    security::{JwtTokenService, SecureCodeGenerator},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "otp_auth=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting OTP auth service");

  // Load configuration; any error here is fatal
  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::InvalidInput,
      format!("Invalid configuration: {}", e),
    )
  })?;
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database");

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "Could not connect to database. Is PostgreSQL running?",
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to run database migrations: {}", e);
      std::io::Error::other(format!("Migration error: {}", e))
    })?;
  tracing::info!("Database migrations completed");

  // Set up Redis connection with timeout, checked with PING
  tracing::info!("Connecting to Redis: {}", config.redis.url);

  let redis_conn = redis_store::connect(
    &config.redis.url,
    Duration::from_secs(config.redis.connect_timeout_seconds),
  )
  .await
  .map_err(|e| {
    tracing::error!("Failed to connect to Redis: {}", e);
    std::io::Error::new(
      std::io::ErrorKind::ConnectionRefused,
      format!(
        "Could not connect to Redis. Is Redis running at {}?",
        config.redis.url
      ),
    )
  })?;

  tracing::info!("Redis connection established");

  // Initialize adapters
  let user_repo = Arc::new(PostgresUserRepository::new(db_pool.clone()));
  let otp_store = Arc::new(RedisOtpStore::new(redis_conn.clone()));
  let rate_limiter = Arc::new(RedisRateLimiter::new(
    redis_conn.clone(),
    config.rate_limit.max_requests,
    config.rate_limit.window(),
  ));
  let code_generator = Arc::new(SecureCodeGenerator::new());
  let token_service = Arc::new(JwtTokenService::new(
    &config.security.jwt_secret,
    config.security.issuer.clone(),
    config.security.token_ttl(),
  ));

  // Initialize domain services
  let auth_config = AuthServiceConfig {
    otp_ttl: config.otp.ttl(),
    call_timeout: config.otp.call_timeout(),
  };

  tracing::info!(
    otp_ttl_seconds = config.otp.ttl_seconds,
    rate_limit = config.rate_limit.max_requests,
    rate_limit_window_seconds = config.rate_limit.window_seconds,
    call_timeout_ms = config.otp.call_timeout_ms,
    "OTP configuration"
  );

  let auth_service = Arc::new(AuthService::new(
    otp_store.clone(),
    rate_limiter,
    code_generator,
    token_service,
    user_repo.clone(),
    auth_config,
  ));
  let user_service = Arc::new(UserService::new(
    user_repo.clone(),
    config.otp.call_timeout(),
  ));

  // Initialize use cases
  let deps = ApiDependencies {
    request_otp_use_case: Arc::new(RequestOtpUseCase::new(auth_service.clone())),
    verify_otp_use_case: Arc::new(VerifyOtpUseCase::new(auth_service.clone())),
    authenticate_use_case: Arc::new(AuthenticateRequestUseCase::new(auth_service.clone())),
    list_users_use_case: Arc::new(ListUsersUseCase::new(user_service.clone())),
    get_user_use_case: Arc::new(GetUserUseCase::new(user_service.clone())),
    check_health_use_case: Arc::new(CheckHealthUseCase::new(
      otp_store,
      user_repo,
      config.otp.call_timeout(),
    )),
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .service(web::scope("/v1").configure(|cfg| configure_api_routes(cfg, deps.clone())))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}
