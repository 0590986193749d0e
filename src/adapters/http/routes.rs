use actix_web::{error, web};
use std::sync::Arc;

use crate::application::auth::{AuthenticateRequestUseCase, RequestOtpUseCase, VerifyOtpUseCase};
use crate::application::health::CheckHealthUseCase;
use crate::application::user::{GetUserUseCase, ListUsersUseCase};

use super::errors::ApiError;
use super::handlers::auth::{request_otp_handler, verify_otp_handler};
use super::handlers::health::health_handler;
use super::handlers::users::{get_user_handler, list_users_handler};

/// Use cases the API routes are served by
#[derive(Clone)]
pub struct ApiDependencies {
  pub request_otp_use_case: Arc<RequestOtpUseCase>,
  pub verify_otp_use_case: Arc<VerifyOtpUseCase>,
  pub authenticate_use_case: Arc<AuthenticateRequestUseCase>,
  pub list_users_use_case: Arc<ListUsersUseCase>,
  pub get_user_use_case: Arc<GetUserUseCase>,
  pub check_health_use_case: Arc<CheckHealthUseCase>,
}

/// Configure API routes
///
/// Mounts every endpoint under the provided scope (e.g., /v1).
///
/// # Routes
///
/// - POST /request-otp - Issue a one-time passcode for a phone number
/// - POST /verify-otp - Exchange a passcode for a bearer token
/// - GET /users - List users (bearer token required)
/// - GET /users/{id} - Fetch one user (bearer token required)
/// - GET /health - Probe PostgreSQL and Redis
///
/// # Example
///
/// ```ignore
/// let app = App::new().service(
///   web::scope("/v1").configure(|cfg| configure_api_routes(cfg, deps.clone())),
/// );
/// ```
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, deps: ApiDependencies) {
  // Malformed bodies get the same JSON error shape as domain errors
  let json_config = web::JsonConfig::default().error_handler(|err, _req| {
    let message = match &err {
      error::JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
      _ => "Invalid request body".to_string(),
    };
    tracing::debug!(error = %err, "Rejected request body");
    error::InternalError::from_response(
      err,
      actix_web::ResponseError::error_response(&ApiError::Validation(message)),
    )
    .into()
  });

  // Store use cases in app data so handlers and extractors can access them
  cfg
    .app_data(json_config)
    .app_data(web::Data::new(deps.request_otp_use_case))
    .app_data(web::Data::new(deps.verify_otp_use_case))
    .app_data(web::Data::new(deps.authenticate_use_case))
    .app_data(web::Data::new(deps.list_users_use_case))
    .app_data(web::Data::new(deps.get_user_use_case))
    .app_data(web::Data::new(deps.check_health_use_case))
    // Configure routes
    .route("/request-otp", web::post().to(request_otp_handler))
    .route("/verify-otp", web::post().to(verify_otp_handler))
    .route("/users", web::get().to(list_users_handler))
    .route("/users/{id}", web::get().to(get_user_handler))
    .route("/health", web::get().to(health_handler));
}
