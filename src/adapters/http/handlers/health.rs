use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::dtos::HealthResponse;
use crate::application::health::CheckHealthUseCase;

/// Handler for the dependency health check
///
/// GET /v1/health
/// Response: HealthResponse (JSON) with status 200, or 503 when a store is down
pub async fn health_handler(use_case: web::Data<Arc<CheckHealthUseCase>>) -> HttpResponse {
  let report = use_case.execute().await;
  let body = HealthResponse::from(&report);

  if report.is_healthy() {
    HttpResponse::Ok().json(body)
  } else {
    HttpResponse::ServiceUnavailable().json(body)
  }
}
