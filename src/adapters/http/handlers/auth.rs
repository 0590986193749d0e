use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{MessageResponse, RequestOtpRequest, VerifyOtpRequest, VerifyOtpResponse},
  errors::ApiError,
};
use crate::application::auth::{
  RequestOtpCommand, RequestOtpUseCase, VerifyOtpCommand, VerifyOtpUseCase,
};

/// Handler for issuing a one-time passcode
///
/// POST /v1/request-otp
/// Body: RequestOtpRequest (JSON)
/// Response: MessageResponse (JSON) with status 200
pub async fn request_otp_handler(
  request: web::Json<RequestOtpRequest>,
  use_case: web::Data<Arc<RequestOtpUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = RequestOtpCommand {
    phone: request.into_inner().phone,
  };

  use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(MessageResponse {
    message: "OTP sent".to_string(),
  }))
}

/// Handler for verifying a one-time passcode
///
/// POST /v1/verify-otp
/// Body: VerifyOtpRequest (JSON)
/// Response: VerifyOtpResponse (JSON) with status 200
pub async fn verify_otp_handler(
  request: web::Json<VerifyOtpRequest>,
  use_case: web::Data<Arc<VerifyOtpUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let command = VerifyOtpCommand {
    phone: request.phone,
    code: request.code,
  };

  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(VerifyOtpResponse {
    message: "Login success".to_string(),
    token: response.token,
    expires_at: response.expires_at,
  }))
}
