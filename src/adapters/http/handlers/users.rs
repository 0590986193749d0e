use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::{
  dtos::{ListUsersParams, UserListResponse, UserResponse},
  errors::ApiError,
  middleware::AuthenticatedPhone,
};
use crate::application::user::{GetUserUseCase, ListUsersQuery, ListUsersUseCase};

/// Handler for listing users
///
/// GET /v1/users?offset=0&limit=10&search=+98
/// Headers: Authorization: Bearer <token>
/// Response: UserListResponse (JSON) with status 200
pub async fn list_users_handler(
  caller: AuthenticatedPhone,
  params: web::Query<ListUsersParams>,
  use_case: web::Data<Arc<ListUsersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let params = params.into_inner();
  tracing::debug!(caller = %caller.phone(), "Listing users");

  let query = ListUsersQuery {
    offset: params.offset.and_then(|o| o.trim().parse().ok()),
    limit: params.limit.and_then(|l| l.trim().parse().ok()),
    search: params.search,
  };

  let page = use_case.execute(query).await?;

  Ok(HttpResponse::Ok().json(UserListResponse::from(page)))
}

/// Handler for fetching one user
///
/// GET /v1/users/{id}
/// Headers: Authorization: Bearer <token>
/// Response: UserResponse (JSON) with status 200
pub async fn get_user_handler(
  caller: AuthenticatedPhone,
  path: web::Path<String>,
  use_case: web::Data<Arc<GetUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let id: i64 = path
    .trim()
    .parse()
    .map_err(|_| ApiError::Validation("Invalid user ID".to_string()))?;
  tracing::debug!(caller = %caller.phone(), user_id = id, "Fetching user");

  let user = use_case.execute(id).await?;

  Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
