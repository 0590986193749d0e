pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ErrorResponse, MessageResponse, RequestOtpRequest, VerifyOtpRequest};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{AuthenticatedPhone, RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{ApiDependencies, configure_api_routes};
