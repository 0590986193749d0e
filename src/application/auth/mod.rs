//! Authentication use cases
//!
//! Thin wrappers that parse raw input into domain values and drive the
//! `AuthService` flows.

mod authenticate_request;
mod request_otp;
mod verify_otp;

pub use authenticate_request::AuthenticateRequestUseCase;
pub use request_otp::{RequestOtpCommand, RequestOtpResponse, RequestOtpUseCase};
pub use verify_otp::{VerifyOtpCommand, VerifyOtpResponse, VerifyOtpUseCase};
