mod code_generator;
mod jwt_token_service;

pub use code_generator::SecureCodeGenerator;
pub use jwt_token_service::{JwtTokenService, TokenClaims};
