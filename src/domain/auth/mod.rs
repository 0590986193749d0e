pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{IssuedToken, OneTimePasscode};
pub use errors::{AuthError, GeneratorError, StoreError, TokenError, ValidationError};
pub use ports::{CodeGenerator, ConsumeOutcome, OtpStore, RateLimiter, TokenService};
pub use services::{AuthService, AuthServiceConfig};
pub use value_objects::{OtpCode, PhoneNumber};
