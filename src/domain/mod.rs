pub mod auth;
pub mod timeout;
pub mod user;
