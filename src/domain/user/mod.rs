pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use entities::{User, UserPage, UserQuery};
pub use errors::{RepositoryError, UserError};
pub use ports::UserRepository;
pub use services::UserService;
