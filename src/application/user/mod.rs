//! User read-side use cases

mod get_user;
mod list_users;

pub use get_user::GetUserUseCase;
pub use list_users::{ListUsersQuery, ListUsersUseCase};
