pub mod dtos;
pub mod models;
pub mod services;

pub use models::{Role, User};
pub use services::UserService;
