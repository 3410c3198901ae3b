//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod contact_repository;
mod password_hasher;
mod project_repository;
mod user_repository;

pub use contact_repository::{ContactMessageRepository, ContactPersistenceError};
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use project_repository::{ProjectPersistenceError, ProjectRepository};
pub use user_repository::{UserPersistenceError, UserRepository};
