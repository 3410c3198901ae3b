//! Port abstraction for user account persistence and its errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already holds the email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// Storage for user accounts.
///
/// Identities are assigned by the store, start at 1 and are never reused.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, returning it with its assigned identity.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch an account by identity.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account by exact email match.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;
}
