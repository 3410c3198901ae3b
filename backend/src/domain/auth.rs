//! Authentication: registration, login and actor resolution.
//!
//! The session itself lives in the inbound adapter; this module only decides
//! who a request is acting as and whether that actor may administer the site.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};
use zeroize::Zeroizing;

use super::ports::{PasswordHasher, PasswordHasherError, UserPersistenceError, UserRepository};
use super::{Actor, DisplayName, EmailAddress, Error, NewUser, User, UserId};

/// Credentials submitted through the login form.
///
/// ## Invariants
/// - `password` retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use portfolio::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new("ada@example.com", "secret");
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validated registration request.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: EmailAddress,
    pub password: Zeroizing<String>,
    pub name: DisplayName,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    UnknownEmail,
    WrongPassword,
}

impl fmt::Display for CredentialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEmail => f.write_str("unknown email"),
            Self::WrongPassword => f.write_str("wrong password"),
        }
    }
}

/// Recoverable authentication failures plus store errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("an account with this email already exists")]
    DuplicateEmail,
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: CredentialFailure },
    #[error(transparent)]
    Store(#[from] Error),
}

impl AuthError {
    fn invalid(reason: CredentialFailure) -> Self {
        Self::InvalidCredentials { reason }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email already registered: {email}"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

/// Account registration, login and actor resolution.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Create an account for a fresh email.
    ///
    /// The password is hashed off the async executor; the plaintext never
    /// reaches the store.
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let existing = self
            .users
            .find_by_email(&registration.email)
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            warn!("registration refused for an email already in use");
            return Err(AuthError::DuplicateEmail);
        }

        let hasher = Arc::clone(&self.hasher);
        let password = registration.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hasher_error)?;

        let new_user = NewUser {
            email: registration.email.clone(),
            name: registration.name.clone(),
            password_hash,
        };
        let user = match self.users.create(&new_user).await {
            Ok(user) => user,
            // Lost a race with a concurrent registration.
            Err(UserPersistenceError::DuplicateEmail { .. }) => {
                return Err(AuthError::DuplicateEmail);
            }
            Err(other) => return Err(map_user_persistence_error(other).into()),
        };
        info!(user_id = %user.id(), "registered account");
        Ok(user)
    }

    /// Check credentials and return the matching account.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(AuthError::invalid(CredentialFailure::UnknownEmail));
        };
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
        else {
            warn!("login refused for unknown email");
            return Err(AuthError::invalid(CredentialFailure::UnknownEmail));
        };

        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = user.password_hash().clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(map_hasher_error)?;
        if !matches {
            warn!(user_id = %user.id(), "login refused: wrong password");
            return Err(AuthError::invalid(CredentialFailure::WrongPassword));
        }
        info!(user_id = %user.id(), "logged in");
        Ok(user)
    }

    /// Resolve the session identity into an actor.
    ///
    /// An identity that no longer resolves to an account is anonymous.
    pub async fn current_actor(&self, session_user: Option<UserId>) -> Result<Actor, Error> {
        let Some(id) = session_user else {
            return Ok(Actor::Anonymous);
        };
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(user.map_or(Actor::Anonymous, Actor::User))
    }

    /// Admit only the administrator.
    ///
    /// # Examples
    /// ```
    /// use portfolio::domain::{Actor, AuthService, ErrorCode};
    ///
    /// let err = AuthService::require_admin(&Actor::Anonymous).unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Forbidden);
    /// ```
    pub fn require_admin(actor: &Actor) -> Result<&User, Error> {
        match actor.user() {
            Some(user) if user.is_admin() => Ok(user),
            _ => Err(Error::forbidden("administrator access required")),
        }
    }
}
