//! User accounts and the request actor.

use std::fmt;

use zeroize::Zeroizing;

/// Maximum stored length for emails, names and password hashes.
pub const USER_FIELD_MAX: usize = 100;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    NonPositiveId,
    EmptyEmail,
    EmailTooLong { max: usize },
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    EmptyPasswordHash,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be positive"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identity.
///
/// Identities start at 1; the account holding identity 1 is the site
/// administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i32);

impl UserId {
    /// Identity of the sole administrator.
    pub const ADMIN: UserId = UserId(1);

    /// Validate and construct a [`UserId`].
    pub fn new(raw: i32) -> Result<Self, UserValidationError> {
        if raw < 1 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value as stored.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }

    /// Whether this identity is the administrator's.
    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::ADMIN
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account email, trimmed and compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::EmailTooLong {
                max: USER_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human readable name shown in the page header and on projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > USER_FIELD_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: USER_FIELD_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoded salted password hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(Zeroizing<String>);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`PasswordHasher`](crate::domain::ports::PasswordHasher).
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(Zeroizing::new(encoded)))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Account fields supplied when registering; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub name: DisplayName,
    pub password_hash: PasswordHash,
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: DisplayName,
    password_hash: PasswordHash,
}

impl User {
    /// Assemble a user from a stored identity and its account fields.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        let NewUser {
            email,
            name,
            password_hash,
        } = new_user;
        Self {
            id,
            email,
            name,
            password_hash,
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether this account is the site administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.id.is_admin()
    }
}

/// Who is making the current request.
///
/// Resolved once per request from the session and passed explicitly into
/// handlers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    /// No session, or the session refers to an unknown account.
    #[default]
    Anonymous,
    /// A logged-in account.
    User(User),
}

impl Actor {
    /// The logged-in account, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }
}
