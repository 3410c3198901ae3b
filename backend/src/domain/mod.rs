//! Domain primitives, services and ports.
//!
//! Purpose: Define strongly typed entities for accounts, projects and contact
//! messages plus the use-cases the HTTP adapter drives. Nothing here knows
//! about actix or Diesel; adapters plug in through [`ports`].
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport agnostic failure payload.
//! - [`AuthService`], [`ProjectService`], [`ContactService`]: use-cases.
//! - [`forms`]: raw form input and its validation.

pub mod auth;
pub mod contact;
pub mod error;
pub mod forms;
pub mod ports;
pub mod project;
pub mod project_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{AuthError, AuthService, CredentialFailure, LoginCredentials, Registration};
pub use self::contact::{
    CONTACT_FIELD_MAX, CONTACT_MESSAGE_MAX, ContactDraft, ContactMessageId, ContactService,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::forms::FormErrors;
pub use self::project::{
    Author, Category, NewProject, PROJECT_DATE_FORMAT, PROJECT_FIELD_MAX, Project, ProjectDraft,
    ProjectId, ProjectUpdate, ProjectValidationError, WebUrl,
};
pub use self::project_service::{ProjectCommandError, ProjectService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Actor, DisplayName, EmailAddress, NewUser, PasswordHash, USER_FIELD_MAX, User, UserId,
    UserValidationError,
};

/// Convenient handler result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use portfolio::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
