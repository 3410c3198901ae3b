//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only reach infrastructure
//! through the domain services it holds.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ContactMessageRepository, PasswordHasher, ProjectRepository, UserRepository,
};
use crate::domain::{AuthService, ContactService, ProjectService};

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub contact_messages: Arc<dyn ContactMessageRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

/// Résumé document served by `/download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    path: PathBuf,
    download_name: String,
}

impl ResumeFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, download_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            download_name: download_name.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name offered to the browser.
    #[must_use]
    pub fn download_name(&self) -> &str {
        &self.download_name
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: AuthService,
    pub projects: ProjectService,
    pub contact: ContactService,
    pub resume: ResumeFile,
}

impl HttpState {
    /// Assemble the domain services from their ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use portfolio::inbound::http::state::{HttpState, HttpStatePorts, ResumeFile};
    /// use portfolio::outbound::memory::InMemoryStore;
    /// use portfolio::outbound::password::Argon2PasswordHasher;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         users: store.clone(),
    ///         projects: store.clone(),
    ///         contact_messages: store,
    ///         hasher: Arc::new(Argon2PasswordHasher::default()),
    ///         clock: Arc::new(DefaultClock),
    ///     },
    ///     ResumeFile::new("CV-2024.pdf", "CV-2024.pdf"),
    /// );
    /// assert_eq!(state.resume.download_name(), "CV-2024.pdf");
    /// ```
    #[must_use]
    pub fn new(ports: HttpStatePorts, resume: ResumeFile) -> Self {
        let HttpStatePorts {
            users,
            projects,
            contact_messages,
            hasher,
            clock,
        } = ports;
        Self {
            auth: AuthService::new(users, hasher),
            projects: ProjectService::new(projects, clock),
            contact: ContactService::new(contact_messages),
            resume,
        }
    }
}
