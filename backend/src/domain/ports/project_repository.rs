//! Port abstraction for project persistence and its errors.
use async_trait::async_trait;

use crate::domain::{Category, NewProject, Project, ProjectId, ProjectUpdate};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by project repository adapters.
    pub enum ProjectPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "project repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "project repository query failed: {message}",
        /// Another project already uses the title.
        DuplicateTitle { title: String } => "project title already in use: {title}",
        /// The referenced author account does not exist.
        AuthorMissing { author: i32 } => "project author {author} does not exist",
        /// No project has the identity.
        NotFound { id: i32 } => "project {id} not found",
    }
}

/// Storage for portfolio projects.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project, returning it with its identity and author.
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectPersistenceError>;

    /// Fetch a project by identity.
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectPersistenceError>;

    /// List projects in ascending id order, optionally restricted to one category.
    async fn list(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Project>, ProjectPersistenceError>;

    /// Replace the content of an existing project, keeping its creation date.
    async fn update(&self, update: &ProjectUpdate) -> Result<Project, ProjectPersistenceError>;

    /// Remove a project.
    async fn delete(&self, id: ProjectId) -> Result<(), ProjectPersistenceError>;
}
