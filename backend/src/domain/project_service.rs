//! Project use-cases: browsing for everyone, editing for the administrator.
use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use super::ports::{ProjectPersistenceError, ProjectRepository};
use super::{
    Actor, AuthService, Category, Error, NewProject, Project, ProjectDraft, ProjectId,
    ProjectUpdate,
};

/// Failures of project mutations that a form can recover from.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectCommandError {
    #[error("a project with this title already exists")]
    DuplicateTitle,
    #[error(transparent)]
    Store(#[from] Error),
}

pub(crate) fn map_project_persistence_error(error: ProjectPersistenceError) -> Error {
    match error {
        ProjectPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("project repository unavailable: {message}"))
        }
        ProjectPersistenceError::Query { message } => {
            Error::internal(format!("project repository error: {message}"))
        }
        ProjectPersistenceError::DuplicateTitle { title } => {
            Error::conflict(format!("project title already in use: {title}"))
        }
        ProjectPersistenceError::AuthorMissing { author } => {
            Error::internal(format!("project author {author} does not exist"))
        }
        ProjectPersistenceError::NotFound { id } => {
            Error::not_found(format!("project {id} not found"))
        }
    }
}

fn command_error(error: ProjectPersistenceError) -> ProjectCommandError {
    match error {
        ProjectPersistenceError::DuplicateTitle { .. } => ProjectCommandError::DuplicateTitle,
        other => ProjectCommandError::Store(map_project_persistence_error(other)),
    }
}

/// Reads and writes portfolio projects.
///
/// Mutations re-check the administrator guard so the service stays safe when
/// called from somewhere other than the guarded HTTP handlers.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    clock: Arc<dyn Clock>,
}

impl ProjectService {
    #[must_use]
    pub fn new(projects: Arc<dyn ProjectRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { projects, clock }
    }

    /// All projects, optionally restricted to one category.
    pub async fn list(&self, category: Option<Category>) -> Result<Vec<Project>, Error> {
        self.projects
            .list(category)
            .await
            .map_err(map_project_persistence_error)
    }

    /// One project, or `NotFound`.
    pub async fn get(&self, id: ProjectId) -> Result<Project, Error> {
        self.projects
            .find_by_id(id)
            .await
            .map_err(map_project_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("project {id} not found")))
    }

    /// Publish a new project dated today and authored by the administrator.
    pub async fn create(
        &self,
        actor: &Actor,
        draft: ProjectDraft,
    ) -> Result<Project, ProjectCommandError> {
        let author = AuthService::require_admin(actor)?;
        let new_project = NewProject {
            draft,
            author: author.id(),
            created_on: self.clock.utc().date_naive(),
        };
        let project = self.projects.create(&new_project).await.map_err(command_error)?;
        info!(project_id = %project.id, "created project");
        Ok(project)
    }

    /// Replace a project's content; the editor becomes its author.
    pub async fn update(
        &self,
        actor: &Actor,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, ProjectCommandError> {
        let author = AuthService::require_admin(actor)?;
        let update = ProjectUpdate {
            id,
            draft,
            author: author.id(),
        };
        let project = self.projects.update(&update).await.map_err(command_error)?;
        info!(project_id = %project.id, "updated project");
        Ok(project)
    }

    /// Remove a project, or fail with `NotFound`.
    pub async fn delete(&self, actor: &Actor, id: ProjectId) -> Result<(), Error> {
        AuthService::require_admin(actor)?;
        self.projects
            .delete(id)
            .await
            .map_err(map_project_persistence_error)?;
        info!(project_id = %id, "deleted project");
        Ok(())
    }
}
