//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by the test suites. It keeps
//! the same uniqueness and foreign key rules as the PostgreSQL schema so
//! behaviour does not change with the backend.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    ContactMessageRepository, ContactPersistenceError, ProjectPersistenceError, ProjectRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Author, Category, ContactDraft, ContactMessageId, EmailAddress, NewProject, NewUser, Project,
    ProjectDraft, ProjectId, ProjectUpdate, User, UserId,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct StoredProject {
    id: ProjectId,
    draft: ProjectDraft,
    created_on: NaiveDate,
    author: UserId,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    projects: Vec<StoredProject>,
    messages: Vec<(ContactMessageId, ContactDraft)>,
    last_user_id: i32,
    last_project_id: i32,
    last_message_id: i32,
}

impl State {
    fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id() == id)
    }

    fn title_taken(&self, title: &str, except: Option<ProjectId>) -> bool {
        self.projects
            .iter()
            .any(|project| project.draft.title == title && Some(project.id) != except)
    }

    fn resolve(&self, project: &StoredProject) -> Result<Project, ProjectPersistenceError> {
        let author = self
            .user(project.author)
            .ok_or_else(|| ProjectPersistenceError::author_missing(project.author.get()))?;
        Ok(Project {
            id: project.id,
            draft: project.draft.clone(),
            created_on: project.created_on,
            author: Author {
                id: author.id(),
                name: author.name().clone(),
            },
        })
    }
}

/// Mutex-guarded store; identities start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }

    /// Every stored contact message in submission order.
    #[must_use]
    pub fn contact_messages(&self) -> Vec<ContactDraft> {
        self.lock()
            .map(|state| {
                state
                    .messages
                    .iter()
                    .map(|(_, draft)| draft.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.users.iter().any(|existing| existing.email() == &user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let id = UserId::new(state.last_user_id + 1)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        state.last_user_id = id.get();
        let created = User::from_new(id, user.clone());
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.user(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.iter().find(|user| user.email() == email).cloned())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectPersistenceError> {
        let mut state = self.lock().map_err(ProjectPersistenceError::query)?;
        if state.user(project.author).is_none() {
            return Err(ProjectPersistenceError::author_missing(project.author.get()));
        }
        if state.title_taken(&project.draft.title, None) {
            return Err(ProjectPersistenceError::duplicate_title(
                project.draft.title.as_str(),
            ));
        }
        let id = ProjectId::new(state.last_project_id + 1)
            .map_err(|err| ProjectPersistenceError::query(err.to_string()))?;
        state.last_project_id = id.get();
        let stored = StoredProject {
            id,
            draft: project.draft.clone(),
            created_on: project.created_on,
            author: project.author,
        };
        let resolved = state.resolve(&stored)?;
        state.projects.push(stored);
        Ok(resolved)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        let state = self.lock().map_err(ProjectPersistenceError::query)?;
        state
            .projects
            .iter()
            .find(|project| project.id == id)
            .map(|project| state.resolve(project))
            .transpose()
    }

    async fn list(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Project>, ProjectPersistenceError> {
        let state = self.lock().map_err(ProjectPersistenceError::query)?;
        state
            .projects
            .iter()
            .filter(|project| category.is_none_or(|wanted| project.draft.category == wanted))
            .map(|project| state.resolve(project))
            .collect()
    }

    async fn update(&self, update: &ProjectUpdate) -> Result<Project, ProjectPersistenceError> {
        let mut state = self.lock().map_err(ProjectPersistenceError::query)?;
        if state.user(update.author).is_none() {
            return Err(ProjectPersistenceError::author_missing(update.author.get()));
        }
        if state.title_taken(&update.draft.title, Some(update.id)) {
            return Err(ProjectPersistenceError::duplicate_title(
                update.draft.title.as_str(),
            ));
        }
        let stored = state
            .projects
            .iter_mut()
            .find(|project| project.id == update.id)
            .ok_or_else(|| ProjectPersistenceError::not_found(update.id.get()))?;
        stored.draft = update.draft.clone();
        stored.author = update.author;
        let snapshot = stored.clone();
        state.resolve(&snapshot)
    }

    async fn delete(&self, id: ProjectId) -> Result<(), ProjectPersistenceError> {
        let mut state = self.lock().map_err(ProjectPersistenceError::query)?;
        let before = state.projects.len();
        state.projects.retain(|project| project.id != id);
        if state.projects.len() == before {
            return Err(ProjectPersistenceError::not_found(id.get()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactMessageRepository for InMemoryStore {
    async fn create(
        &self,
        message: &ContactDraft,
    ) -> Result<ContactMessageId, ContactPersistenceError> {
        let mut state = self.lock().map_err(ContactPersistenceError::query)?;
        state.last_message_id += 1;
        let id = ContactMessageId::from_stored(state.last_message_id);
        state.messages.push((id, message.clone()));
        Ok(id)
    }
}
