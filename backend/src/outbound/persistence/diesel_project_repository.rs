//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.
//!
//! Reads join `users` so each project carries its author's display name.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ProjectPersistenceError, ProjectRepository};
use crate::domain::{
    Author, Category, DisplayName, NewProject, Project, ProjectDraft, ProjectId, ProjectUpdate,
    UserId, WebUrl,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewProjectRow, ProjectChangeset, ProjectRow};
use super::pool::{DbPool, PoolError};
use super::schema::{PROJECTS_AUTHOR_FKEY, PROJECTS_TITLE_KEY, projects, users};

/// Diesel-backed implementation of the `ProjectRepository` port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProjectPersistenceError {
    ProjectPersistenceError::connection(error.into_message())
}

fn map_write_failure(
    failure: DieselFailure,
    draft: &ProjectDraft,
    author: UserId,
) -> ProjectPersistenceError {
    if failure.violates_unique(PROJECTS_TITLE_KEY) {
        return ProjectPersistenceError::duplicate_title(draft.title.as_str());
    }
    if failure.violates_foreign_key(PROJECTS_AUTHOR_FKEY) {
        return ProjectPersistenceError::author_missing(author.get());
    }
    map_failure(failure)
}

fn map_failure(failure: DieselFailure) -> ProjectPersistenceError {
    if failure.is_connection() {
        ProjectPersistenceError::connection(failure.message())
    } else {
        ProjectPersistenceError::query(failure.message())
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ProjectPersistenceError {
    map_failure(classify_diesel_error(error))
}

/// Convert a joined row to a domain project.
fn row_to_project(
    (row, author_name): (ProjectRow, String),
) -> Result<Project, ProjectPersistenceError> {
    let corrupted = |what: &str, err: &dyn std::fmt::Display| {
        ProjectPersistenceError::query(format!("corrupted project row {}: {what}: {err}", row.id))
    };
    let draft = ProjectDraft {
        title: row.title.clone(),
        project_url: WebUrl::new(&row.project_url).map_err(|err| corrupted("project_url", &err))?,
        category: Category::parse(&row.category).map_err(|err| corrupted("category", &err))?,
        img_url: WebUrl::new(&row.img_url).map_err(|err| corrupted("img_url", &err))?,
        body: row.body.clone(),
    };
    Ok(Project {
        id: ProjectId::new(row.id).map_err(|err| corrupted("id", &err))?,
        draft,
        created_on: row.created_on,
        author: Author {
            id: UserId::new(row.author_id).map_err(|err| corrupted("author_id", &err))?,
            name: DisplayName::new(&author_name).map_err(|err| corrupted("author", &err))?,
        },
    })
}

async fn load(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<Option<Project>, ProjectPersistenceError> {
    let row: Option<(ProjectRow, String)> = projects::table
        .inner_join(users::table)
        .filter(projects::id.eq(id))
        .select((ProjectRow::as_select(), users::name))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    row.map(row_to_project).transpose()
}

async fn load_existing(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> Result<Project, ProjectPersistenceError> {
    load(conn, id)
        .await?
        .ok_or_else(|| ProjectPersistenceError::not_found(id))
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn create(&self, project: &NewProject) -> Result<Project, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let draft = &project.draft;

        let row = NewProjectRow {
            author_id: project.author.get(),
            title: &draft.title,
            project_url: draft.project_url.as_ref(),
            category: draft.category.as_str(),
            created_on: project.created_on,
            body: &draft.body,
            img_url: draft.img_url.as_ref(),
        };
        let id: i32 = diesel::insert_into(projects::table)
            .values(&row)
            .returning(projects::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_failure(classify_diesel_error(err), draft, project.author))?;

        load_existing(&mut conn, id).await
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load(&mut conn, id.get()).await
    }

    async fn list(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Project>, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = projects::table
            .inner_join(users::table)
            .select((ProjectRow::as_select(), users::name))
            .order(projects::id.asc())
            .into_boxed();
        if let Some(category) = category {
            query = query.filter(projects::category.eq(category.as_str()));
        }
        let rows: Vec<(ProjectRow, String)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_project).collect()
    }

    async fn update(&self, update: &ProjectUpdate) -> Result<Project, ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let draft = &update.draft;

        let changes = ProjectChangeset {
            author_id: update.author.get(),
            title: &draft.title,
            project_url: draft.project_url.as_ref(),
            category: draft.category.as_str(),
            body: &draft.body,
            img_url: draft.img_url.as_ref(),
        };
        let updated = diesel::update(projects::table.find(update.id.get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_failure(classify_diesel_error(err), draft, update.author))?;
        if updated == 0 {
            return Err(ProjectPersistenceError::not_found(update.id.get()));
        }

        load_existing(&mut conn, update.id.get()).await
    }

    async fn delete(&self, id: ProjectId) -> Result<(), ProjectPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(projects::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(ProjectPersistenceError::not_found(id.get()));
        }
        Ok(())
    }
}
