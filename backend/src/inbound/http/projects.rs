//! Project listing, detail and administrator editing routes.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::forms::{FormErrors, ProjectInput};
use crate::domain::{
    Actor, ApiResult, Category, Error, Project, ProjectCommandError, ProjectDraft, ProjectId,
};

use super::actor::AdminActor;
use super::pages::{render, see_other};
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{form_body, project_body, projects_body};

const TITLE_TAKEN_MESSAGE: &str = "A project with this title already exists.";

/// Query string of `/projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    pub category: Option<String>,
}

fn project_id(raw: i32) -> ApiResult<ProjectId> {
    ProjectId::new(raw).map_err(|_| Error::not_found(format!("project {raw} not found")))
}

fn category_filter(raw: Option<&str>) -> ApiResult<Option<Category>> {
    raw.filter(|value| !value.is_empty())
        .map(|value| {
            Category::parse(value)
                .map_err(|_| Error::invalid_request(format!("unknown category: {value}")))
        })
        .transpose()
}

#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    actor: Actor,
    session: SessionContext,
    query: web::Query<ProjectsQuery>,
) -> ApiResult<HttpResponse> {
    let filter = category_filter(query.category.as_deref())?;
    let projects = state.projects.list(filter).await?;
    render(
        &session,
        &actor,
        "Projects",
        &projects_body(&projects, filter, actor.is_admin()),
    )
}

#[get("/project/{id}")]
pub async fn show_project(
    state: web::Data<HttpState>,
    actor: Actor,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let project = state.projects.get(project_id(path.into_inner())?).await?;
    render(
        &session,
        &actor,
        &project.draft.title,
        &project_body(&project, actor.is_admin()),
    )
}

fn project_form(
    session: &SessionContext,
    admin: &AdminActor,
    heading: &str,
    action: &str,
    input: &ProjectInput,
    errors: &FormErrors,
) -> ApiResult<HttpResponse> {
    render(
        session,
        admin.actor(),
        heading,
        &form_body(heading, action, input, errors, "Submit"),
    )
}

/// Outcome of a validated save: the saved project, or a form to show again.
enum Saved {
    Done(ProjectId),
    Invalid(FormErrors),
}

async fn save<F, Fut>(input: &ProjectInput, persist: F) -> ApiResult<Saved>
where
    F: FnOnce(ProjectDraft) -> Fut,
    Fut: Future<Output = Result<Project, ProjectCommandError>>,
{
    let draft = match input.validate() {
        Ok(draft) => draft,
        Err(errors) => return Ok(Saved::Invalid(errors)),
    };
    match persist(draft).await {
        Ok(project) => Ok(Saved::Done(project.id)),
        Err(ProjectCommandError::DuplicateTitle) => {
            Ok(Saved::Invalid(FormErrors::single("title", TITLE_TAKEN_MESSAGE)))
        }
        Err(ProjectCommandError::Store(error)) => Err(error),
    }
}

#[get("/new-project")]
pub async fn new_project_form(
    admin: AdminActor,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    project_form(
        &session,
        &admin,
        "New Project",
        "/new-project",
        &ProjectInput::default(),
        &FormErrors::new(),
    )
}

#[post("/new-project")]
pub async fn create_project(
    state: web::Data<HttpState>,
    admin: AdminActor,
    session: SessionContext,
    form: web::Form<ProjectInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match save(&input, |draft| state.projects.create(admin.actor(), draft)).await? {
        Saved::Done(_) => {
            session.flash("Project published.")?;
            Ok(see_other("/projects"))
        }
        Saved::Invalid(errors) => {
            project_form(&session, &admin, "New Project", "/new-project", &input, &errors)
        }
    }
}

#[get("/edit-project/{id}")]
pub async fn edit_project_form(
    state: web::Data<HttpState>,
    admin: AdminActor,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let project = state.projects.get(project_id(path.into_inner())?).await?;
    project_form(
        &session,
        &admin,
        "Edit Project",
        &format!("/edit-project/{}", project.id),
        &ProjectInput::from_draft(&project.draft),
        &FormErrors::new(),
    )
}

#[post("/edit-project/{id}")]
pub async fn update_project(
    state: web::Data<HttpState>,
    admin: AdminActor,
    session: SessionContext,
    path: web::Path<i32>,
    form: web::Form<ProjectInput>,
) -> ApiResult<HttpResponse> {
    let id = state.projects.get(project_id(path.into_inner())?).await?.id;
    let input = form.into_inner();
    match save(&input, |draft| state.projects.update(admin.actor(), id, draft)).await? {
        Saved::Done(id) => {
            session.flash("Project updated.")?;
            Ok(see_other(&format!("/project/{id}")))
        }
        Saved::Invalid(errors) => project_form(
            &session,
            &admin,
            "Edit Project",
            &format!("/edit-project/{id}"),
            &input,
            &errors,
        ),
    }
}

#[post("/delete/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    admin: AdminActor,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = project_id(path.into_inner())?;
    state.projects.delete(admin.actor(), id).await?;
    session.flash("Project deleted.")?;
    Ok(see_other("/projects"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("Python"), Some(Category::Python))]
    #[case(Some("Wordpress"), Some(Category::Wordpress))]
    fn category_filter_accepts_known_values(
        #[case] raw: Option<&str>,
        #[case] expected: Option<Category>,
    ) {
        assert_eq!(category_filter(raw).expect("valid filter"), expected);
    }

    #[rstest]
    fn unknown_category_is_a_bad_request() {
        let error = category_filter(Some("Haskell")).expect_err("unknown");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_ids_are_not_found(#[case] raw: i32) {
        assert_eq!(project_id(raw).expect_err("invalid").code(), ErrorCode::NotFound);
    }
}
