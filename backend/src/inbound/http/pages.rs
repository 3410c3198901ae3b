//! Static pages, the résumé download and shared page rendering.

use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};
use tracing::warn;

use crate::domain::{Actor, ApiResult, Error};

use super::session::SessionContext;
use super::state::HttpState;
use super::views::{Layout, home_body, html, resume_body};

/// Render `body` inside the layout, draining queued flash messages.
pub(crate) fn render(
    session: &SessionContext,
    actor: &Actor,
    title: &str,
    body: &str,
) -> ApiResult<HttpResponse> {
    render_with(session, actor, title, body, Vec::new())
}

/// As [`render`], showing `extra` messages after the queued ones.
pub(crate) fn render_with(
    session: &SessionContext,
    actor: &Actor,
    title: &str,
    body: &str,
    extra: Vec<String>,
) -> ApiResult<HttpResponse> {
    let mut flashes = session.take_flashes()?;
    flashes.extend(extra);
    let page = Layout {
        title,
        actor,
        flashes: &flashes,
    }
    .render(body);
    Ok(html(StatusCode::OK, page))
}

/// `303 See Other` pointing at `location`.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[get("/")]
pub async fn home(actor: Actor, session: SessionContext) -> ApiResult<HttpResponse> {
    render(&session, &actor, "Home", &home_body())
}

#[get("/resume")]
pub async fn resume(actor: Actor, session: SessionContext) -> ApiResult<HttpResponse> {
    render(&session, &actor, "Resume", &resume_body())
}

/// Send the CV as an attachment.
#[get("/download")]
pub async fn download(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let cv = &state.resume;
    let bytes = tokio::fs::read(cv.path()).await.map_err(|error| {
        warn!(path = %cv.path().display(), %error, "résumé file unavailable");
        Error::not_found("résumé not available")
    })?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(
                cv.download_name().to_owned(),
            )],
        })
        .body(bytes))
}
