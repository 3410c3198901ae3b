//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent status codes and error pages.

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{HttpResponse, ResponseError};
use tracing::{error, warn};

use crate::domain::{Actor, Error, ErrorCode, TRACE_ID_HEADER};

use super::views::{Layout, error_body, html};

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message safe to show to the visitor.
fn public_message(error: &Error) -> &str {
    match error.code() {
        ErrorCode::InvalidRequest
        | ErrorCode::Unauthorized
        | ErrorCode::Forbidden
        | ErrorCode::NotFound
        | ErrorCode::Conflict => error.message(),
        ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
        ErrorCode::InternalError => "Internal server error",
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code().as_str(), message = self.message(), "request failed");
        } else {
            warn!(code = self.code().as_str(), message = self.message(), "request rejected");
        }

        let page = Layout {
            title: status.canonical_reason().unwrap_or("Error"),
            actor: &Actor::Anonymous,
            flashes: &[],
        }
        .render(&error_body(status, public_message(self), self.trace_id()));
        let mut response = html(status, page);
        if let Some(id) = self.trace_id()
            && let Ok(value) = id.parse::<HeaderValue>()
        {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        response
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
