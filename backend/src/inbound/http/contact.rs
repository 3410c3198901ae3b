//! Contact form route.

use actix_web::{HttpResponse, get, post, web};

use crate::domain::forms::{ContactInput, FormErrors};
use crate::domain::{Actor, ApiResult};

use super::pages::render_with;
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{error_summary, form_body};

pub const SUBMITTED_MESSAGE: &str = "Your message has been submitted.";

fn contact_page(
    session: &SessionContext,
    actor: &Actor,
    input: &ContactInput,
    errors: &FormErrors,
    notices: Vec<String>,
) -> ApiResult<HttpResponse> {
    render_with(
        session,
        actor,
        "Contact",
        &form_body("Contact Me", "/contact", input, errors, "Send"),
        notices,
    )
}

#[get("/contact")]
pub async fn contact_form(actor: Actor, session: SessionContext) -> ApiResult<HttpResponse> {
    contact_page(
        &session,
        &actor,
        &ContactInput::default(),
        &FormErrors::new(),
        Vec::new(),
    )
}

/// Store the message and show a fresh form with a confirmation.
#[post("/contact")]
pub async fn submit_contact(
    state: web::Data<HttpState>,
    actor: Actor,
    session: SessionContext,
    form: web::Form<ContactInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    match input.validate() {
        Ok(draft) => {
            state.contact.submit(&draft).await?;
            contact_page(
                &session,
                &actor,
                &ContactInput::default(),
                &FormErrors::new(),
                vec![SUBMITTED_MESSAGE.to_owned()],
            )
        }
        Err(errors) => {
            let summary = error_summary::<ContactInput>(&errors);
            contact_page(&session, &actor, &input, &errors, summary)
        }
    }
}
