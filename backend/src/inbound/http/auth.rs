//! Registration, login and logout routes.
//!
//! Recoverable failures become flash messages plus a redirect to `/login`;
//! invalid submissions re-render the form with inline errors.

use actix_web::{HttpResponse, get, post, web};
use tracing::{info, warn};

use crate::domain::forms::{FormErrors, LoginInput, RegistrationInput};
use crate::domain::{Actor, ApiResult, AuthError, CredentialFailure, Error};

use super::pages::{render, see_other};
use super::session::SessionContext;
use super::state::HttpState;
use super::views::form_body;

pub const DUPLICATE_EMAIL_FLASH: &str =
    "You've already signed up with that email, log in instead!";
pub const UNKNOWN_EMAIL_FLASH: &str = "That email does not exist, please try again.";
pub const WRONG_PASSWORD_FLASH: &str = "Password incorrect, please try again.";

fn registration_page(
    session: &SessionContext,
    actor: &Actor,
    input: &RegistrationInput,
    errors: &FormErrors,
) -> ApiResult<HttpResponse> {
    render(
        session,
        actor,
        "Register",
        &form_body("Register", "/register", input, errors, "Sign Me Up!"),
    )
}

fn login_page(
    session: &SessionContext,
    actor: &Actor,
    input: &LoginInput,
    errors: &FormErrors,
) -> ApiResult<HttpResponse> {
    render(
        session,
        actor,
        "Login",
        &form_body("Login", "/login", input, errors, "Let Me In!"),
    )
}

#[get("/register")]
pub async fn register_form(actor: Actor, session: SessionContext) -> ApiResult<HttpResponse> {
    registration_page(&session, &actor, &RegistrationInput::default(), &FormErrors::new())
}

#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    actor: Actor,
    session: SessionContext,
    form: web::Form<RegistrationInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    let registration = match input.validate() {
        Ok(registration) => registration,
        Err(errors) => return registration_page(&session, &actor, &input, &errors),
    };
    match state.auth.register(&registration).await {
        Ok(user) => {
            session.persist_user(user.id())?;
            Ok(see_other("/"))
        }
        Err(AuthError::DuplicateEmail) => {
            session.flash(DUPLICATE_EMAIL_FLASH)?;
            Ok(see_other("/login"))
        }
        Err(AuthError::InvalidCredentials { .. }) => {
            Err(Error::internal("registration reported a credential failure"))
        }
        Err(AuthError::Store(error)) => Err(error),
    }
}

#[get("/login")]
pub async fn login_form(actor: Actor, session: SessionContext) -> ApiResult<HttpResponse> {
    login_page(&session, &actor, &LoginInput::default(), &FormErrors::new())
}

#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    actor: Actor,
    session: SessionContext,
    form: web::Form<LoginInput>,
) -> ApiResult<HttpResponse> {
    let input = form.into_inner();
    let credentials = match input.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return login_page(&session, &actor, &input, &errors),
    };
    match state.auth.login(&credentials).await {
        Ok(user) => {
            session.persist_user(user.id())?;
            info!(user_id = %user.id(), "signed in");
            Ok(see_other("/"))
        }
        Err(AuthError::InvalidCredentials { reason }) => {
            warn!(%reason, "login refused");
            session.flash(match reason {
                CredentialFailure::UnknownEmail => UNKNOWN_EMAIL_FLASH,
                CredentialFailure::WrongPassword => WRONG_PASSWORD_FLASH,
            })?;
            Ok(see_other("/login"))
        }
        Err(AuthError::DuplicateEmail) => {
            Err(Error::internal("login reported a duplicate email"))
        }
        Err(AuthError::Store(error)) => Err(error),
    }
}

#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.logout();
    see_other("/login")
}
