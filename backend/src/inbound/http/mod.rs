//! HTTP inbound adapter serving the portfolio pages.

use actix_web::web;

pub mod actor;
pub mod auth;
pub mod contact;
pub mod error;
pub mod health;
pub mod pages;
pub mod projects;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

pub use actor::AdminActor;

/// Register every page route.
///
/// Expects `web::Data<HttpState>` and session middleware on the app.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use portfolio::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::home)
        .service(pages::resume)
        .service(pages::download)
        .service(projects::list_projects)
        .service(projects::show_project)
        .service(projects::new_project_form)
        .service(projects::create_project)
        .service(projects::edit_project_form)
        .service(projects::update_project)
        .service(projects::delete_project)
        .service(auth::register_form)
        .service(auth::register)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout)
        .service(contact::contact_form)
        .service(contact::submit_contact);
}
