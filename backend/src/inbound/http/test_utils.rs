//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use mockable::DefaultClock;

use super::state::{HttpState, HttpStatePorts, ResumeFile};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::Argon2PasswordHasher;

/// Session middleware with a fresh key, cookie `session` and no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// HTTP state over a fresh in-memory store, returned alongside the store.
pub fn memory_state() -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let state = HttpState::new(
        HttpStatePorts {
            users: store.clone(),
            projects: store.clone(),
            contact_messages: store.clone(),
            hasher: Arc::new(Argon2PasswordHasher::default()),
            clock: Arc::new(DefaultClock),
        },
        ResumeFile::new(std::env::temp_dir().join("portfolio-missing-cv.pdf"), "CV.pdf"),
    );
    (state, store)
}
