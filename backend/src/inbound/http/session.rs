//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers only deal with the signed-in user id
//! and one-shot flash messages.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASH_KEY: &str = "flashes";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Sign `user_id` in, issuing a fresh session.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Signed-in user id, if any. A malformed id reads as signed out.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<i32>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| {
            UserId::new(raw)
                .inspect_err(|error| warn!("invalid user id in session cookie: {error}"))
                .ok()
        }))
    }

    /// Forget the signed-in user and every other session value.
    pub fn logout(&self) {
        self.0.purge();
    }

    /// Queue a message for the next rendered page.
    pub fn flash(&self, message: impl Into<String>) -> Result<(), Error> {
        let mut queued = self.read_flashes()?;
        queued.push(message.into());
        self.0
            .insert(FLASH_KEY, queued)
            .map_err(|error| Error::internal(format!("failed to store flash message: {error}")))
    }

    /// Drain queued flash messages.
    pub fn take_flashes(&self) -> Result<Vec<String>, Error> {
        let queued = self.read_flashes()?;
        if !queued.is_empty() {
            self.0.remove(FLASH_KEY);
        }
        Ok(queued)
    }

    fn read_flashes(&self) -> Result<Vec<String>, Error> {
        self.0
            .get::<Vec<String>>(FLASH_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read flash messages: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(UserId::ADMIN)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!("{id:?}")))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        let body = test::read_body(get_res).await;
        assert_eq!(body, "Some(UserId(1))");
    }

    #[actix_web::test]
    async fn tampered_user_id_reads_as_signed_out() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session.insert(USER_ID_KEY, -7).expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!("{id:?}")))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "None");
    }

    #[actix_web::test]
    async fn flashes_are_shown_once() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/flash",
                    web::get().to(|session: SessionContext| async move {
                        session.flash("first")?;
                        session.flash("second")?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        let flashes = session.take_flashes()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(flashes.join(",")))
                    }),
                ),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/flash").to_request()).await;
        let cookie = session_cookie(&res);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/take").cookie(cookie).to_request(),
        )
        .await;
        let cookie = session_cookie(&res);
        assert_eq!(test::read_body(res).await, "first,second");

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/take").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "");
    }
}
