//! Request extractors resolving who is acting.
//!
//! [`Actor`] resolves the session into an account or anonymous visitor.
//! [`AdminActor`] additionally rejects everyone but the administrator with
//! `403 Forbidden` before the handler body runs.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, AuthService, Error, User};

use super::session::SessionContext;
use super::state::HttpState;

// Only the session cookie is read; the body stays for later extractors.
async fn resolve(req: HttpRequest) -> Result<Actor, Error> {
    let state = web::Data::<HttpState>::extract(&req)
        .await
        .map_err(|_| Error::internal("HTTP state is not registered"))?;
    let session = SessionContext::extract(&req).await?;
    let user_id = session.user_id()?;
    state.auth.current_actor(user_id).await
}

impl FromRequest for Actor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        Box::pin(resolve(req.clone()))
    }
}

/// The administrator, extracted only for the account holding identity 1.
#[derive(Debug, Clone)]
pub struct AdminActor(Actor);

impl AdminActor {
    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.0
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.0.user()
    }
}

impl FromRequest for AdminActor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let actor = resolve(req.clone());
        Box::pin(async move {
            let actor = actor.await?;
            AuthService::require_admin(&actor)?;
            Ok(Self(actor))
        })
    }
}
