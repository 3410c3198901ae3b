//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig, SettingsError};
pub use state_builders::StoreSetupError;

use state_builders::build_http_state;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use portfolio::Trace;
use portfolio::inbound::http::configure;
use portfolio::inbound::http::health::{HealthState, live, ready};

/// Errors raised while starting the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreSetupError),
    #[error("failed to bind HTTP listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// Construct the Actix HTTP server and mark it ready.
///
/// The returned [`Server`] must be awaited to drive the listener.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> Result<Server, StartupError> {
    let http_state = web::Data::new(build_http_state(&config).await?);
    let ServerConfig {
        session, bind_addr, ..
    } = config;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(session.middleware())
            .wrap(Trace)
            .configure(configure)
            .service(ready)
            .service(live)
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
