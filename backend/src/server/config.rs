//! Application settings and the assembled server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use portfolio::inbound::http::session_config::SessionSettings;
use portfolio::inbound::http::state::ResumeFile;

const DEFAULT_POOL_MAX_SIZE: u32 = 8;
const DEFAULT_RESUME_PATH: &str = "CV-2024.pdf";

/// Settings loaded from `PORTFOLIO_*` environment variables, config files and
/// command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTFOLIO")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = "0.0.0.0:5001".to_owned())]
    pub bind_addr: String,
    /// PostgreSQL URL. Without one the site keeps its data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// CV file served by `/download`.
    pub resume_path: Option<PathBuf>,
    /// File name offered to the browser for the CV.
    pub resume_download_name: Option<String>,
}

/// Errors raised while interpreting [`AppSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .parse()
            .map_err(|source| SettingsError::BindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    /// CV location; the download name defaults to the file's own name.
    pub fn resume(&self) -> ResumeFile {
        let path = self
            .resume_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESUME_PATH));
        let download_name = self.resume_download_name.clone().unwrap_or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_RESUME_PATH.to_owned())
        });
        ResumeFile::new(path, download_name)
    }
}

/// Everything `create_server` needs, validated up front.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database_url: Option<String>,
    pub(crate) pool_max_size: u32,
    pub(crate) resume: ResumeFile,
}

impl ServerConfig {
    /// Combine application settings with the session settings.
    pub fn new(settings: &AppSettings, session: SessionSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            session,
            bind_addr: settings.bind_addr()?,
            database_url: settings.database_url.clone(),
            pool_max_size: settings.pool_max_size()?,
            resume: settings.resume(),
        })
    }
}
