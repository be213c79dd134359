//! Startup configuration.
//!
//! Values come from the environment (a `.env` file is loaded first) and can
//! be overridden by command-line flags.
//!
//! | Variable          | Meaning                                   | Default                  |
//! |-------------------|-------------------------------------------|--------------------------|
//! | `SOURCE_URL`      | Published CSV export of the sheet         | -                        |
//! | `SOURCE_FILE`     | Local CSV, used when no URL is set        | -                        |
//! | `PORT`            | HTTP port                                 | `5000`                   |
//! | `ALLOWED_ORIGIN`  | CORS origin of the dashboard              | `http://localhost:3000`  |
//! | `OUTLETS_FILE`    | JSON array replacing the outlet catalog   | built-in catalog         |

use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::OutletCatalog;
use crate::error::ConfigError;
use crate::source::TableSource;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Raw settings before validation.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub source_url: Option<String>,
    pub source_file: Option<PathBuf>,
    pub port: Option<u16>,
    pub allowed_origin: Option<String>,
    pub outlets_file: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            source_url: get("SOURCE_URL"),
            source_file: get("SOURCE_FILE").map(PathBuf::from),
            port,
            allowed_origin: get("ALLOWED_ORIGIN"),
            outlets_file: get("OUTLETS_FILE").map(PathBuf::from),
        })
    }

    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: Settings) -> Self {
        Self {
            source_url: self.source_url.or(fallback.source_url),
            source_file: self.source_file.or(fallback.source_file),
            port: self.port.or(fallback.port),
            allowed_origin: self.allowed_origin.or(fallback.allowed_origin),
            outlets_file: self.outlets_file.or(fallback.outlets_file),
        }
    }

    /// Source table, URL first.
    pub fn source(&self) -> Result<TableSource, ConfigError> {
        match (&self.source_url, &self.source_file) {
            (Some(url), _) => Ok(TableSource::Url(url.clone())),
            (None, Some(path)) => Ok(TableSource::File(path.clone())),
            (None, None) => Err(ConfigError::MissingSource),
        }
    }

    /// Outlet catalog: the file when given, the built-in one otherwise.
    pub fn catalog(&self) -> Result<Arc<OutletCatalog>, ConfigError> {
        match &self.outlets_file {
            Some(path) => Ok(Arc::new(OutletCatalog::from_file(path)?)),
            None => Ok(OutletCatalog::shared_default()),
        }
    }

    /// Validate into a server configuration.
    pub fn into_server_config(self) -> Result<ServerConfig, ConfigError> {
        Ok(ServerConfig {
            source: self.source()?,
            catalog: self.catalog()?,
            port: self.port.unwrap_or(DEFAULT_PORT),
            allowed_origin: self
                .allowed_origin
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
        })
    }
}

/// Validated configuration of the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub source: TableSource,
    pub catalog: Arc<OutletCatalog>,
    pub port: u16,
    pub allowed_origin: String,
}
