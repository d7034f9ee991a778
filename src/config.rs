// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Base64-encoded token signing secret | Required |
//! | `APP_ENV` | `production` disables the `.env` fallback | unset |
//! | `DATA_DIR` | Root directory for catalog storage | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding the base64-encoded signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable naming the deployment environment.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// `APP_ENV` value under which the local `.env` file is never consulted.
pub const PRODUCTION_ENV: &str = "production";

/// Local developer-only configuration file.
pub const DOTENV_FILE: &str = ".env";

/// Environment variable name for the storage root directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Startup configuration failures. None of these are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("signing secret is not configured (set {var})")]
    MissingSecret { var: &'static str },

    #[error("signing secret is not valid base64: {0}")]
    MalformedSecret(String),

    #[error("signing secret is {len} bytes, at least {min} are required")]
    SecretTooShort { len: usize, min: usize },

    #[error("failed to read {path}: {message}")]
    EnvFile { path: String, message: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Server settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var(PORT_ENV)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let log_format = env::var(LOG_FORMAT_ENV)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Pretty);

        Self {
            host,
            port,
            data_dir,
            log_format,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns true when local development files may be consulted.
pub fn dev_files_allowed() -> bool {
    dev_files_allowed_in(env::var(APP_ENV_ENV).ok().as_deref())
}

/// [`dev_files_allowed`] for an explicit `APP_ENV` value.
pub fn dev_files_allowed_in(app_env: Option<&str>) -> bool {
    app_env.is_none_or(|v| !v.trim().eq_ignore_ascii_case(PRODUCTION_ENV))
}

/// The `.env` file to fall back on, if any, under the given `APP_ENV`.
pub fn dotenv_fallback(app_env: Option<&str>) -> Option<&'static Path> {
    dev_files_allowed_in(app_env).then(|| Path::new(DOTENV_FILE))
}

/// Resolve the signing secret.
///
/// The process environment wins. When `JWT_SECRET` is absent or blank the
/// same key is looked up in `./.env` (outside production). A missing file is
/// not an error; a missing key is.
pub fn load_signing_secret() -> Result<String, ConfigError> {
    let app_env = env::var(APP_ENV_ENV).ok();
    resolve_secret(
        env::var(JWT_SECRET_ENV).ok(),
        dotenv_fallback(app_env.as_deref()),
    )
}

/// Resolution order behind [`load_signing_secret`], with explicit sources.
pub fn resolve_secret(
    env_value: Option<String>,
    dotenv_path: Option<&Path>,
) -> Result<String, ConfigError> {
    if let Some(secret) = non_blank(env_value) {
        return Ok(secret);
    }

    if let Some(path) = dotenv_path {
        if let Some(secret) = non_blank(read_dotenv_key(path, JWT_SECRET_ENV)?) {
            tracing::debug!(path = %path.display(), "signing secret loaded from local env file");
            return Ok(secret);
        }
    }

    Err(ConfigError::MissingSecret {
        var: JWT_SECRET_ENV,
    })
}

/// Load exactly `path` into the process environment. Variables that are
/// already set win; a missing file is not an error. Parent directories are
/// never searched.
pub fn apply_dotenv(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::EnvFile {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

/// Read one key from a dotenv file without touching the process environment.
fn read_dotenv_key(path: &Path, key: &str) -> Result<Option<String>, ConfigError> {
    let env_file_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(None),
        Err(e) => return Err(env_file_error(e)),
    };

    for entry in entries {
        let (name, value) = entry.map_err(env_file_error)?;
        if name == key {
            return Ok(Some(value));
        }
    }

    Ok(None)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
