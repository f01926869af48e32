//! Environment-driven configuration.

use crate::cors::CorsPolicy;
use dotenvy::Error as DotenvError;
use gemini_prompt::callers::GEMINI_API_BASE;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Deployment environment, as named by `APP_ENV`. Only an explicit
/// `development` relaxes CORS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Other(String),
}

impl Environment {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "production" | "prod" => Environment::Production,
            other => Environment::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Other(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` when `APP_ENV` is unset. Reported as `development`, but CORS stays strict.
    pub environment: Option<Environment>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub request_timeout: Duration,
    /// Extra origins from `ALLOWED_ORIGINS`, on top of the built-in list.
    pub allowed_origins: Vec<String>,
    pub cors_allow_all: bool,
    pub frontend_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            environment: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.into(),
            gemini_api_base: GEMINI_API_BASE.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            allowed_origins: Vec::new(),
            cors_allow_all: false,
            frontend_url: None,
        }
    }
}

impl Config {
    /// Loads `.env.local` and `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_files();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let port = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                expected: "a port number",
                value: v,
            })?,
            None => defaults.port,
        };
        let request_timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "GEMINI_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value: v,
            })?),
            None => defaults.request_timeout,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            environment: get("APP_ENV").map(|v| Environment::parse(&v)),
            gemini_api_key: get("GEMINI_API_KEY").map(|v| v.trim().to_string()),
            gemini_model: get("GEMINI_MODEL")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.gemini_model),
            gemini_api_base: get("GEMINI_API_BASE").unwrap_or(defaults.gemini_api_base),
            request_timeout,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            cors_allow_all: get("CORS_ALLOW_ALL")
                .map(|v| v.trim() == "true")
                .unwrap_or(false),
            frontend_url: get("FRONTEND_URL"),
        })
    }

    pub fn ai_configured(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Environment name for reports, `development` when unset.
    pub fn environment_name(&self) -> &str {
        self.environment
            .as_ref()
            .map_or("development", Environment::as_str)
    }

    pub fn cors_policy(&self) -> CorsPolicy {
        CorsPolicy::new(
            self.environment == Some(Environment::Development) || self.cors_allow_all,
            self.allowed_origins.iter().cloned(),
        )
    }
}

fn load_env_files() {
    fn load(file: &str) {
        match dotenvy::from_filename(file) {
            Ok(_) => {}
            Err(DotenvError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(file, error = %err, "unable to load env file"),
        }
    }

    load(".env.local");
    load(".env");
}
