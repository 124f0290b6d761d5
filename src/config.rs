//! Configuration types, built once from environment variables at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Request body limit, covers file uploads.
    pub max_upload_bytes: usize,
    /// Optional directory holding the web frontend.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// `None` when no credential is configured: classification and reply
    /// generation run on the local heuristic only.
    pub llm: Option<LlmConfig>,
    /// Directory for daily-rolling log files, if file logging is wanted.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Build config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("EMAIL_TRIAGE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        // PORT wins so PaaS-style deployments work unchanged.
        let port = match get("PORT").map(|v| ("PORT", v)).or_else(|| {
            get("EMAIL_TRIAGE_PORT").map(|v| ("EMAIL_TRIAGE_PORT", v))
        }) {
            Some((key, value)) => parse_value(key, &value)?,
            None => DEFAULT_PORT,
        };

        let cors_origins = split_list(
            &get("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let max_upload_bytes = match get("EMAIL_TRIAGE_MAX_UPLOAD_BYTES") {
            Some(value) => parse_value("EMAIL_TRIAGE_MAX_UPLOAD_BYTES", &value)?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let server = ServerConfig {
            host,
            port,
            cors_origins,
            max_upload_bytes,
            static_dir: get("EMAIL_TRIAGE_STATIC_DIR").map(PathBuf::from),
        };

        let backend = match get("EMAIL_TRIAGE_LLM_BACKEND") {
            Some(value) => LlmBackend::from_str(&value)?,
            None => LlmBackend::OpenAi,
        };

        let (key_var, model_var, default_model) = match backend {
            LlmBackend::OpenAi => ("OPENAI_API_KEY", "OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            LlmBackend::Anthropic => (
                "ANTHROPIC_API_KEY",
                "ANTHROPIC_MODEL",
                DEFAULT_ANTHROPIC_MODEL,
            ),
        };

        let timeout_secs: u64 = match get("EMAIL_TRIAGE_LLM_TIMEOUT_SECS") {
            Some(value) => parse_value("EMAIL_TRIAGE_LLM_TIMEOUT_SECS", &value)?,
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        let llm = get(key_var).map(|api_key| LlmConfig {
            backend,
            api_key: secrecy::SecretString::from(api_key),
            model: get(model_var).unwrap_or_else(|| default_model.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        });

        Ok(Self {
            server,
            llm,
            log_dir: get("EMAIL_TRIAGE_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{value}': {e}"),
        })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
