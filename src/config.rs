use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_BIND_PORT: u16 = 5007;
const DEFAULT_RIVA_DIR: &str = "/home/ubuntu/NVIDIA-AI";
const DEFAULT_NMT_SCRIPT: &str = "backend/nmt.py";
const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_NMT_SERVER: &str = "0.0.0.0:50051";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3007";
const DEFAULT_LOG_FILE: &str = "nmt_relay.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub riva_dir: PathBuf,
    pub nmt_script: PathBuf,
    pub interpreter: String,
    pub nmt_server: String,
    pub timeout: Duration,
    pub allowed_origin: HeaderValue,
    pub log_file: PathBuf,
    /// `PORT` as found at startup. Only reported by `/debug/port`, never bound.
    pub env_port: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("NMT_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
    #[error("CORS_ALLOWED_ORIGIN must be a valid header value")]
    InvalidAllowedOrigin,
    #[error("NMT_INTERPRETER must not be empty")]
    EmptyInterpreter,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_port = var("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(DEFAULT_BIND_PORT);
        let timeout_secs = var("NMT_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidTimeout)
            })
            .transpose()?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let allowed_origin = HeaderValue::from_str(
            &var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
        )
        .map_err(|_| ConfigError::InvalidAllowedOrigin)?;

        let interpreter = match lookup("NMT_INTERPRETER") {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::EmptyInterpreter),
            Some(value) => value.trim().to_string(),
            None => DEFAULT_INTERPRETER.to_string(),
        };

        let config = Self {
            bind_addr,
            bind_port,
            riva_dir: var("RIVA_DIR")
                .unwrap_or_else(|| DEFAULT_RIVA_DIR.to_string())
                .into(),
            nmt_script: var("NMT_SCRIPT")
                .unwrap_or_else(|| DEFAULT_NMT_SCRIPT.to_string())
                .into(),
            interpreter,
            nmt_server: var("NMT_SERVER").unwrap_or_else(|| DEFAULT_NMT_SERVER.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            allowed_origin,
            log_file: var("LOG_FILE")
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            env_port: var("PORT"),
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }

    pub fn script_path(&self) -> PathBuf {
        self.riva_dir.join(&self.nmt_script)
    }
}
