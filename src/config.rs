// Runtime configuration. Everything comes from environment variables with
// defaults that match a local `dapr run` setup: the app on 6000 and the
// sidecar HTTP API on localhost:3500.
use std::net::SocketAddr;

const DEFAULT_APP_PORT: u16 = 6000;
const DEFAULT_DAPR_HTTP_PORT: u16 = 3500;
const DEFAULT_DAPR_HOST: &str = "localhost";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name} value, expected a port number, got: {value:?}")]
    InvalidPort { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub app_port: u16,
    pub dapr_host: String,
    pub dapr_http_port: u16,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_port: DEFAULT_APP_PORT,
            dapr_host: DEFAULT_DAPR_HOST.to_string(),
            dapr_http_port: DEFAULT_DAPR_HTTP_PORT,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values are
    /// treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let app_port = match get("APP_PORT") {
            Some(v) => parse_port("APP_PORT", v)?,
            None => DEFAULT_APP_PORT,
        };
        let dapr_http_port = match get("DAPR_HTTP_PORT") {
            Some(v) => parse_port("DAPR_HTTP_PORT", v)?,
            None => DEFAULT_DAPR_HTTP_PORT,
        };
        let dapr_host = get("DAPR_HOST").unwrap_or_else(|| DEFAULT_DAPR_HOST.to_string());
        let log_format = match get("LOG_FORMAT").as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        Ok(Config { app_port, dapr_host, dapr_http_port, log_format })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.app_port))
    }

    /// Base URL of the sidecar's v1.0 HTTP API, without a trailing slash.
    pub fn dapr_base_url(&self) -> String {
        format!("http://{}:{}/v1.0", self.dapr_host, self.dapr_http_port)
    }
}

fn parse_port(name: &'static str, value: String) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidPort { name, value })
}
