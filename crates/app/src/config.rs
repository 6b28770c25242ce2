//! Client configuration
//!
//! Read once from the environment at startup. A malformed value is fatal
//! to the current action and is never retried.

use std::net::SocketAddr;

use crate::error::{Error, Result};

pub const ENV_API_URL: &str = "BLITZ_API_URL";
pub const ENV_SOCKET_ADDR: &str = "BLITZ_SOCKET_ADDR";

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for the REST API
    pub api_base: String,
    /// Address of the game socket server
    pub socket_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_base = std::env::var(ENV_API_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let socket_addr = std::env::var(ENV_SOCKET_ADDR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| format!("127.0.0.1:{}", blitz_net::DEFAULT_PORT));
        Self::parse_parts(api_base, socket_addr)
    }

    fn parse_parts(api_base: String, socket_addr: String) -> Result<Self> {
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(Error::Config(format!(
                "{} must be an http(s) URL, got '{}'",
                ENV_API_URL, api_base
            )));
        }
        let socket_addr: SocketAddr = socket_addr.parse().map_err(|_| {
            Error::Config(format!(
                "{} is not a valid socket address: '{}'",
                ENV_SOCKET_ADDR, socket_addr
            ))
        })?;

        Ok(Config {
            api_base: api_base.trim_end_matches('/').to_string(),
            socket_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config =
            Config::parse_parts(DEFAULT_API_URL.to_string(), "127.0.0.1:5000".to_string()).unwrap();
        assert_eq!(config.api_base, "http://localhost:5000");
        assert_eq!(config.socket_addr.port(), 5000);
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config =
            Config::parse_parts("https://api.example.com/".to_string(), "10.0.0.1:9000".to_string())
                .unwrap();
        assert_eq!(config.api_base, "https://api.example.com");
    }

    #[test]
    fn test_non_http_base_rejected() {
        let result = Config::parse_parts("ftp://nope".to_string(), "127.0.0.1:5000".to_string());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_socket_addr_rejected() {
        let result =
            Config::parse_parts(DEFAULT_API_URL.to_string(), "not-an-address".to_string());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
