//! Server configuration
//!
//! Every supported option is a named field with a fixed effect. The config
//! file only carries `port`; the remaining fields are tuned in code.

use crate::clock::DEFAULT_INTERVAL;
use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "HELLO_BENCH_CONFIG";

/// Config file used when `HELLO_BENCH_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "hello_bench.json";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Interface to bind
    pub hostname: String,
    /// Tokio worker threads
    pub workers: usize,
    /// Listen queue length
    pub backlog: i32,
    /// Disable Nagle's algorithm on accepted sockets
    pub tcp_nodelay: bool,
    /// Set `SO_REUSEPORT` on the listener (unix only)
    pub reuse_port: bool,
    /// Keep HTTP/1.1 connections open between requests
    pub keep_alive: bool,
    /// Value of the `Server` response header
    pub server_name: String,
    /// Date header refresh period
    pub clock_interval: Duration,
    /// How long shutdown waits for open connections to finish
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            hostname: "0.0.0.0".to_string(),
            workers: num_cpus::get(),
            backlog: 1024,
            tcp_nodelay: true,
            reuse_port: true,
            keep_alive: true,
            server_name: "hello-bench".to_string(),
            clock_interval: DEFAULT_INTERVAL,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

/// On-disk shape of the config file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    port: Option<u16>,
}

impl ServerConfig {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Parse a JSON config document, keeping defaults for absent keys
    ///
    /// Port 0 is rejected: a file always names a fixed port.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        let mut config = Self::default();
        match file.port {
            Some(0) => return Err(Error::Config("port must be between 1 and 65535".to_string())),
            Some(port) => config.port = port,
            None => {}
        }
        Ok(config)
    }

    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Like [`ServerConfig::load`], falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "read config failed, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Config file path from `HELLO_BENCH_CONFIG`, or the default path
    pub fn path_from_env() -> std::path::PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(Into::into)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.into())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.hostname, self.port);
        addr.parse().map_err(|_| Error::InvalidAddress(addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.hostname, "0.0.0.0");
        assert!(config.workers >= 1);
        assert_eq!(config.clock_interval, Duration::from_secs(1));
        assert_eq!(config.server_name, "hello-bench");
    }

    #[test]
    fn test_port_from_json() {
        let config = ServerConfig::from_json(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config, ServerConfig::default().with_port(9000));
    }

    #[test]
    fn test_missing_port_uses_default() {
        let config = ServerConfig::from_json("{}").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config =
            ServerConfig::from_json(r#"{"port": 8081, "database": "bench", "host": "db"}"#)
                .unwrap();
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_invalid_port() {
        for json in [
            r#"{"port": 0}"#,
            r#"{"port": 70000}"#,
            r#"{"port": -1}"#,
            r#"{"port": "80"}"#,
            "not json",
        ] {
            assert!(
                matches!(ServerConfig::from_json(json), Err(Error::Config(_))),
                "input {json:?}"
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("hello-bench-does-not-exist.json");
        assert!(matches!(ServerConfig::load(&path), Err(Error::Io(_))));
        assert_eq!(ServerConfig::load_or_default(&path), ServerConfig::default());
    }

    #[test]
    fn test_zero_port_file_falls_back_to_default() {
        let path = std::env::temp_dir().join(format!("hello-bench-zero-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"port": 0}"#).unwrap();
        let loaded = ServerConfig::load(&path);
        let fallback = ServerConfig::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(loaded, Err(Error::Config(_))));
        assert_eq!(fallback.port, DEFAULT_PORT);
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("hello-bench-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"port": 18080}"#).unwrap();
        let config = ServerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.port, 18080);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::default().with_hostname("127.0.0.1").with_port(3000);
        assert_eq!(config.socket_addr().unwrap(), "127.0.0.1:3000".parse::<SocketAddr>().unwrap());

        let bad = ServerConfig::default().with_hostname("not a host");
        assert!(matches!(bad.socket_addr(), Err(Error::InvalidAddress(_))));
    }
}
