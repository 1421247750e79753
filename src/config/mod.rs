//! Configuration module for the blog backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret guarding the admin routes (open when unset)
    pub admin_token: Option<String>,
    /// Path to the JSON snapshot file
    pub data_path: PathBuf,
    /// Directory receiving uploaded images
    pub upload_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Public origin used in sitemaps, e.g. `https://clipsync.pro`
    pub public_url: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let admin_token = env::var("CLIPSYNC_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let data_path = env::var("CLIPSYNC_DATA_PATH")
            .unwrap_or_else(|_| "./data.json".to_string())
            .into();

        let upload_dir = env::var("CLIPSYNC_UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads".to_string())
            .into();

        let bind_addr = env::var("CLIPSYNC_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
            .parse()?;

        let public_url = env::var("CLIPSYNC_PUBLIC_URL")
            .ok()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        let log_level = env::var("CLIPSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            admin_token,
            data_path,
            upload_dir,
            bind_addr,
            public_url,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test: the process environment is shared between test threads.
    #[test]
    fn test_config_from_env() {
        env::remove_var("CLIPSYNC_ADMIN_TOKEN");
        env::remove_var("CLIPSYNC_DATA_PATH");
        env::remove_var("CLIPSYNC_UPLOAD_DIR");
        env::remove_var("CLIPSYNC_BIND_ADDR");
        env::remove_var("CLIPSYNC_PUBLIC_URL");
        env::remove_var("CLIPSYNC_LOG_LEVEL");

        let config = Config::from_env().unwrap();

        assert!(config.admin_token.is_none());
        assert_eq!(config.data_path, PathBuf::from("./data.json"));
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert!(config.public_url.is_none());
        assert_eq!(config.log_level, "info");

        env::set_var("CLIPSYNC_PUBLIC_URL", "https://clipsync.example/");
        env::set_var("CLIPSYNC_BIND_ADDR", "not-an-address");
        assert!(Config::from_env().is_err());

        env::set_var("CLIPSYNC_BIND_ADDR", "0.0.0.0:8080");
        let config = Config::from_env().unwrap();
        assert_eq!(config.public_url.as_deref(), Some("https://clipsync.example"));
        assert_eq!(config.bind_addr.port(), 8080);

        env::remove_var("CLIPSYNC_PUBLIC_URL");
        env::remove_var("CLIPSYNC_BIND_ADDR");
    }
}
