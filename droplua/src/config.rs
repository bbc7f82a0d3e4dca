//! Credential and endpoint configuration
//!
//! Resolution order for both the token and the API URL: CLI flag, then
//! environment, then the optional TOML config file under the user config
//! directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::DEFAULT_API_URL;

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "DIGITALOCEAN_ACCESS_TOKEN";
/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "DIGITALOCEAN_API_URL";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API token; the environment variable takes precedence
    pub token: Option<String>,
    /// API base URL override, mainly for pointing at a stub server
    pub api_url: Option<String>,
}

impl Config {
    /// Load `config.toml` from the user config directory. An absent file
    /// means defaults; a malformed file is an error.
    pub fn load() -> Result<Config> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Resolve the API token or fail with setup guidance.
    pub fn resolve_token(&self, flag: Option<String>) -> Result<String> {
        flag.or_else(|| std::env::var(TOKEN_ENV).ok())
            .or_else(|| self.token.clone())
            .context("no API token: pass --token, set DIGITALOCEAN_ACCESS_TOKEN, or add 'token' to config.toml")
    }

    /// Resolve the API base URL, falling back to production.
    pub fn resolve_api_url(&self, flag: Option<String>) -> String {
        flag.or_else(|| std::env::var(API_URL_ENV).ok())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("droplua").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_config_file_shape() {
        let config: Config = toml::from_str(
            r#"
            token = "dop_v1_abc123"
            api_url = "http://localhost:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.token.as_deref(), Some("dop_v1_abc123"));
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.token.is_none());
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_flag_wins_token_resolution() {
        let config = Config {
            token: Some("from-file".into()),
            api_url: None,
        };
        let token = config.resolve_token(Some("from-flag".into())).unwrap();
        assert_eq!(token, "from-flag");
    }

    #[test]
    fn test_api_url_falls_back_to_production() {
        let config = Config::default();
        // guard against an inherited override in the test environment
        if std::env::var(API_URL_ENV).is_err() {
            assert_eq!(config.resolve_api_url(None), DEFAULT_API_URL);
        }
        assert_eq!(config.resolve_api_url(Some("http://stub".into())), "http://stub");
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/droplua/config.toml")).unwrap();
        assert!(config.token.is_none());
    }
}
