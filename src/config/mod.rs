//! Configuration module for the gitnote backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// GitHub repository owner
    pub owner: String,
    /// GitHub repository name
    pub repo: String,
    /// GitHub personal access token
    pub token: String,
    /// Path of the document file inside the repository
    pub doc_path: String,
    /// Base URL of the GitHub API (overridable for tests)
    pub api_base: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("GITNOTE_API_PSK").ok();

        let owner = env::var("GITNOTE_OWNER").unwrap_or_default();
        let repo = env::var("GITNOTE_REPO").unwrap_or_default();
        let token = env::var("GITNOTE_TOKEN").unwrap_or_default();

        let doc_path = env::var("GITNOTE_DOC_PATH").unwrap_or_else(|_| "db.json".to_string());

        let api_base =
            env::var("GITNOTE_API_BASE").unwrap_or_else(|_| "https://api.github.com".to_string());

        let bind_addr = env::var("GITNOTE_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid GITNOTE_BIND_ADDR format");

        let log_level = env::var("GITNOTE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            api_psk,
            owner,
            repo,
            token,
            doc_path,
            api_base,
            bind_addr,
            log_level,
        }
    }

    /// Whether the GitHub coordinates are complete enough to load or save.
    pub fn github_configured(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty() && !self.token.is_empty()
    }
}
