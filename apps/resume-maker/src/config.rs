use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the local document mirror.
    pub store_dir: PathBuf,
    /// Base URL of the publish API (`/api/resumes`, `/api/public/{slug}`).
    pub remote_api_url: String,
    pub remote_timeout: Duration,
    /// TrueType font for PDF export. Without one, text is greeked.
    pub font_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            store_dir: PathBuf::from(env_or("STORE_DIR", "./.resume-maker")),
            remote_api_url: env_or("REMOTE_API_URL", "http://localhost:3000"),
            remote_timeout: Duration::from_secs(
                env_or("REMOTE_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("REMOTE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            font_path: optional_env("FONT_PATH").map(PathBuf::from),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
