use anyhow::{bail, Context, Result};

use crate::layout::MIN_PAGES;
use crate::llm_client::DEFAULT_MODEL;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_PAGES: usize = 3;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fallback key for AI calls that do not carry their own.
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Number of logical pages in the placement model.
    pub max_pages: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_pages = match get("MAX_PAGES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("MAX_PAGES must be a positive integer")?,
            None => DEFAULT_MAX_PAGES,
        };
        if max_pages < MIN_PAGES {
            bail!("MAX_PAGES must be at least {MIN_PAGES}, got {max_pages}");
        }

        Ok(Config {
            ai_api_key: get("AI_API_KEY"),
            ai_model: get("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: match get("PORT") {
                Some(raw) => raw
                    .trim()
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => DEFAULT_PORT,
            },
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_pages,
            max_upload_bytes: match get("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .trim()
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}
