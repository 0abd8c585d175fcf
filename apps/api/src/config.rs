use anyhow::{Context, Result};
use uuid::Uuid;

/// Identity used when a request carries none and anonymous fallback is enabled.
pub const DEFAULT_PLACEHOLDER_USER_ID: &str = "00000000-0000-4000-8000-000000000000";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. `None` runs the service against the in-memory store.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Rasterizer binary used for PDF export.
    pub pdf_engine_bin: String,
    /// Serve identity-less requests as `placeholder_user_id` instead of rejecting them.
    pub anonymous_fallback: bool,
    pub placeholder_user_id: Uuid,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            pdf_engine_bin: optional_env("PDF_ENGINE_BIN")
                .unwrap_or_else(|| "wkhtmltopdf".to_string()),
            anonymous_fallback: parse_bool(
                "ANONYMOUS_FALLBACK",
                optional_env("ANONYMOUS_FALLBACK").as_deref(),
                true,
            )?,
            placeholder_user_id: optional_env("PLACEHOLDER_USER_ID")
                .as_deref()
                .unwrap_or(DEFAULT_PLACEHOLDER_USER_ID)
                .parse::<Uuid>()
                .context("PLACEHOLDER_USER_ID must be a UUID")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            pdf_engine_bin: "wkhtmltopdf".to_string(),
            anonymous_fallback: true,
            placeholder_user_id: Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0000),
        }
    }
}

/// Unset and empty are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &str, value: Option<&str>, default: bool) -> Result<bool> {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("{key} must be a boolean, got '{v}'"),
        },
    }
}
