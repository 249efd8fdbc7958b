use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:8080,http://127.0.0.1:8080,http://localhost:8081,http://127.0.0.1:8081";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// SMTP relay settings. Credentials are optional at startup; the mailer
/// reports them as missing when a send is attempted.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

/// Application configuration loaded from environment variables.
///
/// Built once in `main` and carried in `AppState`. Missing API or mail
/// credentials do not stop the server: the affected endpoints answer with a
/// "not configured" error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub smtp: SmtpSettings,
    pub mail_dry_run: bool,
    pub resume_file_path: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            gemini_api_key: optional("GEMINI_API_KEY"),
            smtp: SmtpSettings {
                host: optional("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parse_or("SMTP_PORT", optional("SMTP_PORT"), 587)?,
                username: optional("GMAIL_USER"),
                password: optional("GMAIL_APP_PASSWORD"),
                timeout: Duration::from_secs(parse_or(
                    "SMTP_TIMEOUT_SECS",
                    optional("SMTP_TIMEOUT_SECS"),
                    30,
                )?),
            },
            mail_dry_run: parse_flag("MAIL_DRY_RUN", optional("MAIL_DRY_RUN"))?,
            resume_file_path: optional("RESUME_FILE_PATH"),
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                optional("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            port: parse_or("PORT", optional("PORT"), 8000)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {value}")),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: Option<String>) -> Result<bool> {
    let Some(value) = raw else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Environment variable '{key}' must be a boolean, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.timeout, Duration::from_secs(30));
        assert!(config.smtp.username.is_none());
        assert!(!config.mail_dry_run);
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.cors_allowed_origins.len(), 4);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_reads_credentials_and_overrides() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "key-123"),
            ("GMAIL_USER", "me@example.com"),
            ("GMAIL_APP_PASSWORD", "abcdabcdabcdabcd"),
            ("SMTP_PORT", "2525"),
            ("MAIL_DRY_RUN", "true"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, ,http://b.test"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("key-123"));
        assert_eq!(config.smtp.username.as_deref(), Some("me@example.com"));
        assert_eq!(config.smtp.port, 2525);
        assert!(config.mail_dry_run);
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = config_from(&[("GEMINI_API_KEY", "   "), ("RESUME_FILE_PATH", "")]).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert!(config.resume_file_path.is_none());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_invalid_flag_is_an_error() {
        assert!(config_from(&[("MAIL_DRY_RUN", "maybe")]).is_err());
    }
}
