use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_UPLOAD_MAX_AGE_SECS: u64 = 3600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Deployment flavour. Development mode exposes upstream error details in responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if the generative-model API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    /// Allowed cross-origin caller. `None` means permissive CORS.
    pub client_url: Option<String>,
    pub environment: Environment,
    pub upload_dir: PathBuf,
    /// Retention window of the upload janitor.
    pub upload_max_age: Duration,
    /// How often the janitor sweeps. Kept separate from the retention window.
    pub sweep_interval: Duration,
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
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = match lookup("GOOGLE_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            Some(key) => key,
            None => bail!(
                "Required environment variable 'GOOGLE_API_KEY' or 'GEMINI_API_KEY' is not set"
            ),
        };

        Ok(Config {
            gemini_api_key,
            port: parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?,
            client_url: lookup("CLIENT_URL"),
            environment: lookup("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            upload_max_age: Duration::from_secs(parse_or(
                "UPLOAD_MAX_AGE_SECS",
                lookup("UPLOAD_MAX_AGE_SECS"),
                DEFAULT_UPLOAD_MAX_AGE_SECS,
            )?),
            sweep_interval: Duration::from_secs(parse_or(
                "UPLOAD_SWEEP_INTERVAL_SECS",
                lookup("UPLOAD_SWEEP_INTERVAL_SECS"),
                DEFAULT_SWEEP_INTERVAL_SECS,
            )?),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "8000")])).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        assert!(Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_gemini_api_key_is_accepted_as_fallback() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "g-key")])).unwrap();
        assert_eq!(config.gemini_api_key, "g-key");
    }

    #[test]
    fn test_google_api_key_wins_over_gemini_api_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "google"),
            ("GEMINI_API_KEY", "gemini"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_key, "google");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k")])).unwrap();
        assert_eq!(config.port, 5000);
        assert!(config.client_url.is_none());
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.upload_max_age, Duration::from_secs(3600));
        assert_eq!(config.sweep_interval, Duration::from_secs(3600));
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "k"),
            ("PORT", "8081"),
            ("CLIENT_URL", "http://localhost:3000"),
            ("APP_ENV", "Development"),
            ("UPLOAD_DIR", "/tmp/resumes"),
            ("UPLOAD_MAX_AGE_SECS", "60"),
            ("UPLOAD_SWEEP_INTERVAL_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.client_url.as_deref(), Some("http://localhost:3000"));
        assert!(config.is_development());
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/resumes"));
        assert_eq!(config.upload_max_age, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "k"), ("PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
