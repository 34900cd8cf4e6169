//! Runtime configuration read from the environment (and `.env` natively).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::sync::{SyncOptions, CACHE_TTL, DEFAULT_PAGE_SIZE, FILTER_DEBOUNCE, SEARCH_DEBOUNCE};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the REST API, including the `/api` prefix.
    pub api_url: String,
    pub sync: SyncOptions,
    /// Where the login session is kept between runs. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_url: DEFAULT_API_URL.to_string(),
            sync: SyncOptions::default(),
            session_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let page_size: u32 = parse_or(&lookup, "LEADS_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            bail!("LEADS_PAGE_SIZE must be at least 1");
        }

        let cache_ttl = Duration::from_secs(parse_or(&lookup, "LEADS_CACHE_TTL_SECS", CACHE_TTL.as_secs())?);
        let filter_debounce = Duration::from_millis(parse_or(
            &lookup,
            "LEADS_FILTER_DEBOUNCE_MS",
            FILTER_DEBOUNCE.as_millis() as u64,
        )?);
        let search_debounce = Duration::from_millis(parse_or(
            &lookup,
            "LEADS_SEARCH_DEBOUNCE_MS",
            SEARCH_DEBOUNCE.as_millis() as u64,
        )?);

        let session_file = lookup("LEADS_SESSION_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(AppConfig {
            api_url,
            sync: SyncOptions {
                page_size,
                cache_ttl,
                filter_debounce,
                search_debounce,
            },
            session_file,
        })
    }
}

// Global config, set once at startup
static APP_CONFIG: std::sync::OnceLock<AppConfig> = std::sync::OnceLock::new();

pub fn init_app_config(config: AppConfig) {
    let _ = APP_CONFIG.set(config);
}

pub fn app_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::default)
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {} value: {:?}", key, raw)),
        None => {
            tracing::debug!("{} not set, using default", key);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        assert_eq!(config(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("API_URL", "https://crm.example.com/api/"),
            ("LEADS_PAGE_SIZE", "50"),
            ("LEADS_CACHE_TTL_SECS", "60"),
            ("LEADS_FILTER_DEBOUNCE_MS", "150"),
            ("LEADS_SESSION_FILE", "/tmp/lead-desk/session.json"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://crm.example.com/api");
        assert_eq!(config.sync.page_size, 50);
        assert_eq!(config.sync.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.sync.filter_debounce, Duration::from_millis(150));
        assert_eq!(config.sync.search_debounce, SEARCH_DEBOUNCE);
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/lead-desk/session.json")));
    }

    #[test]
    fn test_bad_numbers_are_errors() {
        let err = config(&[("LEADS_PAGE_SIZE", "twenty")]).unwrap_err();
        assert!(err.to_string().contains("LEADS_PAGE_SIZE"));
        assert!(config(&[("LEADS_PAGE_SIZE", "0")]).is_err());
    }
}
