use std::path::PathBuf;
use std::time::Duration;

use studyshare_backend::BackendConfig;

pub struct Config {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub data_dir: PathBuf,
    pub log_format: String,
    pub debounce: Duration,
    pub coalesce_window: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let millis = |name: &str, default: u64| {
            non_empty(name)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            api_url: non_empty("STUDYSHARE_API_URL"),
            api_key: non_empty("STUDYSHARE_API_KEY"),
            data_dir: non_empty("STUDYSHARE_DATA_DIR")
                .unwrap_or_else(|| "./data".into())
                .into(),
            log_format: non_empty("STUDYSHARE_LOG_FORMAT").unwrap_or_else(|| "text".into()),
            debounce: Duration::from_millis(millis("STUDYSHARE_DEBOUNCE_MS", 500)),
            coalesce_window: Duration::from_millis(millis("STUDYSHARE_COALESCE_MS", 250)),
        }
    }

    /// Backend settings, when both URL and key are configured.
    pub fn backend(&self) -> anyhow::Result<BackendConfig> {
        match (&self.api_url, &self.api_key) {
            (Some(url), Some(key)) => Ok(BackendConfig::new(url, key)),
            _ => anyhow::bail!(
                "STUDYSHARE_API_URL and STUDYSHARE_API_KEY must be set (or pass --offline)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_format, "text");
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.coalesce_window, Duration::from_millis(250));
        assert!(config.backend().is_err());
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = Config::from_lookup(lookup(&[
            ("STUDYSHARE_API_URL", "https://demo.supabase.co"),
            ("STUDYSHARE_API_KEY", "anon"),
            ("STUDYSHARE_DEBOUNCE_MS", "120"),
            ("STUDYSHARE_COALESCE_MS", "soon"),
            ("STUDYSHARE_LOG_FORMAT", "json"),
        ]));
        assert_eq!(config.debounce, Duration::from_millis(120));
        assert_eq!(config.coalesce_window, Duration::from_millis(250));
        assert_eq!(config.log_format, "json");
        assert_eq!(config.backend().unwrap().rest_url(), "https://demo.supabase.co/rest/v1");
    }
}
