use std::time::Duration;

use crate::error::{BackendError, Result};

/// Default timeout for table API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Interval between realtime heartbeats.
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;

/// Where the hosted backend lives and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub api_url: String,
    /// Public (anon) API key sent with every request.
    pub api_key: String,
    pub timeout: Duration,
    pub heartbeat_interval: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_SECS),
        }
    }
}

impl BackendConfig {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            ..Default::default()
        }
    }

    /// Base of the table API: `{api_url}/rest/v1`.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.api_url.trim_end_matches('/'))
    }

    /// Realtime websocket endpoint with the key as query parameter.
    pub fn realtime_url(&self) -> Result<String> {
        let base = self.api_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            return Err(BackendError::invalid_request(format!(
                "API URL must start with http:// or https://, got '{}'",
                self.api_url
            )));
        };
        Ok(format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            ws_base,
            urlencoding::encode(&self.api_key)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = BackendConfig::new("https://demo.supabase.co/", "key+with/chars");
        assert_eq!(config.rest_url(), "https://demo.supabase.co/rest/v1");
        assert_eq!(
            config.realtime_url().unwrap(),
            "wss://demo.supabase.co/realtime/v1/websocket?apikey=key%2Bwith%2Fchars&vsn=1.0.0"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_realtime_url_rejects_unknown_scheme() {
        let config = BackendConfig::new("ftp://demo", "k");
        assert!(config.realtime_url().is_err());
    }
}
