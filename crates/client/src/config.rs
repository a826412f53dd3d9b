//! Client configuration.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the backend API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the `/auth/*` paths are joined onto, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// Read configuration from the environment, falling back to defaults.
    ///
    /// `CREWDECK_API_URL` overrides the base URL.
    pub fn from_env() -> Self {
        match std::env::var("CREWDECK_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => {
                tracing::debug!("CREWDECK_API_URL not set; using default base URL");
                Self::default()
            }
        }
    }
}
