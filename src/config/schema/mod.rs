use crate::errors::AgriBidError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_messages_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend root; endpoint paths are appended to it.
    #[serde(default = "default_base_url", rename = "baseUrl")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs", rename = "timeoutSecs")]
    pub timeout_secs: u64,
    /// Per-request timeout for the product message fetch.
    #[serde(
        default = "default_messages_timeout_secs",
        rename = "messagesTimeoutSecs"
    )]
    pub messages_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            messages_timeout_secs: default_messages_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn messages_timeout(&self) -> Duration {
        Duration::from_secs(self.messages_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

fn default_interval_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs", rename = "intervalSecs")]
    pub interval_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Category names shown on the seller dashboard, in display order.
///
/// Matching against product titles is exact, so entries are kept verbatim.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Fruits",
    "Vegetables",
    "Grains",
    "Corn",
    "Rice",
    "Livestock",
    "Poultry",
    "Dairy",
];

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| (*c).to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AgriBidError> {
        self.validate_api()?;
        self.validate_notifier()?;
        self.validate_dashboard()?;
        Ok(())
    }

    fn validate_api(&self) -> Result<(), AgriBidError> {
        let a = &self.api;

        if a.base_url.trim().is_empty() {
            return Err(AgriBidError::Config("api.baseUrl must not be empty".into()));
        }
        match url::Url::parse(&a.base_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {
                if u.scheme() == "http"
                    && !matches!(u.host_str(), Some("localhost" | "127.0.0.1" | "::1"))
                {
                    warn!(
                        "api.baseUrl uses plain http for a remote host; bearer tokens will be sent unencrypted"
                    );
                }
            }
            Ok(u) => {
                return Err(AgriBidError::Config(format!(
                    "api.baseUrl must use http or https, got '{}'",
                    u.scheme()
                )));
            }
            Err(e) => {
                return Err(AgriBidError::Config(format!(
                    "api.baseUrl is not a valid URL: {e}"
                )));
            }
        }
        if a.timeout_secs == 0 {
            return Err(AgriBidError::Config("api.timeoutSecs must be > 0".into()));
        }
        if a.messages_timeout_secs == 0 {
            return Err(AgriBidError::Config(
                "api.messagesTimeoutSecs must be > 0".into(),
            ));
        }
        Ok(())
    }

    fn validate_notifier(&self) -> Result<(), AgriBidError> {
        let n = &self.notifier;
        if n.enabled {
            if n.interval_secs == 0 {
                return Err(AgriBidError::Config(
                    "notifier.intervalSecs must be > 0 when enabled".into(),
                ));
            }
            if n.interval_secs < 5 {
                warn!("Notifier interval is very short (< 5s), this may hammer the backend");
            }
        }
        Ok(())
    }

    fn validate_dashboard(&self) -> Result<(), AgriBidError> {
        let categories = &self.dashboard.categories;
        if categories.is_empty() {
            return Err(AgriBidError::Config(
                "dashboard.categories must list at least one category".into(),
            ));
        }
        let mut seen = HashSet::new();
        for c in categories {
            if c.is_empty() {
                return Err(AgriBidError::Config(
                    "dashboard.categories must not contain empty names".into(),
                ));
            }
            if !seen.insert(c.as_str()) {
                return Err(AgriBidError::Config(format!(
                    "dashboard.categories contains duplicate entry '{c}'"
                )));
            }
            if c.trim() != c {
                warn!(
                    "dashboard category '{}' has surrounding whitespace; only titles with the same spacing will match",
                    c
                );
            }
        }
        Ok(())
    }
}
