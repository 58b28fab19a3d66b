// Runtime settings for talking to the Enrichr server.

use crate::error::{EnrichrError, Result};
use std::time::Duration;

/// Default Enrichr server URL when `ENRICHR_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://amp.pharm.mssm.edu/Enrichr";

/// Pause after submission and after export. The server gives no readiness
/// signal, so this fixed wait is all that orders our calls against it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub settle_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl Settings {
    /// Build settings from `ENRICHR_URL` and `ENRICHR_SETTLE_MS`, falling
    /// back to the defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var("ENRICHR_URL").ok(),
            std::env::var("ENRICHR_SETTLE_MS").ok(),
        )
    }

    fn from_vars(url: Option<String>, settle_ms: Option<String>) -> Result<Self> {
        let mut settings = Settings::default();
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            settings.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = settle_ms {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                EnrichrError::Config(format!(
                    "ENRICHR_SETTLE_MS must be a whole number of milliseconds, got '{}'",
                    ms
                ))
            })?;
            settings.settle_delay = Duration::from_millis(ms);
        }
        Ok(settings)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}
