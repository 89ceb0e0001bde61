//! Configuration management
//!
//! Settings live in `settings.json` in the rollcall data directory:
//! ```json
//! {
//!   "server": { "baseUrl": "http://127.0.0.1:8000", "timeoutSecs": 30 },
//!   "status": { "dismissAfterMs": 5000 }
//! }
//! ```
//! Keys the client does not manage are kept as they are when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::services::STATUS_DISMISS_AFTER;

/// Server used when neither settings nor environment name one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Overrides `server.baseUrl`
pub const BASE_URL_ENV: &str = "ROLLCALL_BASE_URL";
/// Overrides the data directory
pub const DIR_ENV: &str = "ROLLCALL_DIR";

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    status: StatusSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dismiss_after_ms: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Where a setting's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Default,
    Settings,
    Environment,
}

/// Rollcall configuration (resolved view of settings.json + environment)
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub base_url_source: Source,
    pub timeout: Option<Duration>,
    pub status_dismiss_after: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_url_source: Source::Default,
            timeout: None,
            status_dismiss_after: STATUS_DISMISS_AFTER,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// The server URL can be overridden with `ROLLCALL_BASE_URL` (for
    /// scripts and CI). A settings file that does not parse is ignored.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = match read_settings_text(data_dir)? {
            Some(content) => serde_json::from_str(&content).unwrap_or_default(),
            None => SettingsFile::default(),
        };

        let env_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        let (base_url, base_url_source) = match (env_url, &raw.server.base_url) {
            (Some(url), _) => (url, Source::Environment),
            (None, Some(url)) => (url.clone(), Source::Settings),
            (None, None) => (DEFAULT_BASE_URL.to_string(), Source::Default),
        };

        let status_dismiss_after = raw
            .status
            .dismiss_after_ms
            .map(Duration::from_millis)
            .unwrap_or(STATUS_DISMISS_AFTER);

        Ok(Self {
            base_url,
            base_url_source,
            timeout: raw.server.timeout_secs.map(Duration::from_secs),
            status_dismiss_after,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that the client doesn't manage, so a
    /// settings file that does not parse is left alone and an error returned
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings: SettingsFile = match read_settings_text(data_dir)? {
            Some(content) => serde_json::from_str(&content).with_context(|| {
                format!(
                    "Refusing to overwrite unreadable {}",
                    settings_path(data_dir).display()
                )
            })?,
            None => SettingsFile::default(),
        };

        // An environment override is not something to persist
        if self.base_url_source == Source::Settings {
            settings.server.base_url = Some(self.base_url.clone());
        }
        settings.server.timeout_secs = self.timeout.map(|t| t.as_secs());
        settings.status.dismiss_after_ms = Some(self.status_dismiss_after.as_millis() as u64);

        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(settings_path(data_dir), content)?;
        Ok(())
    }

    /// Point the client at another server. Only http and https are accepted.
    pub fn set_base_url(&mut self, base_url: &str) -> Result<()> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).with_context(|| format!("Invalid server URL: {}", base_url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Server URL must use http or https, got {}", parsed.scheme());
        }

        self.base_url = trimmed.to_string();
        self.base_url_source = Source::Settings;
        Ok(())
    }
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SETTINGS_FILE)
}

fn read_settings_text(data_dir: &Path) -> Result<Option<String>> {
    let path = settings_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(content))
}
