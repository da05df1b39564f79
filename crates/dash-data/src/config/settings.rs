//! Settings the renderer starts from

use std::path::{Path, PathBuf};
use std::time::Duration;

use dash_core::DashboardScope;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DataError;

/// Env var naming the settings file
pub const SETTINGS_ENV: &str = "DASH_SETTINGS";
pub const BASE_URL_ENV: &str = "DASH_BASE_URL";
pub const SCOPE_ENV: &str = "DASH_SCOPE";
pub const DASHBOARD_ENV: &str = "DASH_DASHBOARD";

/// Built-in word layout used when no other library is configured
pub const DEFAULT_WORD_CLOUD_LIBRARY: &str = "builtin:spiral";

/// Configuration for one renderer instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Backend root, e.g. `http://localhost:8765/`
    pub base_url: String,

    /// `system` or `workspace:<id>`
    pub scope: String,

    /// Dashboard rendered at startup
    pub dashboard_id: String,

    #[serde(with = "human_duration")]
    pub request_timeout: Duration,

    /// Quiet period before a resize triggers a redraw
    #[serde(with = "human_duration")]
    pub resize_debounce: Duration,

    pub word_cloud_library_url: String,

    #[serde(with = "human_duration")]
    pub library_load_timeout: Duration,

    /// Minimum heatmap column width in points
    pub heatmap_min_col_width: f32,

    /// Read payloads from `{payload_dir}/{dashboard_id}.json` instead of HTTP
    pub payload_dir: Option<PathBuf>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8765/".to_string(),
            scope: "system".to_string(),
            dashboard_id: "overview".to_string(),
            request_timeout: Duration::from_secs(30),
            resize_debounce: Duration::from_millis(100),
            word_cloud_library_url: DEFAULT_WORD_CLOUD_LIBRARY.to_string(),
            library_load_timeout: Duration::from_secs(10),
            heatmap_min_col_width: 14.0,
            payload_dir: None,
        }
    }
}

impl RendererSettings {
    /// Load settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, then the file named by `DASH_SETTINGS`, then env overrides
    pub fn load() -> Result<Self, DataError> {
        let mut settings = match std::env::var(SETTINGS_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("Loading settings from {}", path);
                Self::from_file(path.trim())?
            }
            _ => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(base_url) = get(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(scope) = get(SCOPE_ENV) {
            self.scope = scope;
        }
        if let Some(dashboard_id) = get(DASHBOARD_ENV) {
            self.dashboard_id = dashboard_id;
        }
    }

    pub fn validate(&self) -> Result<(), DataError> {
        self.dashboard_scope()?;
        if self.dashboard_id.trim().is_empty() {
            return Err(DataError::Settings("dashboard_id must not be empty".to_string()));
        }
        if !(self.heatmap_min_col_width > 0.0) {
            return Err(DataError::Settings(format!(
                "heatmap_min_col_width must be positive, got {}",
                self.heatmap_min_col_width
            )));
        }
        Ok(())
    }

    pub fn dashboard_scope(&self) -> Result<DashboardScope, DataError> {
        self.scope.parse().map_err(DataError::Settings)
    }
}

/// Durations as human strings ("100ms", "10s")
mod human_duration {
    use super::*;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(text.trim()).map_err(serde::de::Error::custom)
    }
}
