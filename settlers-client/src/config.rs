//! Client configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use settlers_core::Viewport;

/// Settings read at startup; CLI flags override file values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Board layout used until the server names one
    pub map_name: String,
    /// Drawing surface; `None` keeps the variant's native size
    pub viewport: Option<Viewport>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    pub cookie_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            map_name: "base4".to_string(),
            viewport: None,
            log_filter: "info".to_string(),
            cookie_name: "settlers.session".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load from a JSON file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn with_map_name(mut self, map_name: impl Into<String>) -> Self {
        self.map_name = map_name.into();
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.map_name, "base4");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.cookie_name, "settlers.session");
        assert!(config.viewport.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"viewport": {"width": 800, "height": 600}}"#).unwrap();
        assert_eq!(config.map_name, "base4");
        assert_eq!(config.viewport.map(|v| v.width), Some(800.0));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfig::load(Path::new("/nonexistent/settlers.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_map_name("base4")
            .with_log_filter("debug")
            .with_cookie_name("sid");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.cookie_name, "sid");
    }
}
