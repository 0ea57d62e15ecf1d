//! # Unified Configuration System
//!
//! All configuration structures for the panel and pooling subsystems live
//! here, so applications load a single file and hand the pieces out.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and debug behaviour
//! - **Panel Config**: popup layering base and popup asset directory
//! - **Pool Config**: default pre-warm size for object pools
//!
//! Every field has a default, so a config file only needs to name the
//! values it overrides.

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};
use crate::foundation::logging::{self, LevelFilter};

/// Layering value that the first shown popup sits just above
pub const POPUP_SORTING_ORDER: i32 = 100;

/// Directory popup templates are loaded from, relative to the asset root
pub const POPUP_ASSET_DIR: &str = "Prefabs/Popup";

/// # Engine Configuration
///
/// Core behavior shared by every subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Configured log level as a filter
    pub fn level_filter(&self) -> LevelFilter {
        logging::parse_level(&self.log_level)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Panel Configuration
///
/// Controls how the panel manager layers and locates popups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Base layering value; a panel at stack depth `d` gets `base + d`
    pub popup_sorting_order: i32,
    /// Directory popup templates are loaded from
    pub popup_asset_dir: String,
}

impl PanelConfig {
    /// Create a panel configuration with the stock values
    pub fn new() -> Self {
        Self {
            popup_sorting_order: POPUP_SORTING_ORDER,
            popup_asset_dir: POPUP_ASSET_DIR.to_string(),
        }
    }

    /// Set the base layering value
    pub fn with_sorting_order(mut self, order: i32) -> Self {
        self.popup_sorting_order = order;
        self
    }

    /// Set the popup asset directory
    pub fn with_asset_dir(mut self, dir: impl Into<String>) -> Self {
        self.popup_asset_dir = dir.into();
        self
    }

    /// Asset path for a popup template name
    pub fn popup_asset_path(&self, name: &str) -> String {
        let dir = self.popup_asset_dir.trim_end_matches('/');
        if dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", dir, name)
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Pool Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Instances fabricated up front when a pool is initialized without an
    /// explicit count
    pub default_prewarm: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { default_prewarm: 0 }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Panel manager configuration
    pub panels: PanelConfig,
    /// Object pool configuration
    pub pools: PoolConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.log_level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::Invalid {
                field: "engine.log_level",
                reason: format!("unknown level '{}'", self.engine.log_level),
            });
        }
        if self.panels.popup_sorting_order < 0 {
            return Err(ConfigError::Invalid {
                field: "panels.popup_sorting_order",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApplicationConfig::default();
        assert_eq!(config.panels.popup_sorting_order, 100);
        assert_eq!(config.panels.popup_asset_path("Settings"), "Prefabs/Popup/Settings");
        assert_eq!(config.pools.default_prewarm, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let text = "[panels]\npopup_sorting_order = 500\n";
        let config = ApplicationConfig::from_str_with_format(text, "ui.toml").unwrap();
        assert_eq!(config.panels.popup_sorting_order, 500);
        assert_eq!(config.panels.popup_asset_dir, POPUP_ASSET_DIR);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_ron() {
        let text = r#"(engine: (log_level: "debug"), pools: (default_prewarm: 4))"#;
        let config = ApplicationConfig::from_str_with_format(text, "ui.ron").unwrap();
        assert_eq!(config.engine.level_filter(), LevelFilter::Debug);
        assert_eq!(config.pools.default_prewarm, 4);
    }

    #[test]
    fn test_unsupported_format() {
        let result = ApplicationConfig::from_str_with_format("{}", "ui.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut config = ApplicationConfig::default();
        config.engine.log_level = "chatty".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "engine.log_level", .. })
        ));
    }

    #[test]
    fn test_asset_path_trims_separator() {
        let panels = PanelConfig::new().with_asset_dir("ui/popups/");
        assert_eq!(panels.popup_asset_path("Shop"), "ui/popups/Shop");
        let flat = PanelConfig::new().with_asset_dir("");
        assert_eq!(flat.popup_asset_path("Shop"), "Shop");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ApplicationConfig::load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(config, ApplicationConfig::default());
    }
}
