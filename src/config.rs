//! Surface configuration.
//!
//! Every constant the surface depends on lives in [`MapConfig`]. A few
//! values can be overridden from the environment with [`MapConfig::from_env`].

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{GuiAlignment, HAlign, Location, Point, VAlign};

pub const ENV_RETRY_DELAY_MS: &str = "POI_MAP_RETRY_DELAY_MS";
pub const ENV_DEFAULT_LEVEL: &str = "POI_MAP_DEFAULT_LEVEL";
pub const ENV_VIEW_NAME: &str = "POI_MAP_VIEW_NAME";

/// Configuration for a single map surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Name the map view is registered under.
    pub view_name: String,
    /// Engine view-info template used to create the map view.
    pub view_info_name: String,
    /// Initial camera position of a freshly created view.
    pub default_position: Location,
    /// Initial zoom level of a freshly created view.
    pub default_level: i32,
    /// Single-point update pushed when the surface first appears.
    pub home_location: Location,
    pub layer_id: String,
    pub style_id: String,
    /// Zoom levels at which the per-level style variants begin.
    pub style_levels: Vec<i32>,
    /// Symbol name of the shared POI icon.
    pub icon_symbol: String,
    /// Delay before re-authenticating after a failure.
    pub retry_delay: Duration,
    pub logo_alignment: GuiAlignment,
    pub logo_offset: Point,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            view_name: "mapview".to_string(),
            view_info_name: "map".to_string(),
            default_position: Location::new(127.108678, 37.402001),
            default_level: 14,
            home_location: Location::new(127.108678, 37.40198),
            layer_id: "PoiLayer".to_string(),
            style_id: "PerLevelStyle".to_string(),
            style_levels: vec![5, 12],
            icon_symbol: "trash".to_string(),
            retry_delay: Duration::from_secs(5),
            logo_alignment: GuiAlignment::new(VAlign::Bottom, HAlign::Left),
            logo_offset: Point::new(20.0, 20.0),
        }
    }
}

impl MapConfig {
    /// Defaults overlaid with any `POI_MAP_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values returned by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_RETRY_DELAY_MS) {
            let ms: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    name: ENV_RETRY_DELAY_MS,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.retry_delay = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_DEFAULT_LEVEL) {
            let level: i32 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    name: ENV_DEFAULT_LEVEL,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !(1..=21).contains(&level) {
                return Err(ConfigError::InvalidValue {
                    name: ENV_DEFAULT_LEVEL,
                    value: raw,
                    reason: "zoom level must be within 1..=21".to_string(),
                });
            }
            config.default_level = level;
        }

        if let Some(raw) = lookup(ENV_VIEW_NAME) {
            let name = raw.trim();
            if name.is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: ENV_VIEW_NAME,
                    value: raw.clone(),
                    reason: "view name must not be empty".to_string(),
                });
            }
            config.view_name = name.to_string();
        }

        Ok(config)
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
