//! Configuration for the map view and its tile pipeline
//!
//! Configs can be built from presets through [`TileLoadingProfile`], tweaked
//! field by field, or loaded from JSON. Every entry point validates before the
//! values reach the scheduler.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::constants::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_CACHE_SIZE, DEFAULT_LOAD_TIMEOUT_MS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_URL_TEMPLATE, DEFAULT_ZOOM, MAX_SUPPORTED_ZOOM, MAX_ZOOM, MIN_ZOOM, TILE_SIZE,
    WORLD_SIZE,
};
use crate::core::geo::Point;
use crate::tiles::scheduler::RetryPolicy;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TileLoadingProfile {
    Balanced,
    LowResource,
    HighPerformance,
    Custom(TileLoadingConfig),
}

impl TileLoadingProfile {
    pub fn resolve(&self) -> TileLoadingConfig {
        match self {
            Self::Balanced => TileLoadingConfig::default(),
            Self::LowResource => TileLoadingConfig {
                max_attempts: 2,
                base_delay_ms: 400,
                load_timeout_ms: Some(15_000),
                cache_size: 256,
                ..TileLoadingConfig::default()
            },
            Self::HighPerformance => TileLoadingConfig {
                max_attempts: 5,
                base_delay_ms: 100,
                load_timeout_ms: Some(5_000),
                cache_size: 4096,
                ..TileLoadingConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for TileLoadingProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLoadingConfig {
    /// Failed loads allowed per address before escalating (`R`)
    pub max_attempts: u32,
    /// Backoff base (`D`)
    pub base_delay_ms: u64,
    /// Per-attempt deadline; `None` relies on the fetcher's own failure signal
    pub load_timeout_ms: Option<u64>,
    /// Path pattern with `{z}`, `{x}` (column) and `{y}` (row) placeholders
    pub url_template: String,
    pub cache_size: usize,
}

impl TileLoadingConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            load_timeout: self.load_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(Error::Config(format!(
                    "url_template {:?} is missing {}",
                    self.url_template, placeholder
                )));
            }
        }
        if self.load_timeout_ms == Some(0) {
            return Err(Error::Config("load_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for TileLoadingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            load_timeout_ms: Some(DEFAULT_LOAD_TIMEOUT_MS),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

/// Initial view and limits of the game map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Initial centre in world units
    pub center: Point,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Side of the square world in world units
    pub world_size: f64,
    pub tile_size: u32,
}

impl MapOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(Error::Config(format!(
                "max_zoom {} exceeds the supported maximum {}",
                self.max_zoom, MAX_SUPPORTED_ZOOM
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(Error::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.zoom) {
            return Err(Error::Config(format!(
                "zoom {} outside {}..={}",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.world_size <= 0.0 || self.tile_size == 0 {
            return Err(Error::Config("world_size and tile_size must be positive".into()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: Point::new(WORLD_SIZE / 2.0, WORLD_SIZE / 2.0),
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            world_size: WORLD_SIZE,
            tile_size: TILE_SIZE,
        }
    }
}
