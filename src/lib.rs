//! # mtmap
//!
//! Map engine pieces for a community roleplay portal's game-map viewer.
//!
//! The centre of the crate is the tile pipeline in [`tiles`]: a resolver that
//! turns tile addresses into asset paths, a retry scheduler that masks missing
//! or flaky assets through backoff, parent-tile fallback and a built-in
//! placeholder, and per-slot lifecycle management so that tiles panned out of
//! view are cancelled cleanly. [`content`] holds the small read-only tables and
//! client-side state the map page is built around.

pub mod content;
pub mod core;
pub mod prelude;
pub mod runtime;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{MapOptions, TileLoadingConfig, TileLoadingProfile},
    geo::{Point, TileAddress, WorldBounds},
    viewport::Viewport,
};

pub use tiles::{
    AssetTileSource, RetryPolicy, RetryScheduler, TileFetcher, TileImage, TileLayer,
    TileLoadFailure, TilePhase, TileRequestState, TileSlot, TileSource, TileTarget,
};

pub use content::{
    i18n::Lang,
    platform::Platform,
    poi::{MapObject, PoiOverlay},
    storage::{KeyValueStore, MemoryStore},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Install `env_logger` as the `log` backend. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
