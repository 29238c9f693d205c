//! Prelude module for common mtmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mtmap::prelude::*;`

pub use crate::core::{
    config::{MapOptions, TileLoadingConfig, TileLoadingProfile},
    geo::{Point, TileAddress, WorldBounds},
    viewport::Viewport,
};

pub use crate::tiles::{
    AssetTileSource, CachedFetcher, HttpTileFetcher, LayerUpdate, RetryPolicy, RetryScheduler,
    Step, TileCache, TileData, TileFetcher, TileImage, TileLayer, TileLoadFailure, TilePhase,
    TileRequestState, TileSlot, TileSource, TileTarget,
};

pub use crate::content::{
    translate, KeyValueStore, Lang, MapObject, MemoryStore, Platform, PoiOverlay, SearchOutcome,
};

pub use crate::runtime::{init_runtime, runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::{Error as MapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
