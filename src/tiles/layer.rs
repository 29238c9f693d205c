//! Tile layer: the arena of slots behind the visible grid
//!
//! The viewport decides which cells are on screen; the layer keeps exactly one
//! [`TileSlot`] per visible cell, starts slots for cells that scroll into view
//! and cancels slots for cells that leave it or belong to an old zoom level.

use std::sync::Arc;

use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

use super::cache::{CachedFetcher, TileCache};
use super::fetcher::TileFetcher;
use super::scheduler::{RetryPolicy, TilePhase};
use super::slot::{TileSlot, TileTarget};
use super::source::{AssetTileSource, TileSource};
use crate::core::config::TileLoadingConfig;
use crate::core::geo::TileAddress;
use crate::core::viewport::Viewport;
use crate::Result;

/// What a call to [`TileLayer::update`] changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerUpdate {
    pub started: usize,
    pub cancelled: usize,
}

pub struct TileLayer {
    source: Arc<dyn TileSource>,
    fetcher: Arc<dyn TileFetcher>,
    target: Arc<dyn TileTarget>,
    policy: RetryPolicy,
    slots: HashMap<TileAddress, TileSlot>,
    tile_zoom: Option<u8>,
}

impl TileLayer {
    pub fn new(
        source: Arc<dyn TileSource>,
        fetcher: Arc<dyn TileFetcher>,
        target: Arc<dyn TileTarget>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            source,
            fetcher,
            target,
            policy,
            slots: HashMap::default(),
            tile_zoom: None,
        }
    }

    /// Build a layer from config: asset paths from `url_template`, successful
    /// loads cached in an LRU of `cache_size` entries in front of `fetcher`
    pub fn from_config(
        config: &TileLoadingConfig,
        fetcher: Arc<dyn TileFetcher>,
        target: Arc<dyn TileTarget>,
    ) -> Result<Self> {
        config.validate()?;
        let source = AssetTileSource::with_template(config.url_template.clone())?;
        let cached = CachedFetcher::new(fetcher, TileCache::new(config.cache_size));
        Ok(Self::new(
            Arc::new(source),
            Arc::new(cached),
            target,
            config.retry_policy(),
        ))
    }

    /// Bring the slots in line with what `viewport` shows
    pub fn update(&mut self, viewport: &Viewport) -> LayerUpdate {
        let zoom = viewport.tile_zoom();
        let visible: HashSet<TileAddress> = viewport.visible_tiles().into_iter().collect();
        let mut update = LayerUpdate::default();

        if self.tile_zoom != Some(zoom) {
            log::debug!("tile zoom {:?} -> {}", self.tile_zoom, zoom);
            self.tile_zoom = Some(zoom);
        }

        self.slots.retain(|address, slot| {
            if visible.contains(address) {
                true
            } else {
                slot.cancel();
                update.cancelled += 1;
                false
            }
        });

        for address in visible {
            if self.slots.contains_key(&address) {
                continue;
            }
            let mut slot = TileSlot::new(
                self.source.clone(),
                self.fetcher.clone(),
                self.target.clone(),
                self.policy,
            );
            slot.start(address);
            self.slots.insert(address, slot);
            update.started += 1;
        }

        if update.started > 0 || update.cancelled > 0 {
            log::debug!(
                "tile layer: {} started, {} cancelled, {} live",
                update.started,
                update.cancelled,
                self.slots.len()
            );
        }
        update
    }

    /// Cancel every slot, as when the map view unmounts
    pub fn destroy(&mut self) {
        for slot in self.slots.values_mut() {
            slot.cancel();
        }
        self.slots.clear();
        self.tile_zoom = None;
    }

    pub fn tile_zoom(&self) -> Option<u8> {
        self.tile_zoom
    }

    pub fn phase(&self, address: &TileAddress) -> Option<TilePhase> {
        self.slots.get(address).map(|slot| slot.phase())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_done()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.len() - self.completed_count()
    }

    /// True once every visible cell shows something
    pub fn is_settled(&self) -> bool {
        self.pending_count() == 0
    }
}

impl Drop for TileLayer {
    fn drop(&mut self) {
        self.destroy();
    }
}
