//! Tile pipeline for the map viewer
//!
//! - [`source`] resolves a tile address to an asset URL and its parent
//! - [`scheduler`] drives one address to displayable content through retries,
//!   parent fallback and finally the placeholder
//! - [`slot`] binds a scheduler run to one visual slot and cancels it on recycle
//! - [`layer`] keeps one slot per visible grid cell as the viewport moves

pub mod cache;
pub mod fetcher;
pub mod layer;
pub mod scheduler;
pub mod slot;
pub mod source;
pub mod types;

// Re-exports for convenience
pub use cache::{CachedFetcher, TileCache};
pub use fetcher::{HttpTileFetcher, TileFetcher};
pub use scheduler::{RetryPolicy, RetryScheduler, Step, TilePhase, TileRequestState};
pub use source::{AssetTileSource, TileSource};
pub use types::{TileData, TileImage, TileLoadFailure};
pub use layer::{LayerUpdate, TileLayer};
pub use slot::{TileSlot, TileTarget};
