//! Engine-wide constants for the game map and its tile pipeline.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Side length of the game world in world units (both axes).
pub const WORLD_SIZE: f64 = 8192.0;

/// Coarsest zoom level; a single tile covers the whole world.
pub const MIN_ZOOM: u8 = 0;

/// Finest zoom level for which tile assets are published.
pub const MAX_ZOOM: u8 = 5;

/// Highest zoom any map may be configured with; tile columns and rows at
/// this level still fit comfortably in a `u32`.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Zoom the map opens at.
pub const DEFAULT_ZOOM: u8 = 2;

/// Zoom used when jumping to a searched point of interest.
pub const SEARCH_FLY_TO_ZOOM: u8 = 4;

/// Failed loads allowed per tile address before escalating to its parent.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Base backoff delay; retry `k` waits `DEFAULT_BASE_DELAY_MS * 2^(k-1)`.
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Upper bound on a single load attempt before it counts as failed.
pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 10_000;

/// Asset path pattern for map tiles.
pub const DEFAULT_URL_TEMPLATE: &str = "/tiles/{z}/{x}_{y}.png";

/// Number of decoded tile bodies kept in memory.
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Neutral 1x1 transparent PNG shown once every fallback tier is exhausted.
pub const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x04, 0x00, 0x00, 0x00, 0xb5, 0x1c, 0x0c,
    0x02, 0x00, 0x00, 0x00, 0x0b, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64, 0x60, 0x00, 0x00,
    0x00, 0x06, 0x00, 0x02, 0x30, 0x81, 0xd0, 0x2f, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44,
    0xae, 0x42, 0x60, 0x82,
];

/// [`PLACEHOLDER_PNG`] as a `data:` URI for hosts that take image sources as strings.
pub const PLACEHOLDER_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Storage key for the selected interface language.
pub const LANG_STORAGE_KEY: &str = "mtnews-lang";

/// Storage key for the set of enabled map overlays.
pub const MAP_OBJECTS_STORAGE_KEY: &str = "mtnews-map-objects";

/// Prefix for per-category favorites; the category name is appended.
pub const FAVORITES_STORAGE_PREFIX: &str = "mtnews-favorites-";
