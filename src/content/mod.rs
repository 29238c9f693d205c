//! Read-only tables and small persisted client state around the map page

pub mod i18n;
pub mod platform;
pub mod poi;
pub mod storage;

pub use i18n::{translate, Lang, TextDirection};
pub use platform::{Platform, PlatformIcon};
pub use poi::{builtin_map_objects, Highlight, MapObject, Marker, PoiOverlay, SearchOutcome};
pub use storage::{
    favorites_key, load_favorites, load_json, save_json, toggle_favorite, KeyValueStore,
    MemoryStore,
};
