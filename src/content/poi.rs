//! Points-of-interest overlay on the game map
//!
//! Each [`MapObject`] is a category of place (ATMs, hideouts, ...) with an
//! icon and a list of world locations. The overlay tracks which categories
//! the user switched on, persisting that set, and resolves search queries to
//! a highlighted location the map should fly to.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::storage::{load_json, save_json, KeyValueStore};
use crate::core::constants::{MAP_OBJECTS_STORAGE_KEY, SEARCH_FLY_TO_ZOOM};
use crate::core::geo::Point;
use crate::core::viewport::Viewport;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub locations: Vec<Point>,
}

impl MapObject {
    fn new(id: &str, name: &str, icon: &str, locations: &[(f64, f64)]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            locations: locations.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }
}

static BUILTIN_MAP_OBJECTS: Lazy<Vec<MapObject>> = Lazy::new(|| {
    vec![
        MapObject::new(
            "atms",
            "ATMs",
            "https://i.postimg.cc/d1r8N4zJ/atm-machine.png",
            &[(3450.0, 5800.0), (4096.0, 4096.0), (5120.0, 3072.0)],
        ),
        MapObject::new(
            "gas_stations",
            "Gas Stations",
            "https://i.postimg.cc/pT3z3z3G/gas-station.png",
            &[(2048.0, 6144.0), (6144.0, 2048.0), (4500.0, 2500.5)],
        ),
        MapObject::new(
            "hideouts",
            "Hideouts",
            "https://i.postimg.cc/2yFzG3G3/hideout.png",
            &[(1024.0, 1024.0), (7168.0, 7168.0)],
        ),
        MapObject::new(
            "restaurants",
            "Restaurants",
            "https://i.postimg.cc/0j7hSSTJ/restaurant.png",
            &[(3800.0, 3800.0), (5500.0, 4200.0), (2800.0, 5000.0)],
        ),
        MapObject::new(
            "police_stations",
            "Police Stations",
            "https://i.postimg.cc/k47ZfNqC/police-station.png",
            &[(4096.0, 3000.0), (2048.0, 2048.0)],
        ),
    ]
});

/// The map objects shipped with the viewer
pub fn builtin_map_objects() -> &'static [MapObject] {
    &BUILTIN_MAP_OBJECTS
}

#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub object_id: String,
    pub location: Point,
}

/// One marker to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub object_id: String,
    pub name: String,
    pub icon: String,
    pub location: Point,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Empty query; any highlight was removed
    Cleared,
    /// A match; the map should fly to `center` at `zoom`
    Found {
        highlight: Highlight,
        center: Point,
        zoom: u8,
    },
    /// Nothing matched; the previous highlight is kept
    NotFound,
}

impl SearchOutcome {
    /// Move `viewport` to the match, if there is one
    pub fn apply(&self, viewport: &mut Viewport) {
        if let SearchOutcome::Found { center, zoom, .. } = self {
            viewport.fly_to(*center, *zoom as f64);
        }
    }
}

pub struct PoiOverlay {
    objects: Arc<[MapObject]>,
    active: Vec<String>,
    highlight: Option<Highlight>,
    store: Arc<dyn KeyValueStore>,
}

impl PoiOverlay {
    /// Overlay over the built-in objects, restoring the active set from `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_objects(builtin_map_objects().to_vec(), store)
    }

    pub fn with_objects(objects: Vec<MapObject>, store: Arc<dyn KeyValueStore>) -> Self {
        let active = load_json(store.as_ref(), MAP_OBJECTS_STORAGE_KEY, Vec::new());
        Self {
            objects: objects.into(),
            active,
            highlight: None,
            store,
        }
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    /// Switch a category on or off. Returns whether it is active afterwards.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let now_active = match self.active.iter().position(|a| a == id) {
            Some(index) => {
                self.active.remove(index);
                false
            }
            None => {
                self.active.push(id.to_string());
                true
            }
        };
        self.persist()?;
        Ok(now_active)
    }

    pub fn disable_all(&mut self) -> Result<()> {
        self.active.clear();
        self.persist()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|a| a == id)
    }

    pub fn active_ids(&self) -> &[String] {
        &self.active
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    /// Markers for every location of every active object
    pub fn visible_markers(&self) -> Vec<Marker> {
        self.objects
            .iter()
            .filter(|object| self.is_active(&object.id))
            .flat_map(|object| {
                object.locations.iter().map(move |location| Marker {
                    object_id: object.id.clone(),
                    name: object.name.clone(),
                    icon: object.icon.clone(),
                    location: *location,
                    highlighted: self.is_highlighted(&object.id, location),
                })
            })
            .collect()
    }

    /// Markers of active objects that fall inside the viewport
    pub fn markers_in_view(&self, viewport: &Viewport) -> Vec<Marker> {
        let bounds = viewport.visible_bounds();
        self.visible_markers()
            .into_iter()
            .filter(|marker| bounds.contains(&marker.location))
            .collect()
    }

    /// Case-insensitive substring search on object names; the first match in
    /// table order wins and its first location is highlighted
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            self.highlight = None;
            return SearchOutcome::Cleared;
        }

        let found = self
            .objects
            .iter()
            .filter(|object| object.name.to_lowercase().contains(&query))
            .find_map(|object| object.locations.first().map(|location| (object, *location)));

        match found {
            Some((object, location)) => {
                let highlight = Highlight {
                    object_id: object.id.clone(),
                    location,
                };
                self.highlight = Some(highlight.clone());
                SearchOutcome::Found {
                    highlight,
                    center: location,
                    zoom: SEARCH_FLY_TO_ZOOM,
                }
            }
            None => {
                log::debug!("no map object matches {:?}", query);
                SearchOutcome::NotFound
            }
        }
    }

    fn is_highlighted(&self, id: &str, location: &Point) -> bool {
        self.highlight
            .as_ref()
            .map(|h| h.object_id == id && h.location == *location)
            .unwrap_or(false)
    }

    fn persist(&self) -> Result<()> {
        save_json(self.store.as_ref(), MAP_OBJECTS_STORAGE_KEY, &self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::storage::MemoryStore;

    fn overlay() -> (PoiOverlay, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (PoiOverlay::new(store.clone()), store)
    }

    #[test]
    fn test_builtin_table() {
        let ids: Vec<&str> = builtin_map_objects().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["atms", "gas_stations", "hideouts", "restaurants", "police_stations"]
        );
        let gas = &builtin_map_objects()[1];
        assert_eq!(gas.locations[2], Point::new(4500.0, 2500.5));
    }

    #[test]
    fn test_toggle_persists_active_set() {
        let (mut overlay, store) = overlay();
        assert!(overlay.toggle("hideouts").unwrap());
        assert!(overlay.toggle("atms").unwrap());
        assert!(overlay.is_active("hideouts"));
        assert_eq!(
            store.get(MAP_OBJECTS_STORAGE_KEY).as_deref(),
            Some(r#"["hideouts","atms"]"#)
        );

        assert!(!overlay.toggle("hideouts").unwrap());
        assert!(!overlay.is_active("hideouts"));

        let restored = PoiOverlay::new(store.clone());
        assert_eq!(restored.active_ids(), &["atms".to_string()]);
    }

    #[test]
    fn test_corrupt_stored_set_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(MAP_OBJECTS_STORAGE_KEY, "oops".into()).unwrap();
        let overlay = PoiOverlay::new(store);
        assert!(overlay.active_ids().is_empty());
    }

    #[test]
    fn test_disable_all() {
        let (mut overlay, store) = overlay();
        overlay.toggle("atms").unwrap();
        overlay.toggle("restaurants").unwrap();
        overlay.disable_all().unwrap();
        assert!(overlay.visible_markers().is_empty());
        assert_eq!(store.get(MAP_OBJECTS_STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_visible_markers_follow_active_set() {
        let (mut overlay, _) = overlay();
        assert!(overlay.visible_markers().is_empty());

        overlay.toggle("police_stations").unwrap();
        let markers = overlay.visible_markers();
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| m.object_id == "police_stations"));
        assert!(markers.iter().all(|m| !m.highlighted));
    }

    #[test]
    fn test_markers_in_view_are_culled() {
        let (mut overlay, _) = overlay();
        overlay.toggle("hideouts").unwrap();
        overlay.toggle("atms").unwrap();

        // Default view spans 2048..=6144 on both axes
        let mut viewport = Viewport::default();
        let in_view: Vec<_> = overlay
            .markers_in_view(&viewport)
            .into_iter()
            .map(|m| (m.object_id, m.location))
            .collect();
        assert_eq!(
            in_view,
            vec![
                ("atms".to_string(), Point::new(3450.0, 5800.0)),
                ("atms".to_string(), Point::new(4096.0, 4096.0)),
                ("atms".to_string(), Point::new(5120.0, 3072.0)),
            ]
        );

        viewport.set_zoom(0.0);
        assert_eq!(overlay.markers_in_view(&viewport).len(), 5);
    }

    #[test]
    fn test_search_highlights_first_match() {
        let (mut overlay, _) = overlay();
        overlay.toggle("restaurants").unwrap();

        let outcome = overlay.search("  RESTaur ");
        let expected = Highlight {
            object_id: "restaurants".into(),
            location: Point::new(3800.0, 3800.0),
        };
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                highlight: expected.clone(),
                center: Point::new(3800.0, 3800.0),
                zoom: 4,
            }
        );
        assert_eq!(overlay.highlight(), Some(&expected));

        let highlighted: Vec<_> = overlay
            .visible_markers()
            .into_iter()
            .filter(|m| m.highlighted)
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].location, Point::new(3800.0, 3800.0));
    }

    #[test]
    fn test_search_first_match_in_table_order() {
        let (mut overlay, _) = overlay();
        // "s" appears in several names; ATMs comes first
        match overlay.search("s") {
            SearchOutcome::Found { highlight, .. } => assert_eq!(highlight.object_id, "atms"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_search_empty_and_missing() {
        let (mut overlay, _) = overlay();
        overlay.search("hideout");
        assert!(overlay.highlight().is_some());

        assert_eq!(overlay.search("casino"), SearchOutcome::NotFound);
        assert!(overlay.highlight().is_some());

        assert_eq!(overlay.search("   "), SearchOutcome::Cleared);
        assert!(overlay.highlight().is_none());
    }

    #[test]
    fn test_search_outcome_moves_viewport() {
        let (mut overlay, _) = overlay();
        let mut viewport = Viewport::default();
        overlay.search("gas").apply(&mut viewport);
        assert_eq!(viewport.center, Point::new(2048.0, 6144.0));
        assert_eq!(viewport.zoom, 4.0);

        SearchOutcome::NotFound.apply(&mut viewport);
        assert_eq!(viewport.zoom, 4.0);
    }
}
