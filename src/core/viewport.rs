use crate::core::config::MapOptions;
use crate::core::constants::MAX_SUPPORTED_ZOOM;
use crate::core::geo::{Point, TileAddress, WorldBounds};
use crate::Result;
use serde::Serialize;

/// Manages the current view of the game map: center, zoom, and screen dimensions.
///
/// The map uses a flat world coordinate system: both axes run from `0` to
/// `world_size` world units with `y` growing downward. At zoom `z` the whole
/// world spans `tile_size * 2^z` pixels, so zoom 0 fits in a single tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    /// The center of the map view in world units
    pub center: Point,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    min_zoom: f64,
    max_zoom: f64,
    world_size: f64,
    tile_size: u32,
}

impl Viewport {
    /// Creates a new viewport from map options and a screen size in pixels.
    /// Fails if the options do not validate.
    pub fn new(options: &MapOptions, size: Point) -> Result<Self> {
        options.validate()?;
        Ok(Self::from_valid_options(options, size))
    }

    fn from_valid_options(options: &MapOptions, size: Point) -> Self {
        let mut viewport = Self {
            center: options.center,
            zoom: options.zoom as f64,
            size,
            min_zoom: options.min_zoom as f64,
            max_zoom: options.max_zoom as f64,
            world_size: options.world_size,
            tile_size: options.tile_size,
        };
        viewport.set_center(options.center);
        viewport
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    pub fn world_bounds(&self) -> WorldBounds {
        WorldBounds::world(self.world_size)
    }

    /// Sets the center, clamped to the world
    pub fn set_center(&mut self, center: Point) {
        self.center = self.world_bounds().clamp(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.max(self.min_zoom).min(self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Jump straight to a center and zoom
    pub fn fly_to(&mut self, center: Point, zoom: f64) {
        self.set_zoom(zoom);
        self.set_center(center);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.round() + 1.0);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.round() - 1.0);
    }

    /// Pixels per world unit at the given zoom
    pub fn scale_at(&self, zoom: f64) -> f64 {
        self.tile_size as f64 * 2_f64.powf(zoom) / self.world_size
    }

    /// Projects a world point to absolute pixel coordinates at the given zoom level
    pub fn project(&self, point: &Point, zoom: Option<f64>) -> Point {
        point.multiply(self.scale_at(zoom.unwrap_or(self.zoom)))
    }

    /// Unprojects absolute pixel coordinates back to world units
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> Point {
        pixel.multiply(1.0 / self.scale_at(zoom.unwrap_or(self.zoom)))
    }

    /// Converts a world point to container-relative pixels
    pub fn world_to_container(&self, point: &Point) -> Point {
        let offset = self.project(point, None).subtract(&self.project(&self.center, None));
        offset.add(&self.size.multiply(0.5))
    }

    /// Converts container-relative pixels to a world point
    pub fn container_to_world(&self, pixel: &Point) -> Point {
        let offset = pixel.subtract(&self.size.multiply(0.5));
        let absolute = self.project(&self.center, None).add(&offset);
        self.unproject(&absolute, None)
    }

    /// Pans the viewport by a drag of `delta` pixels and returns the world
    /// offset actually applied (smaller than requested at the world edge)
    pub fn pan(&mut self, delta: Point) -> Point {
        let before = self.center;
        let world_delta = delta.multiply(1.0 / self.scale_at(self.zoom));
        self.set_center(before.subtract(&world_delta));
        self.center.subtract(&before)
    }

    /// The integer zoom level whose tiles are displayed
    pub fn tile_zoom(&self) -> u8 {
        self.zoom
            .round()
            .max(self.min_zoom)
            .min(self.max_zoom)
            .clamp(0.0, MAX_SUPPORTED_ZOOM as f64) as u8
    }

    /// Pixel rectangle covered by the screen, expressed at the tile zoom
    pub fn tiled_pixel_bounds(&self, zoom: u8) -> (Point, Point) {
        let scale = 2_f64.powf(self.zoom - zoom as f64);
        let pixel_center = self.project(&self.center, Some(zoom as f64));
        let half_size = Point::new(self.size.x / (scale * 2.0), self.size.y / (scale * 2.0));
        (pixel_center.subtract(&half_size), pixel_center.add(&half_size))
    }

    /// World rectangle covered by the screen, clipped to the world
    pub fn visible_bounds(&self) -> WorldBounds {
        let world = self.world_bounds();
        let top_left = world.clamp(self.container_to_world(&Point::new(0.0, 0.0)));
        let bottom_right = world.clamp(self.container_to_world(&self.size));
        WorldBounds::new(top_left, bottom_right)
    }

    /// Every tile address intersecting the screen at the tile zoom, row-major
    pub fn visible_tiles(&self) -> Vec<TileAddress> {
        let zoom = self.tile_zoom();
        let (min, max) = self.tiled_pixel_bounds(zoom);
        let tile_size = self.tile_size as f64;
        let last = (1i64 << zoom) - 1;

        let clamp = |v: f64| (v as i64).clamp(0, last);
        let (min_col, max_col) = (clamp((min.x / tile_size).floor()), clamp((max.x / tile_size).ceil() - 1.0));
        let (min_row, max_row) = (clamp((min.y / tile_size).floor()), clamp((max.y / tile_size).ceil() - 1.0));

        let mut tiles = Vec::with_capacity(((max_col - min_col + 1) * (max_row - min_row + 1)) as usize);
        for row in min_row..=max_row {
            for column in min_col..=max_col {
                tiles.push(TileAddress::new(zoom, column as u32, row as u32));
            }
        }
        tiles
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_valid_options(&MapOptions::default(), Point::new(512.0, 512.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::default();
        assert_eq!(viewport.zoom, 2.0);
        assert_eq!(viewport.center, Point::new(4096.0, 4096.0));
        assert_eq!(viewport.size.x, 512.0);
    }

    #[test]
    fn test_projection_round_trip_at_zoom_zero() {
        let viewport = Viewport::default();
        let corner = viewport.project(&Point::new(8192.0, 8192.0), Some(0.0));
        assert_eq!(corner, Point::new(256.0, 256.0));
        let back = viewport.unproject(&corner, Some(0.0));
        assert_eq!(back, Point::new(8192.0, 8192.0));
    }

    #[test]
    fn test_container_conversion_centers_on_view() {
        let viewport = Viewport::default();
        let center_pixel = Point::new(256.0, 256.0);
        assert_eq!(viewport.container_to_world(&center_pixel), viewport.center);
        assert_eq!(viewport.world_to_container(&viewport.center), center_pixel);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(-1.0);
        assert_eq!(viewport.zoom, 0.0);
        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 5.0);
        viewport.zoom_out();
        assert_eq!(viewport.zoom, 4.0);
    }

    #[test]
    fn test_pan_is_clamped_to_world() {
        let mut viewport = Viewport::default();
        let moved = viewport.pan(Point::new(10.0, 0.0));
        assert!(moved.x < 0.0);

        viewport.fly_to(Point::new(0.0, 0.0), 2.0);
        let moved = viewport.pan(Point::new(100.0, 100.0));
        assert_eq!(moved, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        let size = Point::new(512.0, 512.0);
        let inverted = MapOptions { zoom: 2, min_zoom: 5, max_zoom: 0, ..MapOptions::default() };
        assert!(Viewport::new(&inverted, size).is_err());

        let too_deep = MapOptions { zoom: 64, max_zoom: 64, ..MapOptions::default() };
        assert!(Viewport::new(&too_deep, size).is_err());

        let viewport = Viewport::new(&MapOptions::default(), size).unwrap();
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn test_visible_tiles_at_deepest_supported_zoom() {
        let options = MapOptions {
            zoom: MAX_SUPPORTED_ZOOM,
            max_zoom: MAX_SUPPORTED_ZOOM,
            ..MapOptions::default()
        };
        let mut viewport = Viewport::new(&options, Point::new(512.0, 512.0)).unwrap();
        viewport.zoom_in();
        assert_eq!(viewport.tile_zoom(), MAX_SUPPORTED_ZOOM);

        let tiles = viewport.visible_tiles();
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.zoom == MAX_SUPPORTED_ZOOM && t.is_valid()));
    }

    #[test]
    fn test_visible_bounds() {
        let mut viewport = Viewport::default();
        // 512px at 1/8 px per unit is 4096 units across
        let bounds = viewport.visible_bounds();
        assert_eq!(bounds.min, Point::new(2048.0, 2048.0));
        assert_eq!(bounds.max, Point::new(6144.0, 6144.0));

        viewport.set_zoom(0.0);
        assert_eq!(viewport.visible_bounds(), viewport.world_bounds());
    }

    #[test]
    fn test_visible_tiles_at_default_view() {
        let viewport = Viewport::default();
        let tiles = viewport.visible_tiles();
        assert_eq!(
            tiles,
            vec![
                TileAddress::new(2, 1, 1),
                TileAddress::new(2, 2, 1),
                TileAddress::new(2, 1, 2),
                TileAddress::new(2, 2, 2),
            ]
        );
    }

    #[test]
    fn test_visible_tiles_are_clamped_to_grid() {
        let mut viewport = Viewport::default();
        viewport.set_zoom(0.0);
        assert_eq!(viewport.visible_tiles(), vec![TileAddress::new(0, 0, 0)]);

        viewport.fly_to(Point::new(0.0, 0.0), 5.0);
        let tiles = viewport.visible_tiles();
        assert!(tiles.iter().all(|t| t.is_valid() && t.zoom == 5));
        assert!(tiles.contains(&TileAddress::new(5, 0, 0)));
    }
}
