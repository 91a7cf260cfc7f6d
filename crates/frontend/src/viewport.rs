use transit_shared::geo::{self, Position, TileCoord, TILE_SIZE};

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Get the bounding client rect of an element by id.
pub fn element_rect(element_id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(element_id)?;
    Some(element.get_bounding_client_rect())
}

/// A tile image and where its top-left corner lands in the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    /// Address to fetch, with the column wrapped into the world.
    pub coord: TileCoord,
    /// Unwrapped column, distinct per rendered copy of the world.
    pub column: i64,
    pub left: f64,
    pub top: f64,
}

impl TilePlacement {
    pub fn key(&self) -> String {
        format!("{}/{}/{}", self.coord.z, self.column, self.coord.y)
    }
}

/// What part of the world is visible: the center position, the integer zoom
/// level and the container size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Position,
    pub zoom: u8,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: Position, zoom: u8, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// World pixel at the container's top-left corner.
    fn origin(&self) -> (f64, f64) {
        let (cx, cy) = geo::project(self.center, self.zoom);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }

    /// Container pixel for `pos`.
    ///
    /// Longitudes are not wrapped toward the center, so shapes near the
    /// antimeridian render on one side only.
    pub fn to_screen(&self, pos: Position) -> (f64, f64) {
        let (ox, oy) = self.origin();
        let (x, y) = geo::project(pos, self.zoom);
        (x - ox, y - oy)
    }

    /// Position under a container pixel.
    pub fn to_position(&self, x: f64, y: f64) -> Position {
        let (ox, oy) = self.origin();
        geo::unproject(ox + x, oy + y, self.zoom)
    }

    /// Length in pixels of `meters` on the ground at `latitude`.
    pub fn meters_to_px(&self, meters: f64, latitude: f64) -> f64 {
        meters / geo::meters_per_pixel(latitude, self.zoom)
    }

    /// Tiles intersecting the container, row-major from the top-left.
    pub fn visible_tiles(&self) -> Vec<TilePlacement> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec::new();
        }
        let (ox, oy) = self.origin();
        let count = geo::tile_count(self.zoom);

        let first_col = (ox / TILE_SIZE).floor() as i64;
        let last_col = ((ox + self.width) / TILE_SIZE).ceil() as i64 - 1;
        let first_row = ((oy / TILE_SIZE).floor() as i64).max(0);
        let last_row = (((oy + self.height) / TILE_SIZE).ceil() as i64 - 1).min(count - 1);

        let mut tiles = Vec::new();
        for row in first_row..=last_row {
            for column in first_col..=last_col {
                let x = column.rem_euclid(count) as u32;
                tiles.push(TilePlacement {
                    coord: TileCoord::new(x, row as u32, self.zoom),
                    column,
                    left: column as f64 * TILE_SIZE - ox,
                    top: row as f64 * TILE_SIZE - oy,
                });
            }
        }
        tiles
    }

    /// New center after the map content has been dragged by `(dx, dy)` pixels.
    pub fn panned_center(&self, dx: f64, dy: f64) -> Position {
        let (cx, cy) = geo::project(self.center, self.zoom);
        geo::unproject(cx - dx, cy - dy, self.zoom)
    }

    /// New center for `new_zoom` such that the position under the container
    /// pixel `(x, y)` stays under it.
    pub fn zoomed_center(&self, new_zoom: u8, x: f64, y: f64) -> Position {
        let anchor = self.to_position(x, y);
        let (ax, ay) = geo::project(anchor, new_zoom);
        let offset_x = x - self.width / 2.0;
        let offset_y = y - self.height / 2.0;
        geo::unproject(ax - offset_x, ay - offset_y, new_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOSTON: Position = Position::new(42.3601, -71.0589);

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_client_to_container_offset() {
        let (x, y) = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!(approx(x, 130.0, 1e-9));
        assert!(approx(y, 300.0, 1e-9));
    }

    #[test]
    fn test_center_maps_to_container_middle() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        let (x, y) = vp.to_screen(BOSTON);
        assert!(approx(x, 400.0, 1e-6));
        assert!(approx(y, 300.0, 1e-6));
    }

    #[test]
    fn test_screen_position_roundtrip() {
        let vp = Viewport::new(BOSTON, 15, 1024.0, 768.0);
        let pos = vp.to_position(10.0, 700.0);
        let (x, y) = vp.to_screen(pos);
        assert!(approx(x, 10.0, 1e-6));
        assert!(approx(y, 700.0, 1e-6));
    }

    #[test]
    fn test_north_is_up() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        let (_, y_north) = vp.to_screen(Position::new(42.37, -71.0589));
        let (_, y_south) = vp.to_screen(Position::new(42.35, -71.0589));
        assert!(y_north < y_south);
    }

    #[test]
    fn test_meters_to_px_scales_with_zoom() {
        let a = Viewport::new(BOSTON, 13, 800.0, 600.0).meters_to_px(500.0, BOSTON.latitude);
        let b = Viewport::new(BOSTON, 14, 800.0, 600.0).meters_to_px(500.0, BOSTON.latitude);
        assert!(approx(b / a, 2.0, 1e-9));
        // ~14 m/px at z13 in Boston -> 500 m is ~35 px
        assert!(a > 30.0 && a < 40.0);
    }

    #[test]
    fn test_visible_tiles_cover_container() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        let tiles = vp.visible_tiles();
        assert!(!tiles.is_empty());
        let min_left = tiles.iter().map(|t| t.left).fold(f64::INFINITY, f64::min);
        let min_top = tiles.iter().map(|t| t.top).fold(f64::INFINITY, f64::min);
        let max_right = tiles.iter().map(|t| t.left + TILE_SIZE).fold(f64::NEG_INFINITY, f64::max);
        let max_bottom = tiles.iter().map(|t| t.top + TILE_SIZE).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_left <= 0.0 && min_left > -TILE_SIZE);
        assert!(min_top <= 0.0 && min_top > -TILE_SIZE);
        assert!(max_right >= 800.0 && max_right < 800.0 + TILE_SIZE);
        assert!(max_bottom >= 600.0 && max_bottom < 600.0 + TILE_SIZE);
    }

    #[test]
    fn test_visible_tiles_contain_center_tile() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        // Boston Common is tile 2479/3030 at z13
        let tiles = vp.visible_tiles();
        assert!(tiles.iter().any(|t| t.coord == TileCoord::new(2479, 3030, 13)));
    }

    #[test]
    fn test_visible_tiles_wrap_columns() {
        // Whole world at z1 is 512 px; a 1200 px container shows repeated columns
        let vp = Viewport::new(Position::new(0.0, 0.0), 1, 1200.0, 512.0);
        let tiles = vp.visible_tiles();
        assert!(tiles.iter().all(|t| t.coord.x < 2 && t.coord.y < 2));
        assert!(tiles.iter().any(|t| t.column < 0));
        let mut keys: Vec<String> = tiles.iter().map(|t| t.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), tiles.len());
    }

    #[test]
    fn test_visible_tiles_skip_rows_outside_world() {
        let vp = Viewport::new(Position::new(0.0, 0.0), 0, 256.0, 1000.0);
        let tiles = vp.visible_tiles();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].coord, TileCoord::new(0, 0, 0));
    }

    #[test]
    fn test_visible_tiles_empty_container() {
        let vp = Viewport::new(BOSTON, 13, 0.0, 600.0);
        assert!(vp.visible_tiles().is_empty());
    }

    #[test]
    fn test_pan_zero_keeps_center() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        let c = vp.panned_center(0.0, 0.0);
        assert!(approx(c.latitude, BOSTON.latitude, 1e-9));
        assert!(approx(c.longitude, BOSTON.longitude, 1e-9));
    }

    #[test]
    fn test_pan_left_moves_center_east() {
        // z1 world is 512 px wide: 128 px is 90 degrees of longitude
        let vp = Viewport::new(Position::new(0.0, 0.0), 1, 400.0, 400.0);
        let c = vp.panned_center(-128.0, 0.0);
        assert!(approx(c.longitude, 90.0, 1e-9));
        assert!(approx(c.latitude, 0.0, 1e-9));
    }

    #[test]
    fn test_pan_down_moves_center_north() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        let c = vp.panned_center(0.0, 50.0);
        assert!(c.latitude > BOSTON.latitude);
    }

    #[test]
    fn test_zoom_at_center_keeps_center() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        let c = vp.zoomed_center(14, 400.0, 300.0);
        assert!(approx(c.latitude, BOSTON.latitude, 1e-9));
        assert!(approx(c.longitude, BOSTON.longitude, 1e-9));
    }

    #[test]
    fn test_zoom_keeps_cursor_position_fixed() {
        let vp = Viewport::new(BOSTON, 13, 800.0, 600.0);
        let cursor = (120.0, 480.0);
        let under_cursor = vp.to_position(cursor.0, cursor.1);
        let zoomed = Viewport::new(vp.zoomed_center(14, cursor.0, cursor.1), 14, 800.0, 600.0);
        let (x, y) = zoomed.to_screen(under_cursor);
        assert!(approx(x, cursor.0, 1e-6));
        assert!(approx(y, cursor.1, 1e-6));
    }
}
