use crate::config::{TeleportConfig, TilePos};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four walkable directions, in the fixed tie-break priority order.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid delta as (d_row, d_col).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::None => (0, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            w: size,
            h: size,
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Position, orientation and movement state shared by the player and the
/// ghosts. Pixel position is owned here; grid coordinates are always derived.
#[derive(Clone, Debug)]
pub struct ActorBody {
    pub position: Vec2,
    pub spawn: Vec2,
    pub orientation: Direction,
    pub speed: f32,
    cell_width: f32,
    cell_height: f32,
}

impl ActorBody {
    pub fn new(spawn: Vec2, speed: f32, cell_width: f32, cell_height: f32) -> Self {
        Self {
            position: spawn,
            spawn,
            orientation: Direction::None,
            speed,
            cell_width,
            cell_height,
        }
    }

    /// Floor-divides the pixel position into a (row, col) tile address.
    /// Lossy by design; the reverse mapping always lands on a cell center.
    pub fn grid_coordinates(&self) -> TilePos {
        (
            (self.position.y / self.cell_height).floor() as i32,
            (self.position.x / self.cell_width).floor() as i32,
        )
    }

    /// If the position is within one movement step of the current cell's
    /// center, snaps to the center and reports alignment.
    pub fn align_to_grid_center(&mut self, step: f32) -> bool {
        let (row, col) = self.grid_coordinates();
        let center_x = col as f32 * self.cell_width + self.cell_width / 2.0;
        let center_y = row as f32 * self.cell_height + self.cell_height / 2.0;

        if (self.position.x - center_x).abs() < step && (self.position.y - center_y).abs() < step {
            self.position.x = center_x;
            self.position.y = center_y;
            return true;
        }
        false
    }

    /// One movement step along the current orientation.
    pub fn advance(&mut self, step: f32) {
        match self.orientation {
            Direction::Up => self.position.y -= step,
            Direction::Down => self.position.y += step,
            Direction::Left => self.position.x -= step,
            Direction::Right => self.position.x += step,
            Direction::None => {}
        }
    }

    /// Horizontal tunnel wrap. Only the x axis teleports, and applying it
    /// twice in a row changes nothing.
    pub fn handle_teleport(&mut self, bounds: &TeleportConfig) {
        if self.position.x <= bounds.min_x {
            self.position.x = bounds.wrap_x_min;
        }
        if self.position.x >= bounds.max_x {
            self.position.x = bounds.wrap_x_max;
        }
    }

    pub fn collision_rect(&self, size: f32) -> Rect {
        Rect::centered(self.position, size)
    }

    pub fn reset_position(&mut self) {
        self.position = self.spawn;
        self.orientation = Direction::None;
    }

    pub fn place_at_tile(&mut self, tile: TilePos) {
        self.position.x = tile.1 as f32 * self.cell_width + self.cell_width / 2.0;
        self.position.y = tile.0 as f32 * self.cell_height + self.cell_height / 2.0;
    }
}

/// The uniform lifecycle contract every actor satisfies: repositioned on
/// round reset, never recreated.
pub trait Actor {
    fn reset(&mut self, now_ms: u64);
    fn grid_tile(&self) -> TilePos;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> ActorBody {
        ActorBody::new(Vec2::new(45.0, 75.0), 120.0, 30.0, 30.0)
    }

    #[test]
    fn grid_coordinates_floor_divide() {
        let mut b = body();
        assert_eq!(b.grid_coordinates(), (2, 1));
        b.position = Vec2::new(29.9, 59.9);
        assert_eq!(b.grid_coordinates(), (1, 0));
        b.position = Vec2::new(30.0, 60.0);
        assert_eq!(b.grid_coordinates(), (2, 1));
    }

    #[test]
    fn alignment_snaps_within_one_step() {
        let mut b = body();
        b.position = Vec2::new(44.2, 75.0);
        assert!(b.align_to_grid_center(2.0));
        assert_eq!(b.position, Vec2::new(45.0, 75.0));

        b.position = Vec2::new(42.0, 75.0);
        assert!(!b.align_to_grid_center(2.0));
        assert_eq!(b.position, Vec2::new(42.0, 75.0));
    }

    #[test]
    fn teleport_wrap_is_idempotent() {
        let bounds = TeleportConfig::default();
        let mut b = body();

        b.position.x = bounds.min_x;
        b.handle_teleport(&bounds);
        assert_eq!(b.position.x, bounds.wrap_x_min);
        b.handle_teleport(&bounds);
        assert_eq!(b.position.x, bounds.wrap_x_min);

        b.position.x = bounds.max_x + 3.0;
        b.handle_teleport(&bounds);
        assert_eq!(b.position.x, bounds.wrap_x_max);
        b.handle_teleport(&bounds);
        assert_eq!(b.position.x, bounds.wrap_x_max);
    }

    #[test]
    fn teleport_only_wraps_horizontally() {
        let bounds = TeleportConfig::default();
        let mut b = body();
        b.position = Vec2::new(400.0, -50.0);
        b.handle_teleport(&bounds);
        assert_eq!(b.position, Vec2::new(400.0, -50.0));
    }

    #[test]
    fn advance_moves_one_step() {
        let mut b = body();
        b.orientation = Direction::Left;
        b.advance(2.0);
        assert_eq!(b.position, Vec2::new(43.0, 75.0));
        b.orientation = Direction::None;
        b.advance(2.0);
        assert_eq!(b.position, Vec2::new(43.0, 75.0));
    }

    #[test]
    fn collision_rects_overlap_and_separate() {
        let a = Rect::centered(Vec2::new(100.0, 100.0), 20.0);
        let near = Rect::centered(Vec2::new(115.0, 100.0), 20.0);
        let far = Rect::centered(Vec2::new(121.0, 100.0), 20.0);
        assert!(a.intersects(&near));
        assert!(!a.intersects(&far));
    }

    #[test]
    fn place_at_tile_lands_on_center() {
        let mut b = body();
        b.place_at_tile((12, 15));
        assert_eq!(b.position, Vec2::new(465.0, 375.0));
    }
}
