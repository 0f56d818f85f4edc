use rand::seq::SliceRandom;
use rand::Rng;

use crate::actor::{Actor, ActorBody, Direction, Rect, Vec2};
use crate::config::{GameConfig, TeleportConfig, TilePos};
use crate::director::GlobalMode;
use crate::maze::{Maze, TileKind};

const VULNERABLE_SPEED_FACTOR: f32 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostMode {
    InHouse,
    Exiting,
    Chase,
    Scatter,
    Vulnerable,
    Eaten,
}

impl From<GlobalMode> for GhostMode {
    fn from(mode: GlobalMode) -> GhostMode {
        match mode {
            GlobalMode::Scatter => GhostMode::Scatter,
            GlobalMode::Chase => GhostMode::Chase,
        }
    }
}

/// Read-only world snapshot handed to each ghost once per tick. The player
/// and sibling positions are resolved up front by the round controller, so
/// ghosts never scan the actor collection themselves.
pub struct WorldView {
    pub now_ms: u64,
    pub player_tile: TilePos,
    pub player_facing: Direction,
    pub player_score: u32,
    pub blinky_tile: TilePos,
    pub global_mode: GlobalMode,
    pub vulnerable: bool,
}

pub struct Ghost {
    pub(crate) body: ActorBody,
    kind: GhostKind,
    pub(crate) mode: GhostMode,
    start_mode: GhostMode,
    pub(crate) immune: bool,
    exit_deadline_ms: Option<u64>,
    respawn_deadline_ms: u64,
    scatter_target: TilePos,
    chase_offset: i32,
    points_to_exit: u32,
    distance_threshold_sq: i64,
    release_delay_ms: u64,
    initial_exit_delay_ms: u64,
    normal_speed: f32,
    eaten_speed: f32,
    respawn_delay_ms: u64,
    house_exit: TilePos,
    house_door: TilePos,
    house_wait: TilePos,
    teleport: TeleportConfig,
}

impl Ghost {
    pub fn new(kind: GhostKind, config: &GameConfig, now_ms: u64) -> Ghost {
        let (spawn_tile, scatter_target) = match kind {
            GhostKind::Blinky => (config.blinky.spawn, config.blinky.scatter_target),
            GhostKind::Pinky => (config.pinky.spawn, config.pinky.scatter_target),
            GhostKind::Inky => (config.inky.spawn, config.inky.scatter_target),
            GhostKind::Clyde => (config.clyde.spawn, config.clyde.scatter_target),
        };
        let chase_offset = match kind {
            GhostKind::Pinky => config.pinky.chase_offset,
            GhostKind::Inky => config.inky.chase_offset,
            _ => 0,
        };
        let points_to_exit = match kind {
            GhostKind::Inky => config.inky.points_to_exit,
            GhostKind::Clyde => config.clyde.points_to_exit,
            _ => 0,
        };
        let start_mode = match kind {
            // Blinky starts on the maze unless a release delay is configured.
            GhostKind::Blinky if config.blinky.release_delay_ms == 0 => GhostMode::Scatter,
            _ => GhostMode::InHouse,
        };

        let cell_width = config.maze.cell_width;
        let cell_height = config.maze.cell_height;
        let spawn = Vec2::new(
            spawn_tile.1 as f32 * cell_width + cell_width / 2.0,
            spawn_tile.0 as f32 * cell_height + cell_height / 2.0,
        );
        let mut body = ActorBody::new(spawn, config.ghost.normal_speed, cell_width, cell_height);
        body.orientation = Direction::Up;

        let mut ghost = Ghost {
            body,
            kind,
            mode: start_mode,
            start_mode,
            immune: false,
            exit_deadline_ms: None,
            respawn_deadline_ms: 0,
            scatter_target,
            chase_offset,
            points_to_exit,
            distance_threshold_sq: config.clyde.distance_threshold_sq,
            release_delay_ms: config.blinky.release_delay_ms,
            initial_exit_delay_ms: config.pinky.initial_exit_delay_ms,
            normal_speed: config.ghost.normal_speed,
            eaten_speed: config.ghost.eaten_speed,
            respawn_delay_ms: config.ghost.respawn_delay_ms,
            house_exit: config.ghost.house_exit,
            house_door: config.ghost.house_door,
            house_wait: config.ghost.house_wait,
            teleport: config.teleport.clone(),
        };
        ghost.arm_exit_timer(now_ms);
        ghost
    }

    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn collision_rect(&self, size: f32) -> Rect {
        self.body.collision_rect(size)
    }

    /// Called by the player on a vulnerable-ghost collision. The immunity
    /// flag keeps the ghost out of Vulnerable for the rest of the window.
    pub fn set_eaten(&mut self) {
        self.mode = GhostMode::Eaten;
        self.immune = true;
    }

    pub fn clear_immunity(&mut self) {
        self.immune = false;
    }

    pub fn update(&mut self, dt: f32, view: &WorldView, maze: &Maze, rng: &mut impl Rng) {
        let previous = self.mode;

        match self.mode {
            GhostMode::InHouse => {
                if view.now_ms >= self.respawn_deadline_ms
                    && self.exit_deadline_ms.map_or(true, |d| view.now_ms >= d)
                    && self.wants_exit(view)
                {
                    self.release();
                }
            }
            GhostMode::Eaten => {
                let (row, col) = self.body.grid_coordinates();
                if (row - self.house_door.0).abs() <= 1 && (col - self.house_door.1).abs() <= 1 {
                    self.body.place_at_tile(self.house_wait);
                    self.body.orientation = Direction::Up;
                    self.mode = GhostMode::InHouse;
                    self.respawn_deadline_ms = view.now_ms + self.respawn_delay_ms;
                }
            }
            GhostMode::Exiting => {
                self.mode = GhostMode::from(view.global_mode);
            }
            _ => {
                if view.vulnerable && !self.immune {
                    self.mode = GhostMode::Vulnerable;
                } else {
                    self.mode = GhostMode::from(view.global_mode);
                }
            }
        }

        // Reversal fires only on the vulnerability edge, never continuously.
        if self.mode != previous
            && (self.mode == GhostMode::Vulnerable || previous == GhostMode::Vulnerable)
            && !matches!(
                previous,
                GhostMode::InHouse | GhostMode::Eaten | GhostMode::Exiting
            )
        {
            self.body.orientation = self.body.orientation.opposite();
        }

        if self.mode != GhostMode::InHouse {
            self.step_movement(dt, view, maze, rng);
        }
    }

    fn release(&mut self) {
        self.body.place_at_tile(self.house_exit);
        self.body.orientation = Direction::Up;
        self.exit_deadline_ms = None;
        self.mode = GhostMode::Exiting;
    }

    fn arm_exit_timer(&mut self, now_ms: u64) {
        self.exit_deadline_ms = match self.kind {
            GhostKind::Blinky if self.release_delay_ms > 0 => Some(now_ms + self.release_delay_ms),
            GhostKind::Pinky => Some(now_ms + self.initial_exit_delay_ms),
            _ => None,
        };
    }

    fn wants_exit(&self, view: &WorldView) -> bool {
        match self.kind {
            GhostKind::Blinky | GhostKind::Pinky => true,
            GhostKind::Inky | GhostKind::Clyde => view.player_score >= self.points_to_exit,
        }
    }

    fn current_step(&self, dt: f32) -> f32 {
        let speed = match self.mode {
            GhostMode::Eaten => self.eaten_speed,
            GhostMode::Vulnerable => self.normal_speed * VULNERABLE_SPEED_FACTOR,
            _ => self.normal_speed,
        };
        speed * dt
    }

    fn step_movement(&mut self, dt: f32, view: &WorldView, maze: &Maze, rng: &mut impl Rng) {
        let step = self.current_step(dt);
        if self.body.align_to_grid_center(step) {
            if !self.can_move(self.body.orientation, maze) || self.is_intersection(maze) {
                self.body.orientation = self.choose_direction(view, maze, rng);
            }
        }
        self.body.advance(step);
        self.body.handle_teleport(&self.teleport);
    }

    fn passable(&self, kind: TileKind) -> bool {
        match kind {
            TileKind::Wall => false,
            TileKind::Doorway => matches!(self.mode, GhostMode::Eaten | GhostMode::Exiting),
            _ => true,
        }
    }

    fn can_move(&self, direction: Direction, maze: &Maze) -> bool {
        if direction == Direction::None {
            return true;
        }
        let (row, col) = self.body.grid_coordinates();
        let (dr, dc) = direction.delta();
        self.passable(maze.tile_at(row + dr, col + dc))
    }

    fn is_intersection(&self, maze: &Maze) -> bool {
        let reverse = self.body.orientation.opposite();
        let open = Direction::MOVES
            .iter()
            .filter(|&&d| d != reverse && self.can_move(d, maze))
            .count();
        open > 1
    }

    fn choose_direction(&self, view: &WorldView, maze: &Maze, rng: &mut impl Rng) -> Direction {
        let reverse = self.body.orientation.opposite();
        let candidates: Vec<Direction> = Direction::MOVES
            .iter()
            .copied()
            .filter(|&d| d != reverse && self.can_move(d, maze))
            .collect();

        if candidates.is_empty() {
            if self.can_move(reverse, maze) {
                return reverse;
            }
            return Direction::None;
        }

        if self.mode == GhostMode::Vulnerable {
            return *candidates.choose(rng).unwrap();
        }

        let target = match self.mode {
            GhostMode::Chase => self.chase_target(view),
            GhostMode::Eaten => self.house_door,
            _ => self.scatter_target,
        };

        let (row, col) = self.body.grid_coordinates();
        let mut best = Direction::None;
        let mut best_dist = i64::MAX;
        for direction in Direction::PRIORITY {
            if !candidates.contains(&direction) {
                continue;
            }
            let (dr, dc) = direction.delta();
            let dist = dist_sq((row + dr, col + dc), target);
            if dist < best_dist {
                best_dist = dist;
                best = direction;
            }
        }
        best
    }

    fn chase_target(&self, view: &WorldView) -> TilePos {
        match self.kind {
            GhostKind::Blinky => view.player_tile,
            GhostKind::Pinky => offset_tile(view.player_tile, view.player_facing, self.chase_offset),
            GhostKind::Inky => {
                let ahead = offset_tile(view.player_tile, view.player_facing, self.chase_offset);
                (
                    2 * ahead.0 - view.blinky_tile.0,
                    2 * ahead.1 - view.blinky_tile.1,
                )
            }
            GhostKind::Clyde => {
                let here = self.body.grid_coordinates();
                if dist_sq(here, view.player_tile) > self.distance_threshold_sq {
                    view.player_tile
                } else {
                    self.scatter_target
                }
            }
        }
    }
}

impl Actor for Ghost {
    fn reset(&mut self, now_ms: u64) {
        self.body.reset_position();
        self.body.orientation = Direction::Up;
        self.mode = self.start_mode;
        self.immune = false;
        self.respawn_deadline_ms = 0;
        self.arm_exit_timer(now_ms);
    }

    fn grid_tile(&self) -> TilePos {
        self.body.grid_coordinates()
    }
}

fn offset_tile(tile: TilePos, facing: Direction, cells: i32) -> TilePos {
    let (dr, dc) = facing.delta();
    (tile.0 + dr * cells, tile.1 + dc * cells)
}

fn dist_sq(a: TilePos, b: TilePos) -> i64 {
    let dr = (a.0 - b.0) as i64;
    let dc = (a.1 - b.1) as i64;
    dr * dr + dc * dc
}
