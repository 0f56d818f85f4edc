use crate::actor::{Actor, ActorBody, Direction, Vec2};
use crate::audio::AudioSink;
use crate::config::{GameConfig, TeleportConfig, TilePos};
use crate::ghost::{Ghost, GhostMode};
use crate::maze::{Maze, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    PowerPelletEaten,
    MazeCleared,
    Died,
}

pub struct Player {
    body: ActorBody,
    next_orientation: Direction,
    score: u32,
    eaten_streak: u32,
    small_pellet_points: u32,
    power_pellet_points: u32,
    ghost_base_points: u32,
    collision_size: f32,
    teleport: TeleportConfig,
}

impl Player {
    pub fn new(config: &GameConfig) -> Player {
        let cell_width = config.maze.cell_width;
        let cell_height = config.maze.cell_height;
        let spawn_tile = config.player.spawn;
        let spawn = Vec2::new(
            spawn_tile.1 as f32 * cell_width + cell_width / 2.0,
            spawn_tile.0 as f32 * cell_height + cell_height / 2.0,
        );
        Player {
            body: ActorBody::new(spawn, config.player.speed, cell_width, cell_height),
            next_orientation: Direction::None,
            score: 0,
            eaten_streak: 0,
            small_pellet_points: config.player.points.small_pellet,
            power_pellet_points: config.player.points.power_pellet,
            ghost_base_points: config.player.points.ghost_base,
            collision_size: config.player.collision_rect_size,
            teleport: config.teleport.clone(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn orientation(&self) -> Direction {
        self.body.orientation
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// One simulation tick: buffer input, move on the grid, eat what is
    /// under the current cell, then test overlap against every ghost.
    pub fn update(
        &mut self,
        dt: f32,
        desired: Direction,
        maze: &mut Maze,
        ghosts: &mut [Ghost],
        audio: &mut dyn AudioSink,
    ) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        if desired != Direction::None {
            self.next_orientation = desired;
        }

        let step = self.body.speed * dt;
        if self.body.align_to_grid_center(step) {
            self.update_waka(maze, audio);
            self.consume_pellet(maze, &mut events);

            // Turns only happen on cell centers; a blocked current heading
            // stops the player dead.
            if self.can_move(self.next_orientation, maze) {
                self.body.orientation = self.next_orientation;
            } else if !self.can_move(self.body.orientation, maze) {
                self.body.orientation = Direction::None;
            }
        }

        self.body.advance(step);
        self.body.handle_teleport(&self.teleport);
        self.check_collisions(ghosts, audio, &mut events);
        events
    }

    fn update_waka(&self, maze: &Maze, audio: &mut dyn AudioSink) {
        let (row, col) = self.body.grid_coordinates();
        let over_pellet = matches!(
            maze.tile_at(row, col),
            TileKind::SmallPellet | TileKind::PowerPellet
        );
        if over_pellet && self.body.orientation != Direction::None {
            audio.play_waka();
        } else {
            audio.stop_waka();
        }
    }

    fn consume_pellet(&mut self, maze: &mut Maze, events: &mut Vec<PlayerEvent>) {
        let (row, col) = self.body.grid_coordinates();
        let Some(kind) = maze.consume_pellet_at(row, col) else {
            return;
        };
        match kind {
            TileKind::SmallPellet => {
                self.score += self.small_pellet_points;
            }
            TileKind::PowerPellet => {
                self.score += self.power_pellet_points;
                self.eaten_streak = 0;
                events.push(PlayerEvent::PowerPelletEaten);
            }
            _ => {}
        }
        if maze.remaining_pellets() == 0 {
            events.push(PlayerEvent::MazeCleared);
        }
    }

    fn can_move(&self, direction: Direction, maze: &Maze) -> bool {
        if direction == Direction::None {
            return true;
        }
        let (row, col) = self.body.grid_coordinates();
        let (dr, dc) = direction.delta();
        !matches!(
            maze.tile_at(row + dr, col + dc),
            TileKind::Wall | TileKind::Doorway
        )
    }

    fn check_collisions(
        &mut self,
        ghosts: &mut [Ghost],
        audio: &mut dyn AudioSink,
        events: &mut Vec<PlayerEvent>,
    ) {
        let player_rect = self.body.collision_rect(self.collision_size);
        for ghost in ghosts.iter_mut() {
            if !player_rect.intersects(&ghost.collision_rect(self.collision_size)) {
                continue;
            }
            match ghost.mode() {
                GhostMode::Vulnerable => {
                    self.eaten_streak += 1;
                    let bonus = self
                        .ghost_base_points
                        .saturating_mul(2u32.saturating_pow(self.eaten_streak));
                    self.score = self.score.saturating_add(bonus);
                    ghost.set_eaten();
                }
                GhostMode::Chase | GhostMode::Scatter => {
                    audio.stop_waka();
                    events.push(PlayerEvent::Died);
                    break;
                }
                // InHouse, Exiting and Eaten ghosts pass through freely.
                _ => {}
            }
        }
    }
}

impl Actor for Player {
    fn reset(&mut self, _now_ms: u64) {
        self.body.reset_position();
        self.next_orientation = Direction::None;
        self.eaten_streak = 0;
    }

    fn grid_tile(&self) -> TilePos {
        self.body.grid_coordinates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::config::MazeConfig;
    use crate::ghost::GhostKind;

    const DT: f32 = 1.0 / 60.0;

    fn config_with_spawn(tile: TilePos) -> GameConfig {
        let mut config = GameConfig::default();
        config.player.spawn = tile;
        config
    }

    fn parse_maze(text: &str) -> Maze {
        Maze::parse(text, &MazeConfig::default()).expect("valid maze")
    }

    fn ghost_in_mode(tile: TilePos, mode: GhostMode) -> Ghost {
        let mut ghost = Ghost::new(GhostKind::Blinky, &GameConfig::default(), 0);
        ghost.body.place_at_tile(tile);
        ghost.mode = mode;
        ghost
    }

    #[test]
    fn small_pellet_awards_points_and_consumes() {
        let mut maze = parse_maze("1 1\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        let mut audio = RecordingAudio::new();

        let events = player.update(DT, Direction::None, &mut maze, &mut [], &mut audio);
        assert!(events.is_empty());
        assert_eq!(player.score(), 10);
        assert_eq!(maze.remaining_pellets(), 1);
    }

    #[test]
    fn power_pellet_resets_streak_and_signals_vulnerability() {
        let mut maze = parse_maze("2 1\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        player.eaten_streak = 3;
        let mut audio = RecordingAudio::new();

        let events = player.update(DT, Direction::None, &mut maze, &mut [], &mut audio);
        assert_eq!(events, vec![PlayerEvent::PowerPelletEaten]);
        assert_eq!(player.eaten_streak, 0);
        assert_eq!(player.score(), 50);
    }

    #[test]
    fn clearing_the_last_pellet_wins() {
        let mut maze = parse_maze("1\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        let mut audio = RecordingAudio::new();

        let events = player.update(DT, Direction::None, &mut maze, &mut [], &mut audio);
        assert_eq!(events, vec![PlayerEvent::MazeCleared]);
        assert_eq!(maze.remaining_pellets(), 0);
    }

    #[test]
    fn eating_ghosts_doubles_the_bonus_per_streak() {
        let mut maze = parse_maze("0 0\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        let mut ghosts = [
            ghost_in_mode((0, 0), GhostMode::Vulnerable),
            ghost_in_mode((0, 0), GhostMode::Vulnerable),
        ];
        let mut audio = RecordingAudio::new();

        let events = player.update(DT, Direction::None, &mut maze, &mut ghosts, &mut audio);
        assert!(events.is_empty());
        // First ghost 100 * 2^1, second 100 * 2^2.
        assert_eq!(player.score(), 600);
        assert_eq!(ghosts[0].mode(), GhostMode::Eaten);
        assert_eq!(ghosts[1].mode(), GhostMode::Eaten);
    }

    #[test]
    fn already_eaten_ghost_awards_nothing() {
        let mut maze = parse_maze("0 0\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        let mut ghosts = [ghost_in_mode((0, 0), GhostMode::Eaten)];
        let mut audio = RecordingAudio::new();

        let events = player.update(DT, Direction::None, &mut maze, &mut ghosts, &mut audio);
        assert!(events.is_empty());
        assert_eq!(player.score(), 0);
        assert_eq!(player.eaten_streak, 0);
    }

    #[test]
    fn touching_a_hunting_ghost_is_fatal() {
        let mut maze = parse_maze("0 0\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        let mut ghosts = [ghost_in_mode((0, 0), GhostMode::Chase)];
        let mut audio = RecordingAudio::new();

        let events = player.update(DT, Direction::None, &mut maze, &mut ghosts, &mut audio);
        assert_eq!(events, vec![PlayerEvent::Died]);
        assert_eq!(audio.last(), Some(&"waka_off"));
    }

    #[test]
    fn adjacent_ghost_does_not_collide() {
        let mut maze = parse_maze("0 0\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        let mut ghosts = [ghost_in_mode((0, 1), GhostMode::Chase)];
        let mut audio = RecordingAudio::new();

        let events = player.update(DT, Direction::None, &mut maze, &mut ghosts, &mut audio);
        assert!(events.is_empty());
    }

    #[test]
    fn buffered_turn_applies_on_alignment() {
        let mut maze = parse_maze("0 0\n0 0\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        let mut audio = RecordingAudio::new();

        player.update(DT, Direction::Down, &mut maze, &mut [], &mut audio);
        assert_eq!(player.orientation(), Direction::Down);
        assert!(player.position().y > 15.0);
    }

    #[test]
    fn blocked_desired_direction_keeps_current_heading() {
        let mut maze = parse_maze("0 0 0\n");
        let mut player = Player::new(&config_with_spawn((0, 1)));
        player.body.orientation = Direction::Right;
        let mut audio = RecordingAudio::new();

        player.update(DT, Direction::Up, &mut maze, &mut [], &mut audio);
        assert_eq!(player.orientation(), Direction::Right);
        // The wish direction stays buffered for later intersections.
        assert_eq!(player.next_orientation, Direction::Up);
    }

    #[test]
    fn fully_blocked_player_stops() {
        let mut maze = parse_maze("0\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        player.body.orientation = Direction::Right;
        player.next_orientation = Direction::Right;
        let mut audio = RecordingAudio::new();

        player.update(DT, Direction::None, &mut maze, &mut [], &mut audio);
        assert_eq!(player.orientation(), Direction::None);
        assert_eq!(player.position(), Vec2::new(15.0, 15.0));
    }

    #[test]
    fn player_never_passes_the_house_doorway() {
        let mut maze = parse_maze("0 9 0\n");
        let mut player = Player::new(&config_with_spawn((0, 0)));
        player.body.orientation = Direction::Right;
        let mut audio = RecordingAudio::new();

        player.update(DT, Direction::Right, &mut maze, &mut [], &mut audio);
        assert_eq!(player.orientation(), Direction::None);
    }

    #[test]
    fn waka_loops_while_moving_over_pellets_and_stops_otherwise() {
        let mut maze = parse_maze("1 1 1\n");
        let mut player = Player::new(&config_with_spawn((0, 1)));
        player.body.orientation = Direction::Right;
        player.next_orientation = Direction::Right;
        let mut audio = RecordingAudio::new();

        player.update(DT, Direction::Right, &mut maze, &mut [], &mut audio);
        assert!(audio.cues.contains(&"waka_on"));

        let mut maze = parse_maze("0 0 0\n");
        let mut idle = Player::new(&config_with_spawn((0, 1)));
        let mut audio = RecordingAudio::new();
        idle.update(DT, Direction::None, &mut maze, &mut [], &mut audio);
        assert_eq!(audio.last(), Some(&"waka_off"));
    }

    #[test]
    fn reset_returns_to_spawn_and_clears_streak() {
        let mut player = Player::new(&config_with_spawn((2, 3)));
        player.score = 170;
        player.eaten_streak = 2;
        player.body.place_at_tile((0, 0));
        player.body.orientation = Direction::Left;

        player.reset(0);
        assert_eq!(player.grid_tile(), (2, 3));
        assert_eq!(player.orientation(), Direction::None);
        assert_eq!(player.eaten_streak, 0);
        // Score survives a lost life.
        assert_eq!(player.score(), 170);
    }
}
