use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// A maze tile address as (row, col). Signed so that chase targets computed
/// by offset/reflection may land outside the grid.
pub type TilePos = (i32, i32);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub environment: EnvironmentConfig,
    pub maze: MazeConfig,
    pub player: PlayerConfig,
    pub ghost: GhostConfig,
    pub teleport: TeleportConfig,
    pub blinky: BlinkyConfig,
    pub pinky: PinkyConfig,
    pub inky: InkyConfig,
    pub clyde: ClydeConfig,
}

impl GameConfig {
    /// Reads a JSON config file. Missing files, malformed JSON and absent
    /// keys all fall back to the documented defaults; this never fails.
    pub fn load(path: Option<&Path>) -> GameConfig {
        let Some(path) = path else {
            return GameConfig::default();
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), %err, "config file unreadable, using defaults");
                return GameConfig::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "config file malformed, using defaults");
                GameConfig::default()
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub initial_lives: u32,
    pub durations_ms: DurationsConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            durations_ms: DurationsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DurationsConfig {
    pub scatter: u64,
    pub chase: u64,
    pub vulnerable: u64,
    pub game_over_screen: u64,
    pub life_loss_pause: u64,
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            scatter: 7_000,
            chase: 20_000,
            vulnerable: 7_000,
            game_over_screen: 4_000,
            life_loss_pause: 1_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub cell_width: f32,
    pub cell_height: f32,
    pub door_code: u8,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            cell_width: 30.0,
            cell_height: 30.0,
            door_code: 9,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    pub spawn: TilePos,
    pub collision_rect_size: f32,
    pub points: PointsConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 120.0,
            spawn: (18, 15),
            collision_rect_size: 20.0,
            points: PointsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PointsConfig {
    pub small_pellet: u32,
    pub power_pellet: u32,
    pub ghost_base: u32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            small_pellet: 10,
            power_pellet: 50,
            ghost_base: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GhostConfig {
    pub normal_speed: f32,
    pub eaten_speed: f32,
    pub respawn_delay_ms: u64,
    pub house_exit: TilePos,
    pub house_door: TilePos,
    pub house_wait: TilePos,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            normal_speed: 120.0,
            eaten_speed: 240.0,
            respawn_delay_ms: 1_500,
            house_exit: (12, 15),
            house_door: (13, 15),
            house_wait: (14, 15),
        }
    }
}

/// Horizontal tunnel bounds in pixels. An actor at or past `min_x` snaps to
/// `wrap_x_min` on the far side, and vice versa. Wrap targets sit strictly
/// inside (min_x, max_x) so a second application is a no-op.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub wrap_x_min: f32,
    pub wrap_x_max: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            min_x: 15.0,
            max_x: 885.0,
            wrap_x_min: 870.0,
            wrap_x_max: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlinkyConfig {
    pub spawn: TilePos,
    pub scatter_target: TilePos,
    pub release_delay_ms: u64,
}

impl Default for BlinkyConfig {
    fn default() -> Self {
        Self {
            spawn: (12, 15),
            scatter_target: (2, 27),
            release_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PinkyConfig {
    pub spawn: TilePos,
    pub scatter_target: TilePos,
    pub initial_exit_delay_ms: u64,
    pub chase_offset: i32,
}

impl Default for PinkyConfig {
    fn default() -> Self {
        Self {
            spawn: (14, 15),
            scatter_target: (2, 2),
            initial_exit_delay_ms: 500,
            chase_offset: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InkyConfig {
    pub spawn: TilePos,
    pub scatter_target: TilePos,
    pub points_to_exit: u32,
    pub chase_offset: i32,
}

impl Default for InkyConfig {
    fn default() -> Self {
        Self {
            spawn: (14, 13),
            scatter_target: (30, 27),
            points_to_exit: 30,
            chase_offset: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClydeConfig {
    pub spawn: TilePos,
    pub scatter_target: TilePos,
    pub points_to_exit: u32,
    pub distance_threshold_sq: i64,
}

impl Default for ClydeConfig {
    fn default() -> Self {
        Self {
            spawn: (14, 17),
            scatter_target: (30, 2),
            points_to_exit: 60,
            distance_threshold_sq: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = GameConfig::load(Some(Path::new("/no/such/config.json")));
        assert_eq!(config.environment.initial_lives, 3);
        assert_eq!(config.environment.durations_ms.chase, 20_000);
        assert_eq!(config.clyde.distance_threshold_sq, 64);
    }

    #[test]
    fn partial_json_overrides_only_named_keys() {
        let config: GameConfig = serde_json::from_str(
            r#"{
                "environment": { "initial_lives": 5 },
                "pinky": { "chase_offset": 6 }
            }"#,
        )
        .expect("valid partial config");
        assert_eq!(config.environment.initial_lives, 5);
        assert_eq!(config.environment.durations_ms.scatter, 7_000);
        assert_eq!(config.pinky.chase_offset, 6);
        assert_eq!(config.pinky.initial_exit_delay_ms, 500);
        assert_eq!(config.player.points.power_pellet, 50);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let dir = std::env::temp_dir();
        let path = dir.join("pacmaze_bad_config_test.json");
        fs::write(&path, "{ not json").expect("temp file writable");
        let config = GameConfig::load(Some(&path));
        assert_eq!(config.ghost.respawn_delay_ms, 1_500);
        let _ = fs::remove_file(&path);
    }
}
