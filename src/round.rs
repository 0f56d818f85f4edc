use rand::Rng;

use crate::actor::{Actor, Direction};
use crate::audio::AudioSink;
use crate::config::GameConfig;
use crate::director::ModeDirector;
use crate::ghost::{Ghost, GhostKind, WorldView};
use crate::maze::Maze;
use crate::player::{Player, PlayerEvent};

/// Index of the pursuer ghost inside the actor table; Inky's reflection
/// target is resolved through it once per tick.
const BLINKY: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Chase,
    Vulnerable,
    GameOver,
    Victory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundSignal {
    Continue,
    Quit,
}

/// Owns the maze, the director and every actor, and drives one round of
/// play: a tick is update(player first, then each ghost) plus the global
/// timers for vulnerability, life-loss freeze and the end screens.
pub struct RoundController {
    maze: Maze,
    player: Player,
    ghosts: Vec<Ghost>,
    director: ModeDirector,
    phase: GamePhase,
    lives: u32,
    vulnerable_duration_ms: u64,
    end_screen_duration_ms: u64,
    life_loss_pause_ms: u64,
    vulnerable_since_ms: u64,
    end_screen_since_ms: u64,
    freeze_until_ms: u64,
    quit_emitted: bool,
}

impl RoundController {
    pub fn new(
        maze: Maze,
        config: &GameConfig,
        now_ms: u64,
        audio: &mut dyn AudioSink,
    ) -> RoundController {
        let ghosts = vec![
            Ghost::new(GhostKind::Blinky, config, now_ms),
            Ghost::new(GhostKind::Pinky, config, now_ms),
            Ghost::new(GhostKind::Inky, config, now_ms),
            Ghost::new(GhostKind::Clyde, config, now_ms),
        ];
        audio.play_chase();
        RoundController {
            maze,
            player: Player::new(config),
            ghosts,
            director: ModeDirector::new(&config.environment.durations_ms, now_ms),
            phase: GamePhase::Chase,
            lives: config.environment.initial_lives,
            vulnerable_duration_ms: config.environment.durations_ms.vulnerable,
            end_screen_duration_ms: config.environment.durations_ms.game_over_screen,
            life_loss_pause_ms: config.environment.durations_ms.life_loss_pause,
            vulnerable_since_ms: 0,
            end_screen_since_ms: 0,
            freeze_until_ms: 0,
            quit_emitted: false,
        }
    }

    pub fn update(
        &mut self,
        now_ms: u64,
        dt: f32,
        input: Direction,
        rng: &mut impl Rng,
        audio: &mut dyn AudioSink,
    ) -> RoundSignal {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Victory) {
            if !self.quit_emitted
                && now_ms.saturating_sub(self.end_screen_since_ms) > self.end_screen_duration_ms
            {
                self.quit_emitted = true;
                return RoundSignal::Quit;
            }
            return RoundSignal::Continue;
        }

        // Life-loss freeze: the event pump keeps running, the round does not.
        if now_ms < self.freeze_until_ms {
            return RoundSignal::Continue;
        }

        if self.phase == GamePhase::Vulnerable
            && now_ms.saturating_sub(self.vulnerable_since_ms) > self.vulnerable_duration_ms
        {
            self.end_vulnerability(audio);
        }
        self.director
            .set_paused(self.phase == GamePhase::Vulnerable, now_ms);
        self.director.update(now_ms);

        // Player moves first; ghosts read its post-movement position below.
        let events = self
            .player
            .update(dt, input, &mut self.maze, &mut self.ghosts, audio);
        let mut died = false;
        for event in events {
            match event {
                PlayerEvent::PowerPelletEaten => self.begin_vulnerability(now_ms, audio),
                PlayerEvent::MazeCleared => {
                    self.handle_victory(now_ms, audio);
                    return RoundSignal::Continue;
                }
                PlayerEvent::Died => died = true,
            }
        }
        if died {
            self.handle_death(now_ms, audio);
            return RoundSignal::Continue;
        }

        let view = self.world_view(now_ms);
        for ghost in self.ghosts.iter_mut() {
            ghost.update(dt, &view, &self.maze, rng);
        }
        RoundSignal::Continue
    }

    fn world_view(&self, now_ms: u64) -> WorldView {
        WorldView {
            now_ms,
            player_tile: self.player.grid_tile(),
            player_facing: self.player.orientation(),
            player_score: self.player.score(),
            blinky_tile: self.ghosts[BLINKY].grid_tile(),
            global_mode: self.director.mode(),
            vulnerable: self.phase == GamePhase::Vulnerable,
        }
    }

    fn begin_vulnerability(&mut self, now_ms: u64, audio: &mut dyn AudioSink) {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Victory) {
            return;
        }
        if self.phase != GamePhase::Vulnerable {
            self.phase = GamePhase::Vulnerable;
            audio.play_vulnerable();
        }
        // A fresh pellet re-stamps the window instead of stacking, and opens
        // a new window for ghosts eaten during the previous one.
        self.vulnerable_since_ms = now_ms;
        for ghost in self.ghosts.iter_mut() {
            ghost.clear_immunity();
        }
    }

    fn end_vulnerability(&mut self, audio: &mut dyn AudioSink) {
        self.phase = GamePhase::Chase;
        audio.play_chase();
        for ghost in self.ghosts.iter_mut() {
            ghost.clear_immunity();
        }
    }

    fn handle_death(&mut self, now_ms: u64, audio: &mut dyn AudioSink) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.freeze_until_ms = now_ms + self.life_loss_pause_ms;
            self.reset_round(now_ms, audio);
        } else {
            self.phase = GamePhase::GameOver;
            self.end_screen_since_ms = now_ms;
        }
    }

    fn handle_victory(&mut self, now_ms: u64, audio: &mut dyn AudioSink) {
        self.phase = GamePhase::Victory;
        audio.stop_waka();
        audio.stop_music();
        self.end_screen_since_ms = now_ms;
    }

    fn reset_round(&mut self, now_ms: u64, audio: &mut dyn AudioSink) {
        self.phase = GamePhase::Chase;
        audio.stop_waka();
        audio.play_chase();
        self.director.reset(now_ms);
        self.player.reset(now_ms);
        for ghost in self.ghosts.iter_mut() {
            ghost.reset(now_ms);
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn director(&self) -> &ModeDirector {
        &self.director
    }
}
