use std::io::{self, Stdout};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pacmaze::actor::Direction;
use pacmaze::audio::NullAudio;
use pacmaze::config::GameConfig;
use pacmaze::maze::Maze;
use pacmaze::render::{render, Renderer};
use pacmaze::round::{RoundController, RoundSignal};

const DEFAULT_TICK_MS: u64 = 16;
const DEFAULT_RENDER_FPS: u64 = 120;
const INPUT_HOLD_MS: u64 = 160;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Maze layout file (whitespace-separated tile codes).
    #[arg(long, default_value = "mazes/classic.txt")]
    maze: PathBuf,
    /// Optional JSON config; absent keys use built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    tick_ms: Option<u64>,
    #[arg(long)]
    fps: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref());
    let maze = Maze::load(&cli.maze, &config.maze)
        .with_context(|| format!("loading maze {}", cli.maze.display()))?;
    let (tick_ms, render_fps) = read_speed_settings(&cli);
    debug!("audio backend unavailable in the terminal build, using silent sink");

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config, maze, tick_ms, render_fps);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result.context("game loop failed")
}

fn run(
    stdout: &mut Stdout,
    config: &GameConfig,
    maze: Maze,
    tick_ms: u64,
    render_fps: u64,
) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut audio = NullAudio;
    let start = Instant::now();
    let mut round = RoundController::new(maze, config, 0, &mut audio);
    let mut renderer = Renderer::new(round.maze().rows(), round.maze().cols());

    let mut last_tick = Instant::now();
    let mut last_seen: [Option<Instant>; 4] = [None, None, None, None];
    let mut last_pressed: Option<Direction> = None;
    let dt = tick_ms as f32 / 1000.0;
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Up | KeyCode::Char('k') => {
                        press(&mut last_seen, &mut last_pressed, Direction::Up)
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        press(&mut last_seen, &mut last_pressed, Direction::Down)
                    }
                    KeyCode::Left | KeyCode::Char('h') => {
                        press(&mut last_seen, &mut last_pressed, Direction::Left)
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        press(&mut last_seen, &mut last_pressed, Direction::Right)
                    }
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(tick_ms) {
            last_tick = Instant::now();
            let now_ms = start.elapsed().as_millis() as u64;
            let desired = active_dir_recent(&last_seen, last_pressed);
            let signal = round.update(now_ms, dt, desired, &mut rng, &mut audio);
            render(stdout, &round, &mut renderer)?;
            if signal == RoundSignal::Quit {
                return Ok(());
            }
        } else {
            render(stdout, &round, &mut renderer)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn read_speed_settings(cli: &Cli) -> (u64, u64) {
    let tick_ms = cli
        .tick_ms
        .or_else(|| {
            std::env::var("PACMAZE_TICK_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
        })
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let render_fps = cli
        .fps
        .or_else(|| {
            std::env::var("PACMAZE_FPS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
        })
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    (tick_ms, render_fps)
}

fn press(
    last_seen: &mut [Option<Instant>; 4],
    last_pressed: &mut Option<Direction>,
    dir: Direction,
) {
    if let Some(idx) = idx_for_dir(dir) {
        last_seen[idx] = Some(Instant::now());
        *last_pressed = Some(dir);
    }
}

/// Approximates "currently held direction" from discrete key events: the
/// last pressed key wins while fresh, otherwise the most recent one still
/// inside the hold window.
fn active_dir_recent(
    last_seen: &[Option<Instant>; 4],
    last_pressed: Option<Direction>,
) -> Direction {
    let now = Instant::now();
    if let Some(dir) = last_pressed {
        if let Some(t) = idx_for_dir(dir).and_then(|idx| last_seen[idx]) {
            if now.duration_since(t) <= Duration::from_millis(INPUT_HOLD_MS) {
                return dir;
            }
        }
    }
    let mut best: Option<(Direction, Instant)> = None;
    for (idx, dir) in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]
    .iter()
    .enumerate()
    {
        if let Some(t) = last_seen[idx] {
            if now.duration_since(t) <= Duration::from_millis(INPUT_HOLD_MS) {
                match best {
                    None => best = Some((*dir, t)),
                    Some((_, bt)) if t > bt => best = Some((*dir, t)),
                    _ => {}
                }
            }
        }
    }
    best.map(|(dir, _)| dir).unwrap_or(Direction::None)
}

fn idx_for_dir(dir: Direction) -> Option<usize> {
    match dir {
        Direction::Up => Some(0),
        Direction::Down => Some(1),
        Direction::Left => Some(2),
        Direction::Right => Some(3),
        Direction::None => None,
    }
}
