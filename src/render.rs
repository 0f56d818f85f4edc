use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::actor::Actor;
use crate::ghost::{GhostKind, GhostMode};
use crate::maze::TileKind;
use crate::round::{GamePhase, RoundController};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost,
    Frightened,
    Eyes,
    Wall,
    Door,
    Empty,
    Pellet,
    Power,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_banner: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    rows: usize,
    cols: usize,
}

impl Renderer {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                rows * cols
            ],
            last_hud: String::new(),
            last_banner: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            rows,
            cols,
        }
    }
}

pub fn render(
    stdout: &mut Stdout,
    round: &RoundController,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let needed_h = (renderer.rows + 2) as u16;
    let needed_w = (renderer.cols * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let hud = format!(
        "Score: {}  Lives: {}  Pellets: {}  (q to quit)",
        round.player().score(),
        round.lives(),
        round.maze().remaining_pellets()
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for row in 0..renderer.rows {
        for col in 0..renderer.cols {
            let cell = cell_for(round, row, col);
            let idx = row * renderer.cols + col;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, row, col, cell)?;
            }
        }
    }

    let banner = match round.phase() {
        GamePhase::GameOver => format!("GAME OVER - Final Score: {}", round.player().score()),
        GamePhase::Victory => format!("YOU WIN - Final Score: {}", round.player().score()),
        _ => String::new(),
    };
    if renderer.needs_full || banner != renderer.last_banner {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y + renderer.rows as u16))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&banner))?;
        stdout.queue(ResetColor)?;
        renderer.last_banner = banner;
    }

    renderer.needs_full = false;
    stdout.flush()?;
    Ok(())
}

fn cell_for(round: &RoundController, row: usize, col: usize) -> Cell {
    let tile = (row as i32, col as i32);
    if round.player().grid_tile() == tile {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    for ghost in round.ghosts() {
        if ghost.grid_tile() != tile {
            continue;
        }
        return match ghost.mode() {
            GhostMode::Vulnerable => Cell {
                glyph: Glyph::Frightened,
                color: Color::Blue,
            },
            GhostMode::Eaten => Cell {
                glyph: Glyph::Eyes,
                color: Color::White,
            },
            _ => Cell {
                glyph: Glyph::Ghost,
                color: ghost_color(ghost.kind()),
            },
        };
    }
    match round.maze().tile_at(tile.0, tile.1) {
        TileKind::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        TileKind::Doorway => Cell {
            glyph: Glyph::Door,
            color: Color::Cyan,
        },
        TileKind::Empty => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
        TileKind::SmallPellet => Cell {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        TileKind::PowerPellet => Cell {
            glyph: Glyph::Power,
            color: Color::Magenta,
        },
    }
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Inky => Color::Cyan,
        GhostKind::Clyde => Color::DarkYellow,
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    row: usize,
    col: usize,
    cell: Cell,
) -> io::Result<()> {
    let text = match cell.glyph {
        Glyph::Player => "😃",
        Glyph::Ghost => "👻",
        Glyph::Frightened => "😱",
        Glyph::Eyes => "oo",
        Glyph::Wall => "██",
        Glyph::Door => "==",
        Glyph::Empty => "  ",
        Glyph::Pellet => "· ",
        Glyph::Power => "● ",
    };
    let x_pos = renderer.origin_x + (col * CELL_W) as u16;
    let y_pos = renderer.origin_y + row as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(cell.color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::config::GameConfig;
    use crate::maze::Maze;

    fn test_round() -> RoundController {
        let mut config = GameConfig::default();
        config.player.spawn = (1, 1);
        config.blinky.spawn = (1, 3);
        config.pinky.spawn = (1, 3);
        config.inky.spawn = (1, 3);
        config.clyde.spawn = (1, 3);
        let maze = Maze::parse(
            "3 4 5 6 7\n0 0 1 2 9\n3 3 3 3 3\n",
            &config.maze,
        )
        .expect("valid maze");
        let mut audio = RecordingAudio::new();
        RoundController::new(maze, &config, 0, &mut audio)
    }

    #[test]
    fn actors_cover_the_tiles_they_stand_on() {
        let round = test_round();
        assert!(matches!(cell_for(&round, 1, 1).glyph, Glyph::Player));
        assert!(matches!(cell_for(&round, 1, 3).glyph, Glyph::Ghost));
    }

    #[test]
    fn tiles_map_to_their_glyphs() {
        let round = test_round();
        assert!(matches!(cell_for(&round, 0, 0).glyph, Glyph::Wall));
        assert!(matches!(cell_for(&round, 1, 0).glyph, Glyph::Empty));
        assert!(matches!(cell_for(&round, 1, 2).glyph, Glyph::Pellet));
        assert!(matches!(cell_for(&round, 1, 4).glyph, Glyph::Door));
        assert!(matches!(cell_for(&round, 2, 2).glyph, Glyph::Wall));
    }
}
