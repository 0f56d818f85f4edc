use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::MazeConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    Wall,
    Empty,
    SmallPellet,
    PowerPellet,
    Doorway,
}

#[derive(Debug, Error)]
pub enum MazeLoadError {
    #[error("failed to read maze file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("maze file contains no rows")]
    Empty,
    #[error("maze row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("invalid tile code {token:?} on line {line}")]
    InvalidToken { line: usize, token: String },
}

/// The collapsed gameplay matrix derived from a maze file. Wall-shape codes
/// exist only for presentation and fold down to `Wall` here; the pellet
/// cells are the single mutable part.
#[derive(Debug)]
pub struct Maze {
    matrix: Vec<Vec<TileKind>>,
    remaining_pellets: usize,
    rows: usize,
    cols: usize,
    cell_width: f32,
    cell_height: f32,
}

impl Maze {
    pub fn load(path: &Path, config: &MazeConfig) -> Result<Maze, MazeLoadError> {
        let text = fs::read_to_string(path).map_err(|source| MazeLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Maze::parse(&text, config)
    }

    pub fn parse(text: &str, config: &MazeConfig) -> Result<Maze, MazeLoadError> {
        let mut layout: Vec<Vec<u8>> = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut row = Vec::new();
            for token in line.split_whitespace() {
                let code = token
                    .parse::<u8>()
                    .map_err(|_| MazeLoadError::InvalidToken {
                        line: idx + 1,
                        token: token.to_string(),
                    })?;
                row.push(code);
            }
            layout.push(row);
        }

        if layout.is_empty() {
            return Err(MazeLoadError::Empty);
        }
        let cols = layout[0].len();
        for (idx, row) in layout.iter().enumerate() {
            if row.len() != cols {
                return Err(MazeLoadError::RaggedRow {
                    row: idx,
                    found: row.len(),
                    expected: cols,
                });
            }
        }

        let matrix: Vec<Vec<TileKind>> = layout
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&code| collapse_code(code, config.door_code))
                    .collect()
            })
            .collect();
        let remaining_pellets = matrix
            .iter()
            .flatten()
            .filter(|kind| matches!(kind, TileKind::SmallPellet | TileKind::PowerPellet))
            .count();

        Ok(Maze {
            rows: layout.len(),
            cols,
            matrix,
            remaining_pellets,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
        })
    }

    /// Tile lookup for gameplay. Anything outside the grid reads as a wall.
    pub fn tile_at(&self, row: i32, col: i32) -> TileKind {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return TileKind::Wall;
        }
        self.matrix[row as usize][col as usize]
    }

    /// Clears the pellet under (row, col), if any, and returns what was
    /// eaten. The remaining-pellet counter drops by exactly one per call
    /// that returns `Some` and can never go negative.
    pub fn consume_pellet_at(&mut self, row: i32, col: i32) -> Option<TileKind> {
        let kind = self.tile_at(row, col);
        match kind {
            TileKind::SmallPellet | TileKind::PowerPellet => {
                self.matrix[row as usize][col as usize] = TileKind::Empty;
                self.remaining_pellets -= 1;
                Some(kind)
            }
            _ => None,
        }
    }

    pub fn remaining_pellets(&self) -> usize {
        self.remaining_pellets
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Pixel coordinates of a tile's center.
    pub fn tile_center(&self, tile: (i32, i32)) -> (f32, f32) {
        (
            tile.1 as f32 * self.cell_width + self.cell_width / 2.0,
            tile.0 as f32 * self.cell_height + self.cell_height / 2.0,
        )
    }
}

fn collapse_code(code: u8, door_code: u8) -> TileKind {
    if code == door_code {
        return TileKind::Doorway;
    }
    match code {
        0 => TileKind::Empty,
        1 => TileKind::SmallPellet,
        2 => TileKind::PowerPellet,
        _ => TileKind::Wall,
    }
}
