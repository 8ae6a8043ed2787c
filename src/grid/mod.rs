//! Program grid
//!
//! This module provides the program representation handed to the interpreter:
//! - [`color`]: The color model (hue × lightness, plus white and black)
//! - [`region`]: Segmentation of a grid into same-colored regions
//! - [`notation`]: A plain-text codel notation used by tests and the CLI
//!
//! # Coordinates
//!
//! `x` grows to the right and `y` grows downward; `(0, 0)` is the top-left
//! codel, where execution starts. Cells are stored row-major.

pub mod color;
pub mod notation;
pub mod region;

use color::Color;
use std::fmt;

/// Location of a codel in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A single codel
///
/// The stored position must agree with the cell's slot in the owning [`Grid`];
/// the interpreter refuses to run a grid where it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub color: Color,
}

impl Cell {
    pub fn new(position: Position, color: Color) -> Self {
        Cell { position, color }
    }
}

/// Errors raised while building a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height is zero
    Empty,

    /// Rows of differing lengths
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Cell count does not match `width * height`
    CellCount { expected: usize, got: usize },

    /// Unrecognized token in the text notation (1-based line and column)
    UnknownColor {
        token: String,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "Grid must be at least 1x1"),
            GridError::Ragged { row, expected, got } => {
                write!(
                    f,
                    "Row {} has {} codels, expected {}",
                    row, got, expected
                )
            }
            GridError::CellCount { expected, got } => {
                write!(f, "Expected {} cells, got {}", expected, got)
            }
            GridError::UnknownColor {
                token,
                line,
                column,
            } => {
                write!(
                    f,
                    "Unknown color '{}' at line {}, column {}",
                    token, line, column
                )
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Rectangular grid of codels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from rows of colors, top row first
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    got: row.len(),
                });
            }
            cells.extend(
                row.into_iter()
                    .enumerate()
                    .map(|(x, color)| Cell::new(Position::new(x, y), color)),
            );
        }

        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from caller-made cells in row-major order
    ///
    /// Stored positions are taken as given; a mismatch is reported when the
    /// grid is interpreted, not here.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if cells.len() != width * height {
            return Err(GridError::CellCount {
                expected: width * height,
                got: cells.len(),
            });
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of codels
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Row-major slot of a position (caller guarantees it is in bounds)
    pub(crate) fn index_of(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        if self.contains(pos) {
            self.cells.get(self.index_of(pos))
        } else {
            None
        }
    }

    pub fn color_at(&self, pos: Position) -> Option<Color> {
        self.cell(pos).map(|c| c.color)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// First cell whose stored position disagrees with its slot, if any
    pub fn find_misplaced(&self) -> Option<(Position, Position)> {
        self.cells.iter().enumerate().find_map(|(i, cell)| {
            let slot = Position::new(i % self.width, i / self.width);
            (cell.position != slot).then_some((slot, cell.position))
        })
    }

    /// Copy of this grid with every chromatic hue shifted by `steps`
    pub fn with_hue_shift(&self, steps: i64) -> Grid {
        Grid {
            width: self.width,
            height: self.height,
            cells: self
                .cells
                .iter()
                .map(|c| Cell::new(c.position, c.color.with_hue_shift(steps)))
                .collect(),
        }
    }
}
