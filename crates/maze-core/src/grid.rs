use serde::{Deserialize, Serialize};

/// A cell coordinate: `row` counts down from the top, `col` counts
/// right from the left, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur constructing or reading a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Dimensions outside the supported range
    InvalidSize { rows: usize, cols: usize },
    /// Cell coordinate outside the grid
    OutOfRange { row: usize, col: usize },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSize { rows, cols } => {
                write!(f, "invalid maze size {}x{}", rows, cols)
            }
            Self::OutOfRange { row, col } => {
                write!(f, "cell ({}, {}) out of range", row, col)
            }
        }
    }
}

/// A rectangular maze as two boundary matrices.
///
/// `right_walls[r][c]` blocks movement from (r, c) to (r, c+1);
/// `bottom_walls[r][c]` blocks movement from (r, c) to (r+1, c).
/// Both are stored as flat row-major buffers. A finished maze always
/// has its rightmost column of right walls and bottom row of bottom
/// walls closed; the open transitions form a spanning tree over the
/// cells (the perfect-maze property the solver relies on).
///
/// Grids are built once (by the generator or the file loader) and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) right_walls: Vec<bool>,
    pub(crate) bottom_walls: Vec<bool>,
}

impl Grid {
    /// Create a grid with every wall open. Fails with `InvalidSize`
    /// if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> GridResult<Self> {
        if rows < 1 || cols < 1 {
            return Err(GridError::InvalidSize { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            right_walls: vec![false; rows * cols],
            bottom_walls: vec![false; rows * cols],
        })
    }

    /// Build a grid from pre-computed wall matrices (used by the file
    /// loader and by tests). The buffers must be row-major with
    /// exactly `rows * cols` entries each.
    pub fn from_walls(
        rows: usize,
        cols: usize,
        right_walls: Vec<bool>,
        bottom_walls: Vec<bool>,
    ) -> GridResult<Self> {
        if rows < 1 || cols < 1 {
            return Err(GridError::InvalidSize { rows, cols });
        }
        if right_walls.len() != rows * cols || bottom_walls.len() != rows * cols {
            return Err(GridError::InvalidSize { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            right_walls,
            bottom_walls,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether movement from `pos` to the cell on its right is blocked.
    pub fn right_wall(&self, pos: Position) -> GridResult<bool> {
        self.check(pos)?;
        Ok(self.right_walls[self.idx(pos.row, pos.col)])
    }

    /// Whether movement from `pos` to the cell below it is blocked.
    pub fn bottom_wall(&self, pos: Position) -> GridResult<bool> {
        self.check(pos)?;
        Ok(self.bottom_walls[self.idx(pos.row, pos.col)])
    }

    fn check(&self, pos: Position) -> GridResult<()> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return Err(GridError::OutOfRange {
                row: pos.row,
                col: pos.col,
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub(crate) fn right_at(&self, row: usize, col: usize) -> bool {
        self.right_walls[self.idx(row, col)]
    }

    #[inline]
    pub(crate) fn bottom_at(&self, row: usize, col: usize) -> bool {
        self.bottom_walls[self.idx(row, col)]
    }
}
