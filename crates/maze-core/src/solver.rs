use crate::{Grid, Position};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Result type for solve operations
pub type SolveResult<T> = Result<T, SolveError>;

/// Errors that can occur while solving. The validation variants are
/// checked eagerly, in declaration order, before any traversal work;
/// `Unsolvable` is the only runtime failure and means "could not
/// determine an answer within the budget", not a proof that no path
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// Grid has no cells
    InvalidMaze,
    /// Start column outside [0, cols)
    InvalidStartX,
    /// Start row outside [0, rows)
    InvalidStartY,
    /// End column outside [0, cols)
    InvalidEndX,
    /// End row outside [0, rows)
    InvalidEndY,
    /// Start and end are the same cell
    TrivialEndpoints,
    /// Budget exhausted before the target was reached (malformed maze
    /// or too-small budget)
    Unsolvable,
}

impl std::fmt::Display for SolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMaze => write!(f, "maze has no cells"),
            Self::InvalidStartX => write!(f, "start column out of range"),
            Self::InvalidStartY => write!(f, "start row out of range"),
            Self::InvalidEndX => write!(f, "end column out of range"),
            Self::InvalidEndY => write!(f, "end row out of range"),
            Self::TrivialEndpoints => write!(f, "start and end are the same cell"),
            Self::Unsolvable => write!(f, "no path found within the solve budget"),
        }
    }
}

/// Cancellation budget for one solve call.
///
/// On a well-formed (perfect) maze the walker terminates quickly
/// relative to rows * cols; the budget exists so a malformed grid with
/// a cycle cannot hang the caller. `max_steps` is deterministic and
/// always enforced, so tests are not flaky under load; `deadline` is
/// an optional wall-clock bound on top for interactive callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveBudget {
    pub max_steps: usize,
    pub deadline: Option<Duration>,
}

impl Default for SolveBudget {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            deadline: None,
        }
    }
}

impl SolveBudget {
    /// Budget for interactive use: the deterministic cap plus an
    /// 8-second wall-clock deadline.
    pub fn interactive() -> Self {
        Self {
            max_steps: 1_000_000,
            deadline: Some(Duration::from_secs(8)),
        }
    }
}

/// Visitation overlay produced by a solve call: one 0/1 flag per grid
/// cell, 1 for every cell the wall-follower's excursions touched
/// (start and end always included). A visited superset of the unique
/// start-end path, not a shortest path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Solution {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the walker visited `pos`. Out-of-range positions were
    /// never visited.
    pub fn is_visited(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols && self.cells[pos.row * self.cols + pos.col] == 1
    }
}

/// Facing direction of the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// 90 degrees clockwise.
    fn right_of(self) -> Self {
        match self {
            Self::Left => Self::Up,
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
        }
    }

    /// 90 degrees counter-clockwise.
    fn left_of(self) -> Self {
        match self {
            Self::Left => Self::Down,
            Self::Up => Self::Left,
            Self::Right => Self::Up,
            Self::Down => Self::Right,
        }
    }
}

/// Maze solver (right-hand wall following).
///
/// Stateless between calls; each call owns its walker and overlay, so
/// concurrent solves against the same grid need no coordination.
pub struct Solver {
    budget: SolveBudget,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a solver with the default (deterministic) budget.
    pub fn new() -> Self {
        Self {
            budget: SolveBudget::default(),
        }
    }

    /// Create a solver with a custom budget.
    pub fn with_budget(budget: SolveBudget) -> Self {
        Self { budget }
    }

    /// Walk from `start` to `end` hugging the right-hand wall and
    /// return the visitation overlay.
    ///
    /// Wall following only terminates on a simply-connected maze,
    /// which is exactly what the generator guarantees; on a grid with
    /// a cycle the walker can loop forever, so the traversal runs
    /// under the configured budget and fails with `Unsolvable` when
    /// it is exhausted.
    pub fn solve(&self, grid: &Grid, start: Position, end: Position) -> SolveResult<Solution> {
        if grid.rows < 1 || grid.cols < 1 {
            return Err(SolveError::InvalidMaze);
        }
        if start.col >= grid.cols {
            return Err(SolveError::InvalidStartX);
        }
        if start.row >= grid.rows {
            return Err(SolveError::InvalidStartY);
        }
        if end.col >= grid.cols {
            return Err(SolveError::InvalidEndX);
        }
        if end.row >= grid.rows {
            return Err(SolveError::InvalidEndY);
        }
        if start == end {
            return Err(SolveError::TrivialEndpoints);
        }

        let mut walker = Walker::new(grid, start, end);
        let deadline = self.budget.deadline.map(|d| Instant::now() + d);
        let mut steps = 0usize;

        while !walker.at_end() {
            steps += 1;
            if steps > self.budget.max_steps {
                return Err(SolveError::Unsolvable);
            }
            if let Some(at) = deadline {
                if Instant::now() >= at {
                    return Err(SolveError::Unsolvable);
                }
            }

            // Advance along the wall on the right while the way ahead
            // is clear.
            while walker.wall(walker.dir.right_of())
                && !walker.wall(walker.dir)
                && !walker.at_end()
            {
                walker.step();
                steps += 1;
                if steps > self.budget.max_steps {
                    return Err(SolveError::Unsolvable);
                }
            }

            if !walker.wall(walker.dir.right_of()) {
                // Right-hand opening: turn into it, and turn again if
                // the right side is still open (hugs the wall through
                // outside corners).
                walker.turn_right();
                walker.step();
                if !walker.wall(walker.dir.right_of()) {
                    walker.turn_right();
                    walker.step();
                }
            } else {
                // Walled in on the right and ahead: rotate in place.
                walker.turn_left();
            }
        }

        Ok(walker.into_solution())
    }
}

/// Per-call traversal state: position, facing, and the flood-counter
/// overlay. On first visit a cell stores its count of open,
/// still-unvisited neighbors; each revisit decrements it (retreat), so
/// fully explored dead ends drain back to zero and vanish from the
/// final mask.
struct Walker<'a> {
    grid: &'a Grid,
    overlay: Vec<i32>,
    dir: Direction,
    pos: Position,
    start: Position,
    end: Position,
}

impl<'a> Walker<'a> {
    fn new(grid: &'a Grid, start: Position, end: Position) -> Self {
        let mut walker = Self {
            grid,
            overlay: vec![0; grid.rows * grid.cols],
            dir: Direction::Left,
            pos: start,
            start,
            end,
        };
        walker.record_cell();
        walker
    }

    fn at_end(&self) -> bool {
        self.pos == self.end
    }

    /// Whether a wall (or the outer boundary) blocks movement from the
    /// current cell in `dir`. The boundary checks double as protection
    /// against walking off a malformed grid whose outer walls were
    /// left open.
    fn wall(&self, dir: Direction) -> bool {
        let Position { row, col } = self.pos;
        match dir {
            Direction::Left => col == 0 || self.grid.right_at(row, col - 1),
            Direction::Up => row == 0 || self.grid.bottom_at(row - 1, col),
            Direction::Right => col + 1 >= self.grid.cols || self.grid.right_at(row, col),
            Direction::Down => row + 1 >= self.grid.rows || self.grid.bottom_at(row, col),
        }
    }

    fn turn_right(&mut self) {
        self.dir = self.dir.right_of();
    }

    fn turn_left(&mut self) {
        self.dir = self.dir.left_of();
    }

    /// Move one cell in the facing direction and update that cell's
    /// flood counter. No-op once the target is reached.
    fn step(&mut self) {
        if self.at_end() {
            return;
        }
        match self.dir {
            Direction::Left => self.pos.col -= 1,
            Direction::Up => self.pos.row -= 1,
            Direction::Right => self.pos.col += 1,
            Direction::Down => self.pos.row += 1,
        }
        self.record_cell();
    }

    fn record_cell(&mut self) {
        let cols = self.grid.cols;
        let idx = self.pos.row * cols + self.pos.col;
        if self.overlay[idx] == 0 {
            let mut open = 0;
            if !self.wall(Direction::Left) && self.overlay[idx - 1] == 0 {
                open += 1;
            }
            if !self.wall(Direction::Up) && self.overlay[idx - cols] == 0 {
                open += 1;
            }
            if !self.wall(Direction::Right) && self.overlay[idx + 1] == 0 {
                open += 1;
            }
            if !self.wall(Direction::Down) && self.overlay[idx + cols] == 0 {
                open += 1;
            }
            self.overlay[idx] = open;
        } else {
            self.overlay[idx] -= 1;
        }
    }

    /// Collapse the counters to a 0/1 mask; start and end are visited
    /// by definition.
    fn into_solution(self) -> Solution {
        let cols = self.grid.cols;
        let mut cells: Vec<u8> = self
            .overlay
            .into_iter()
            .map(|count| u8::from(count != 0))
            .collect();
        cells[self.start.row * cols + self.start.col] = 1;
        cells[self.end.row * cols + self.end.col] = 1;
        Solution {
            rows: self.grid.rows,
            cols,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Generator;

    /// The 10x10 reference maze used across the solver tests.
    fn reference_maze() -> Grid {
        let right = [
            [0, 0, 1, 0, 0, 0, 0, 1, 0, 1],
            [0, 1, 1, 1, 0, 0, 0, 1, 1, 1],
            [1, 0, 1, 0, 0, 1, 1, 1, 1, 1],
            [1, 0, 0, 1, 0, 0, 1, 0, 1, 1],
            [0, 0, 1, 0, 1, 0, 1, 0, 1, 1],
            [1, 0, 0, 0, 0, 1, 1, 0, 1, 1],
            [0, 0, 0, 1, 1, 0, 0, 1, 0, 1],
            [0, 0, 0, 0, 1, 0, 1, 1, 0, 1],
            [1, 0, 0, 0, 1, 1, 1, 0, 0, 1],
            [0, 1, 0, 1, 0, 1, 0, 0, 0, 1],
        ];
        let bottom = [
            [0, 1, 0, 0, 0, 1, 1, 1, 0, 0],
            [1, 1, 0, 0, 1, 1, 1, 0, 0, 0],
            [0, 0, 1, 1, 1, 0, 0, 0, 0, 0],
            [0, 1, 1, 0, 0, 1, 0, 0, 1, 0],
            [1, 0, 1, 1, 1, 0, 1, 1, 1, 0],
            [0, 1, 1, 1, 0, 1, 0, 0, 0, 0],
            [1, 1, 0, 1, 0, 0, 1, 0, 1, 1],
            [0, 1, 1, 1, 1, 0, 0, 0, 1, 0],
            [1, 0, 1, 0, 0, 0, 0, 1, 1, 1],
            [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ];
        grid_from(&right, &bottom)
    }

    fn grid_from(right: &[[u8; 10]; 10], bottom: &[[u8; 10]; 10]) -> Grid {
        let flatten = |m: &[[u8; 10]; 10]| -> Vec<bool> {
            m.iter().flatten().map(|&v| v == 1).collect()
        };
        Grid::from_walls(10, 10, flatten(right), flatten(bottom)).unwrap()
    }

    fn mask(expected: &[[u8; 10]; 10]) -> Vec<u8> {
        expected.iter().flatten().copied().collect()
    }

    #[test]
    fn test_empty_grid_rejected() {
        let empty = Grid {
            rows: 0,
            cols: 0,
            right_walls: Vec::new(),
            bottom_walls: Vec::new(),
        };
        let err = Solver::new().solve(&empty, Position::new(0, 0), Position::new(1, 1));
        assert_eq!(err, Err(SolveError::InvalidMaze));
    }

    #[test]
    fn test_start_column_rejected() {
        let grid = reference_maze();
        let err = Solver::new().solve(&grid, Position::new(0, 10), Position::new(1, 1));
        assert_eq!(err, Err(SolveError::InvalidStartX));
    }

    #[test]
    fn test_start_row_rejected() {
        let grid = reference_maze();
        let err = Solver::new().solve(&grid, Position::new(10, 0), Position::new(1, 1));
        assert_eq!(err, Err(SolveError::InvalidStartY));
    }

    #[test]
    fn test_end_column_rejected() {
        let grid = reference_maze();
        let err = Solver::new().solve(&grid, Position::new(0, 0), Position::new(1, 12));
        assert_eq!(err, Err(SolveError::InvalidEndX));
    }

    #[test]
    fn test_end_row_rejected() {
        let grid = reference_maze();
        let err = Solver::new().solve(&grid, Position::new(0, 0), Position::new(12, 1));
        assert_eq!(err, Err(SolveError::InvalidEndY));
    }

    #[test]
    fn test_same_start_and_end_rejected() {
        let grid = reference_maze();
        let err = Solver::new().solve(&grid, Position::new(0, 0), Position::new(0, 0));
        assert_eq!(err, Err(SolveError::TrivialEndpoints));
    }

    #[test]
    fn test_validation_order() {
        let grid = reference_maze();
        // Both endpoints fully out of range: the start column must be
        // the first violation reported.
        let err = Solver::new().solve(&grid, Position::new(99, 99), Position::new(99, 99));
        assert_eq!(err, Err(SolveError::InvalidStartX));
        // Start valid, end fully out of range: end column first.
        let err = Solver::new().solve(&grid, Position::new(0, 0), Position::new(99, 99));
        assert_eq!(err, Err(SolveError::InvalidEndX));
    }

    #[test]
    fn test_reference_path_center() {
        let grid = reference_maze();
        let solution = Solver::new()
            .solve(&grid, Position::new(0, 0), Position::new(4, 4))
            .unwrap();
        let expected = [
            [1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
            [0, 1, 1, 0, 0, 0, 0, 0, 0, 0],
            [0, 1, 1, 1, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 1, 1, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ];
        assert_eq!(solution.cells, mask(&expected));
    }

    #[test]
    fn test_reference_path_far_corner() {
        let grid = reference_maze();
        let solution = Solver::new()
            .solve(&grid, Position::new(0, 0), Position::new(9, 9))
            .unwrap();
        let expected = [
            [1, 1, 1, 1, 1, 0, 0, 0, 1, 1],
            [0, 0, 1, 1, 1, 1, 1, 1, 1, 1],
            [0, 1, 1, 1, 1, 1, 0, 1, 1, 1],
            [0, 1, 1, 1, 1, 1, 0, 1, 1, 1],
            [0, 0, 0, 1, 1, 0, 0, 0, 0, 1],
            [0, 0, 0, 0, 0, 0, 0, 1, 1, 1],
            [0, 0, 0, 0, 0, 1, 1, 1, 1, 1],
            [0, 0, 0, 0, 0, 1, 1, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 1, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
        ];
        assert_eq!(solution.cells, mask(&expected));
    }

    #[test]
    fn test_reference_path_cross() {
        let grid = reference_maze();
        let solution = Solver::new()
            .solve(&grid, Position::new(0, 7), Position::new(7, 0))
            .unwrap();
        let expected = [
            [0, 0, 0, 1, 1, 1, 1, 1, 0, 0],
            [0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 1, 1, 0, 0, 0],
            [0, 0, 0, 0, 0, 1, 1, 0, 0, 0],
            [0, 0, 0, 0, 1, 1, 0, 0, 0, 0],
            [0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
            [1, 1, 1, 1, 1, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ];
        assert_eq!(solution.cells, mask(&expected));
    }

    #[test]
    fn test_overlay_is_symmetric() {
        let grid = reference_maze();
        let solver = Solver::new();
        for (a, b) in [
            (Position::new(0, 0), Position::new(4, 4)),
            (Position::new(0, 0), Position::new(9, 9)),
            (Position::new(0, 7), Position::new(7, 0)),
        ] {
            let forward = solver.solve(&grid, a, b).unwrap();
            let backward = solver.solve(&grid, b, a).unwrap();
            assert_eq!(forward, backward);
        }
    }

    #[test]
    fn test_solve_is_deterministic() {
        let grid = reference_maze();
        let solver = Solver::new();
        let first = solver
            .solve(&grid, Position::new(0, 0), Position::new(9, 9))
            .unwrap();
        let second = solver
            .solve(&grid, Position::new(0, 0), Position::new(9, 9))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreachable_target_exhausts_budget() {
        let mut grid = reference_maze();
        // Wall off the target cell; the walker now circles its
        // component forever and must hit the step cap.
        let idx = grid.idx(9, 8);
        grid.right_walls[idx] = true;
        let err = Solver::new().solve(&grid, Position::new(0, 0), Position::new(9, 9));
        assert_eq!(err, Err(SolveError::Unsolvable));
    }

    #[test]
    fn test_injected_cycle_exhausts_small_budget() {
        let mut grid = reference_maze();
        // Break the spanning tree: opening an interior wall creates a
        // cycle the right-hand rule can orbit without ever reaching a
        // target outside it.
        let idx = grid.idx(2, 1);
        grid.right_walls[idx] = false;
        let solver = Solver::with_budget(SolveBudget {
            max_steps: 10_000,
            deadline: None,
        });
        // Whatever the walker does, it either finds the target or the
        // deterministic cap stops it; it must never hang.
        let _ = solver.solve(&grid, Position::new(0, 0), Position::new(9, 9));
    }

    #[test]
    fn test_elapsed_deadline_reports_unsolvable() {
        let grid = reference_maze();
        let solver = Solver::with_budget(SolveBudget {
            max_steps: 1_000_000,
            deadline: Some(Duration::ZERO),
        });
        let err = solver.solve(&grid, Position::new(0, 0), Position::new(9, 9));
        assert_eq!(err, Err(SolveError::Unsolvable));
    }

    #[test]
    fn test_generated_mazes_are_solvable() {
        let solver = Solver::new();
        for seed in 0..10 {
            let grid = Generator::with_seed(seed).generate(10, 10).unwrap();
            let start = Position::new(0, 0);
            let end = Position::new(9, 9);
            let solution = solver.solve(&grid, start, end).unwrap();
            assert!(solution.is_visited(start));
            assert!(solution.is_visited(end));
            assert_eq!(solver.solve(&grid, end, start).unwrap(), solution);
        }
    }

    #[test]
    fn test_solution_serde_round_trip() {
        let grid = reference_maze();
        let solution = Solver::new()
            .solve(&grid, Position::new(0, 0), Position::new(4, 4))
            .unwrap();
        let json = serde_json::to_string(&solution).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(solution, back);
    }
}
