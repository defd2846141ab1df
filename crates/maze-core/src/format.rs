//! The two-matrix maze text format:
//!
//! ```text
//! <rows> <cols>
//! <rows lines of cols space-separated 0/1: right_wall matrix>
//! <blank line>
//! <rows lines of cols space-separated 0/1: bottom_wall matrix>
//! ```
//!
//! Parsing is strict: exact token counts, 0/1 values only, matrix
//! shapes matching the header. Violations are reported, never
//! silently recovered.

use crate::generator::MAX_DIM;
use crate::Grid;
use std::path::Path;

/// Result type for format operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors that can occur loading or saving a maze file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The text does not follow the two-matrix layout
    MalformedFile(String),
    /// Underlying I/O failure
    Io(String),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedFile(reason) => write!(f, "malformed maze file: {}", reason),
            Self::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

fn malformed(reason: impl Into<String>) -> FormatError {
    FormatError::MalformedFile(reason.into())
}

/// Parse a maze from its text representation.
pub fn parse(text: &str) -> FormatResult<Grid> {
    let mut lines = text.lines();

    let header = lines.next().ok_or_else(|| malformed("missing header"))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 2 {
        return Err(malformed("header must be two integers: <rows> <cols>"));
    }
    let rows = parse_dim(fields[0], "rows")?;
    let cols = parse_dim(fields[1], "cols")?;

    let right_walls = parse_matrix(&mut lines, rows, cols, "right wall")?;

    match lines.next() {
        Some(sep) if sep.trim().is_empty() => {}
        Some(_) => return Err(malformed("expected blank line between matrices")),
        None => return Err(malformed("missing bottom wall matrix")),
    }

    let bottom_walls = parse_matrix(&mut lines, rows, cols, "bottom wall")?;

    if lines.any(|rest| !rest.trim().is_empty()) {
        return Err(malformed("trailing content after bottom wall matrix"));
    }

    Grid::from_walls(rows, cols, right_walls, bottom_walls)
        .map_err(|e| malformed(e.to_string()))
}

fn parse_dim(field: &str, name: &str) -> FormatResult<usize> {
    let value: usize = field
        .parse()
        .map_err(|_| malformed(format!("{} is not a positive integer: {:?}", name, field)))?;
    if value < 1 || value > MAX_DIM {
        return Err(malformed(format!(
            "{} must be in [1, {}], got {}",
            name, MAX_DIM, value
        )));
    }
    Ok(value)
}

fn parse_matrix<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    rows: usize,
    cols: usize,
    which: &str,
) -> FormatResult<Vec<bool>> {
    let mut walls = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let line = lines
            .next()
            .ok_or_else(|| malformed(format!("{} matrix ends at row {}", which, row)))?;
        let mut count = 0;
        for token in line.split_whitespace() {
            match token {
                "0" => walls.push(false),
                "1" => walls.push(true),
                other => {
                    return Err(malformed(format!(
                        "{} matrix row {}: expected 0 or 1, got {:?}",
                        which, row, other
                    )))
                }
            }
            count += 1;
        }
        if count != cols {
            return Err(malformed(format!(
                "{} matrix row {}: expected {} values, got {}",
                which, row, cols, count
            )));
        }
    }
    Ok(walls)
}

/// Serialize a maze to its text representation.
pub fn render(grid: &Grid) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", grid.rows(), grid.cols()));
    render_matrix(&mut out, grid, &grid.right_walls);
    out.push('\n');
    render_matrix(&mut out, grid, &grid.bottom_walls);
    out
}

fn render_matrix(out: &mut String, grid: &Grid, walls: &[bool]) {
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            out.push(if walls[grid.idx(row, col)] { '1' } else { '0' });
            out.push(' ');
        }
        out.push('\n');
    }
}

/// Load a maze from a file.
pub fn load(path: impl AsRef<Path>) -> FormatResult<Grid> {
    let text = std::fs::read_to_string(path).map_err(|e| FormatError::Io(e.to_string()))?;
    parse(&text)
}

/// Save a maze to a file.
pub fn save(grid: &Grid, path: impl AsRef<Path>) -> FormatResult<()> {
    std::fs::write(path, render(grid)).map_err(|e| FormatError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Generator, Position};

    #[test]
    fn test_render_layout() {
        let grid = Grid::from_walls(
            2,
            2,
            vec![false, true, true, true],
            vec![false, true, true, true],
        )
        .unwrap();
        assert_eq!(render(&grid), "2 2\n0 1 \n1 1 \n\n0 1 \n1 1 \n");
    }

    #[test]
    fn test_parse_round_trip() {
        let grid = Generator::with_seed(9).generate(10, 7).unwrap();
        let text = render(&grid);
        assert_eq!(parse(&text).unwrap(), grid);
    }

    #[test]
    fn test_parse_tolerates_extra_spacing() {
        let text = "1 2\n0  1 \n\n 1 1\n";
        let grid = parse(text).unwrap();
        assert!(!grid.right_wall(Position::new(0, 0)).unwrap());
        assert!(grid.right_wall(Position::new(0, 1)).unwrap());
        assert!(grid.bottom_wall(Position::new(0, 0)).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        for text in [
            "",
            "3\n",
            "3 4 5\n",
            "a 4\n",
            "0 4\n",
            "4 0\n",
            "51 4\n",
            "-1 4\n",
        ] {
            assert!(
                matches!(parse(text), Err(FormatError::MalformedFile(_))),
                "header {:?} must be rejected",
                text
            );
        }
    }

    #[test]
    fn test_parse_rejects_bad_matrices() {
        // Wrong value, short row, long row, missing rows, missing
        // separator, trailing garbage.
        for text in [
            "1 2\n0 2 \n\n0 1 \n",
            "1 2\n0 \n\n0 1 \n",
            "1 2\n0 1 1 \n\n0 1 \n",
            "2 2\n0 1 \n\n0 1 \n1 1 \n",
            "1 2\n0 1 \n0 1 \n",
            "1 2\n0 1 \n\n0 1 \nleftover\n",
        ] {
            assert!(
                matches!(parse(text), Err(FormatError::MalformedFile(_))),
                "input {:?} must be rejected",
                text
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load("/nonexistent/maze.txt"),
            Err(FormatError::Io(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join("maze-core-format-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("maze.txt");

        let grid = Generator::with_seed(11).generate(5, 5).unwrap();
        save(&grid, &path).unwrap();
        assert_eq!(load(&path).unwrap(), grid);
    }
}
