use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use maze_core::{Grid, Position, Solution};
use std::io::{self, Write};

/// Draw the maze as an ASCII wall grid, one `---`/`|` segment per
/// closed wall. Cells the solver walked are marked with a green `*`.
/// Read-only over both the grid and the overlay.
pub fn print_maze(grid: &Grid, solution: Option<&Solution>) -> io::Result<()> {
    let mut stdout = io::stdout();

    // Top boundary (always closed).
    execute!(stdout, Print("+"))?;
    for _ in 0..grid.cols() {
        execute!(stdout, Print("---+"))?;
    }
    execute!(stdout, Print("\n"))?;

    for row in 0..grid.rows() {
        // Cell line: left boundary, then cell body + right wall.
        execute!(stdout, Print("|"))?;
        for col in 0..grid.cols() {
            let pos = Position::new(row, col);
            if solution.is_some_and(|s| s.is_visited(pos)) {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print(" * "),
                    ResetColor
                )?;
            } else {
                execute!(stdout, Print("   "))?;
            }
            let wall = grid.right_wall(pos).unwrap_or(true);
            execute!(stdout, Print(if wall { "|" } else { " " }))?;
        }
        execute!(stdout, Print("\n"))?;

        // Bottom wall line.
        execute!(stdout, Print("+"))?;
        for col in 0..grid.cols() {
            let wall = grid.bottom_wall(Position::new(row, col)).unwrap_or(true);
            execute!(stdout, Print(if wall { "---+" } else { "   +" }))?;
        }
        execute!(stdout, Print("\n"))?;
    }

    stdout.flush()
}
