mod render;

use clap::{Parser, Subcommand};
use maze_core::{format, Generator, Position, SolveBudget, Solver};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "maze", version, about = "Generate and solve perfect mazes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a maze and print it
    Generate {
        #[arg(long, default_value_t = 10)]
        rows: usize,
        #[arg(long, default_value_t = 10)]
        cols: usize,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Also write the maze in the two-matrix text format
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load a maze from a file, solve it, and print the walked cells
    Solve {
        file: PathBuf,
        /// Start cell as row,col
        #[arg(long, value_parser = parse_cell)]
        start: Position,
        /// End cell as row,col
        #[arg(long, value_parser = parse_cell)]
        end: Position,
        /// Wall-clock deadline in seconds on top of the step cap
        #[arg(long)]
        deadline: Option<u64>,
    },
    /// Load a maze from a file and print it
    Show { file: PathBuf },
}

/// Coordinates are passed through as-is; range validation is the
/// solver's job.
fn parse_cell(arg: &str) -> Result<Position, String> {
    let (row, col) = arg
        .split_once(',')
        .ok_or_else(|| "expected row,col (e.g. 0,0)".to_string())?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("bad row {:?}", row))?;
    let col = col
        .trim()
        .parse()
        .map_err(|_| format!("bad column {:?}", col))?;
    Ok(Position::new(row, col))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Generate {
            rows,
            cols,
            seed,
            out,
        } => {
            let mut generator = match seed {
                Some(seed) => Generator::with_seed(seed),
                None => Generator::new(),
            };
            let grid = generator.generate(rows, cols).map_err(|e| e.to_string())?;
            if let Some(path) = out {
                format::save(&grid, &path).map_err(|e| e.to_string())?;
            }
            render::print_maze(&grid, None).map_err(|e| e.to_string())
        }
        Command::Solve {
            file,
            start,
            end,
            deadline,
        } => {
            let grid = format::load(&file).map_err(|e| e.to_string())?;
            let mut budget = SolveBudget::default();
            if let Some(secs) = deadline {
                budget.deadline = Some(Duration::from_secs(secs));
            }
            let solution = Solver::with_budget(budget)
                .solve(&grid, start, end)
                .map_err(|e| e.to_string())?;
            render::print_maze(&grid, Some(&solution)).map_err(|e| e.to_string())
        }
        Command::Show { file } => {
            let grid = format::load(&file).map_err(|e| e.to_string())?;
            render::print_maze(&grid, None).map_err(|e| e.to_string())
        }
    }
}
