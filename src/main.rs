//! Lazor Puzzle Solver
//!
//! Reads `.bff` puzzle descriptions, searches for a placement of the
//! available blocks that lights every target, and writes the solved grid.
//!
//! Exit codes: 0 solved, 1 no solution, 2 input not found, 3 invalid puzzle,
//! 4 other I/O failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use lazor::geometry::Point;
use lazor::persistence::{self, LoadError};
use lazor::solver::{SearchOptions, SearchReport};
use lazor::tracer::{Termination, Trace, DEFAULT_STEP_CAP};
use lazor::Puzzle;

/// Solves Lazor block-placement puzzles.
#[derive(Parser)]
#[command(name = "lazor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log search progress (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve one puzzle and write the solution grid.
    Solve {
        /// Puzzle file (.bff).
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the solution grid.
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Solve every .bff file in a directory.
    Batch {
        /// Directory containing puzzle files.
        dir: PathBuf,
        /// Directory for the .sol files.
        #[arg(short, long, default_value = "out")]
        output: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Trace a puzzle as given, without placing any blocks.
    Trace {
        /// Puzzle file (.bff).
        #[arg(short, long)]
        input: PathBuf,
        /// Maximum steps per ray-thread.
        #[arg(long, default_value_t = DEFAULT_STEP_CAP)]
        step_cap: usize,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Print the best partial hit if no solution is found.
    #[arg(long)]
    diagnose: bool,
    /// Maximum steps per ray-thread.
    #[arg(long, default_value_t = DEFAULT_STEP_CAP)]
    step_cap: usize,
}

impl From<&SearchArgs> for SearchOptions {
    fn from(args: &SearchArgs) -> Self {
        SearchOptions {
            step_cap: args.step_cap,
            diagnose: args.diagnose,
        }
    }
}

/// How a run ended; doubles as the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Solved = 0,
    NoSolution = 1,
    InputNotFound = 2,
    InvalidPuzzle = 3,
    IoFailure = 4,
}

impl Outcome {
    fn code(self) -> u8 {
        self as u8
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match &cli.command {
        Command::Solve {
            input,
            output,
            search,
        } => run_solve(input, output, &search.into()),
        Command::Batch {
            dir,
            output,
            search,
        } => run_batch(dir, output, &search.into()),
        Command::Trace { input, step_cap } => run_trace(input, *step_cap),
    };

    outcome.into()
}

/// Logs at `warn` unless `RUST_LOG` says otherwise; `--verbose` forces `debug`.
fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

/// Solves one puzzle file and writes the solution to `output`.
fn run_solve(input: &Path, output: &Path, options: &SearchOptions) -> Outcome {
    let puzzle = match load(input) {
        Ok(puzzle) => puzzle,
        Err(outcome) => return outcome,
    };
    println!("{}", processing_line(input, &puzzle));

    let report = puzzle.solve(options);
    let Some(grid) = &report.solution else {
        print!("{}", failure_text(&report));
        return Outcome::NoSolution;
    };

    if let Err(e) = persistence::write_solution(output, grid) {
        eprintln!("Failed to write solution to {}: {}", output.display(), e);
        return Outcome::IoFailure;
    }
    println!("Solution written to {}", output.display());
    println!("{grid}");
    Outcome::Solved
}

/// Solves every puzzle in `dir`, writing `<stem>.sol` files into `out_dir`.
fn run_batch(dir: &Path, out_dir: &Path, options: &SearchOptions) -> Outcome {
    let files = match persistence::puzzle_files(dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Failed to list {}: {}", dir.display(), e);
            return match e.kind() {
                std::io::ErrorKind::NotFound => Outcome::InputNotFound,
                _ => Outcome::IoFailure,
            };
        }
    };

    let mut passed = 0;
    for file in &files {
        println!("==> {}", file.display());
        let outcome = run_solve(file, &persistence::solution_path(out_dir, file), options);
        println!("exit= {}", outcome.code());
        if outcome == Outcome::Solved {
            passed += 1;
        }
    }
    println!("passed {}/{}", passed, files.len());

    if passed == files.len() {
        Outcome::Solved
    } else {
        Outcome::NoSolution
    }
}

/// Traces the puzzle as given and reports which targets are lit.
fn run_trace(input: &Path, step_cap: usize) -> Outcome {
    let puzzle = match load(input) {
        Ok(puzzle) => puzzle,
        Err(outcome) => return outcome,
    };
    println!("{}", processing_line(input, &puzzle));

    let trace = puzzle.trace(step_cap);
    print!("{}", trace_text(&puzzle, &trace));

    if unreached_targets(&puzzle, &trace).is_empty() {
        Outcome::Solved
    } else {
        Outcome::NoSolution
    }
}

fn load(input: &Path) -> Result<Puzzle, Outcome> {
    persistence::load_puzzle(input).map_err(|err| {
        eprintln!("{err}");
        outcome_for(&err)
    })
}

fn outcome_for(err: &LoadError) -> Outcome {
    match err {
        LoadError::NotFound { .. } => Outcome::InputNotFound,
        LoadError::Parse { .. } => Outcome::InvalidPuzzle,
        LoadError::Io { .. } => Outcome::IoFailure,
    }
}

fn processing_line(input: &Path, puzzle: &Puzzle) -> String {
    let name = input
        .file_name()
        .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());
    format!(
        "Processing {}... Inventory: {} | slots={}",
        name,
        puzzle.inventory,
        puzzle.open_slots.len()
    )
}

/// The "no solution" message, preceded by the diagnosis when one was made.
fn failure_text(report: &SearchReport) -> String {
    let Some(diagnosis) = &report.diagnosis else {
        return "No solution found.\n".to_string();
    };

    let mut output = format!(
        "[Diagnosis] Best hit = {}/{}\n",
        diagnosis.best_hits, diagnosis.total_targets
    );
    if let Some(layout) = &diagnosis.best_layout {
        output.push_str("[Diagnosis] Best partial layout:\n");
        output.push_str(&format!("{layout}\n"));
    }
    output.push_str("No solution found. (See diagnosis above)\n");
    output
}

/// Distinct targets not lit by `trace`, sorted.
fn unreached_targets(puzzle: &Puzzle, trace: &Trace) -> Vec<Point> {
    let mut unreached: Vec<Point> = puzzle
        .board
        .targets
        .iter()
        .copied()
        .filter(|target| !trace.hits.contains(target))
        .collect();
    unreached.sort_unstable();
    unreached.dedup();
    unreached
}

fn trace_text(puzzle: &Puzzle, trace: &Trace) -> String {
    let mut targets = puzzle.board.targets.clone();
    targets.sort_unstable();
    targets.dedup();
    let unreached = unreached_targets(puzzle, trace);

    let mut output = format!(
        "Hit {}/{} targets\n",
        targets.len() - unreached.len(),
        targets.len()
    );
    for (x, y) in unreached {
        output.push_str(&format!("  unreached ({x}, {y})\n"));
    }

    for (index, termination) in trace.terminations.iter().enumerate() {
        let (what, ray) = match termination {
            Termination::Exited(ray) => ("left the board at", ray),
            Termination::Absorbed(ray) => ("absorbed at", ray),
            Termination::Looped(ray) => ("looped at", ray),
            Termination::StepCap(ray) => ("hit the step cap at", ray),
        };
        let (x, y) = ray.position();
        let (vx, vy) = ray.velocity();
        output.push_str(&format!(
            "ray {}: {what} ({x}, {y}) heading ({vx}, {vy})\n",
            index + 1
        ));
    }

    output
}
