//! File I/O for puzzles and solutions.
//!
//! Puzzles are read from `.bff` files. A solution is written as plain text,
//! one line of cell symbols per grid row:
//!
//! ```text
//! Bo
//! oC
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::bff::{self, ParseError};
use crate::board::Puzzle;
use crate::grid::Grid;

/// Extension of puzzle files picked up by [`puzzle_files`].
pub const PUZZLE_EXTENSION: &str = "bff";
/// Extension of solution files written by batch runs.
pub const SOLUTION_EXTENSION: &str = "sol";

/// Failure to turn a path into a puzzle.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid puzzle {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Reads and parses a `.bff` file.
pub fn load_puzzle(path: &Path) -> Result<Puzzle, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    bff::parse(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a solved grid, creating parent directories as needed.
pub fn write_solution(path: &Path, grid: &Grid) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, grid.to_string())
}

/// Where a batch run stores the solution for `puzzle`: `<out_dir>/<stem>.sol`.
pub fn solution_path(out_dir: &Path, puzzle: &Path) -> PathBuf {
    let mut name = puzzle.file_stem().unwrap_or(puzzle.as_os_str()).to_os_string();
    name.push(".");
    name.push(SOLUTION_EXTENSION);
    out_dir.join(name)
}

/// Lists the `.bff` files directly inside `dir`, sorted by path.
pub fn puzzle_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == PUZZLE_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
