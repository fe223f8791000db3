//! Parser for the `.bff` puzzle format.
//!
//! ```text
//! # comment
//! GRID START
//! o o
//! o x
//! GRID STOP
//! A 1        inventory: kind and count
//! L 1 4 1 -1 laser: x y vx vy (lattice coordinates)
//! P 0 3      target: x y
//! ```
//!
//! Blank lines and `#` comments are skipped, unknown lines are ignored.
//! Integer tokens may contain `=` characters, which are dropped.

use std::str::FromStr;

use thiserror::Error;

use crate::blocks::{BlockKind, Cell, Inventory};
use crate::board::{Board, Puzzle};
use crate::geometry::{Point, Ray};
use crate::grid::{Grid, GridError};

/// Everything that can be wrong with a puzzle description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid cell '{symbol}' in GRID line: {line}")]
    InvalidCell { symbol: char, line: String },

    #[error("missing GRID STOP")]
    MissingGridStop,

    #[error("GRID not found")]
    MissingGrid,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("bad inventory line: {0}")]
    BadInventory(String),

    #[error("unknown inventory key '{key}' in line: {line}")]
    UnknownBlock { key: String, line: String },

    #[error("bad laser line: {0}")]
    BadLaser(String),

    #[error("laser velocity has a zero component: {0}")]
    ZeroVelocity(String),

    #[error("bad target line: {0}")]
    BadTarget(String),

    #[error("invalid number '{token}' in line: {line}")]
    BadNumber { token: String, line: String },
}

const GRID_START: &str = "GRID START";
const GRID_STOP: &str = "GRID STOP";

/// Parses a `.bff` document into a puzzle.
pub fn parse(text: &str) -> Result<Puzzle, ParseError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let mut rows: Option<Vec<Vec<Cell>>> = None;
    let mut lasers: Vec<Ray> = Vec::new();
    let mut targets: Vec<Point> = Vec::new();
    let mut inventory = Inventory::default();

    while let Some(line) = lines.next() {
        if line.eq_ignore_ascii_case(GRID_START) {
            rows = Some(parse_grid_rows(&mut lines)?);
        } else if is_inventory_line(line) {
            let (kind, count) = parse_inventory(line)?;
            inventory.set(kind, count);
        } else if line.starts_with('L') {
            lasers.push(parse_laser(line)?);
        } else if line.starts_with('P') {
            targets.push(parse_target(line)?);
        } else {
            log::warn!("ignoring unrecognised line: {line}");
        }
    }

    let grid = Grid::from_rows(rows.ok_or(ParseError::MissingGrid)?)?;
    let board = Board::new(grid, lasers, targets);
    Ok(Puzzle::new(board, inventory))
}

/// Reads grid rows up to and including the `GRID STOP` line.
fn parse_grid_rows<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
) -> Result<Vec<Vec<Cell>>, ParseError> {
    let mut rows = Vec::new();
    for line in lines {
        if line.eq_ignore_ascii_case(GRID_STOP) {
            return Ok(rows);
        }
        let row = line
            .chars()
            .filter(|c| *c != ' ')
            .map(|symbol| {
                Cell::from_symbol(symbol).ok_or_else(|| ParseError::InvalidCell {
                    symbol,
                    line: line.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Err(ParseError::MissingGridStop)
}

/// A line starting with a block letter and carrying more than that letter.
fn is_inventory_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(chars.next(), Some('A' | 'B' | 'C')) && !chars.as_str().trim().is_empty()
}

fn parse_inventory(line: &str) -> Result<(BlockKind, usize), ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let &[key, count] = parts.as_slice() else {
        return Err(ParseError::BadInventory(line.to_string()));
    };

    let kind = single_char(key)
        .and_then(BlockKind::from_symbol)
        .ok_or_else(|| ParseError::UnknownBlock {
            key: key.to_string(),
            line: line.to_string(),
        })?;
    Ok((kind, number(count, line)?))
}

fn parse_laser(line: &str) -> Result<Ray, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let &[_, x, y, vx, vy] = parts.as_slice() else {
        return Err(ParseError::BadLaser(line.to_string()));
    };

    Ray::new(
        number(x, line)?,
        number(y, line)?,
        number(vx, line)?,
        number(vy, line)?,
    )
    .ok_or_else(|| ParseError::ZeroVelocity(line.to_string()))
}

fn parse_target(line: &str) -> Result<Point, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let &[_, x, y] = parts.as_slice() else {
        return Err(ParseError::BadTarget(line.to_string()));
    };
    Ok((number(x, line)?, number(y, line)?))
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn number<T: FromStr>(token: &str, line: &str) -> Result<T, ParseError> {
    token
        .replace('=', "")
        .parse()
        .map_err(|_| ParseError::BadNumber {
            token: token.to_string(),
            line: line.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT_PAIR: &str = include_str!("../puzzles/split_pair.bff");

    #[test]
    fn test_parses_bundled_puzzle() {
        let puzzle = parse(SPLIT_PAIR).unwrap();

        assert_eq!(puzzle.board.grid.to_string(), "oo\noo");
        assert_eq!(puzzle.inventory, Inventory::new(0, 1, 1));
        assert_eq!(puzzle.board.lasers, vec![Ray::new(1, 4, 1, -1).unwrap()]);
        assert_eq!(puzzle.board.targets, vec![(0, 3), (4, 1)]);
        assert_eq!(puzzle.open_slots, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_lenient_formatting() {
        let text = "\
            # a comment\n\
            \n\
            grid start\n\
            o x  A\n\
            B C o\n\
            Grid Stop\n\
            A 2\n\
            A =3\n\
            L 3 =4 2 -7\n\
            P =1 0\n\
            whatever else\n";
        let puzzle = parse(text).unwrap();

        assert_eq!(puzzle.board.grid.to_string(), "oxA\nBCo");
        // later inventory lines overwrite earlier ones
        assert_eq!(puzzle.inventory, Inventory::new(3, 0, 0));
        assert_eq!(puzzle.board.lasers, vec![Ray::new(3, 4, 1, -1).unwrap()]);
        assert_eq!(puzzle.board.targets, vec![(1, 0)]);
        assert_eq!(puzzle.open_slots, vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn test_rejects_unknown_cell_symbol() {
        let err = parse("GRID START\no q\nGRID STOP\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidCell {
                symbol: 'q',
                line: "o q".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_missing_markers_and_grid() {
        assert_eq!(
            parse("GRID START\no o\nA 1\n").unwrap_err(),
            ParseError::InvalidCell {
                symbol: '1',
                line: "A 1".to_string()
            }
        );
        assert_eq!(
            parse("GRID START\no o\n").unwrap_err(),
            ParseError::MissingGridStop
        );
        assert_eq!(parse("A 1\nP 1 1\n").unwrap_err(), ParseError::MissingGrid);
        assert_eq!(
            parse("GRID START\nGRID STOP\n").unwrap_err(),
            ParseError::Grid(GridError::Empty)
        );
    }

    #[test]
    fn test_rejects_ragged_grid() {
        let err = parse("GRID START\no o o\no o\nGRID STOP\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::Grid(GridError::Ragged {
                row: 1,
                found: 2,
                expected: 3
            })
        );
        assert_eq!(
            err.to_string(),
            "grid is not rectangular: row 1 has 2 cells, expected 3"
        );
    }

    #[test]
    fn test_rejects_malformed_directives() {
        let grid = "GRID START\no\nGRID STOP\n";
        let cases = [
            ("A 1 2", ParseError::BadInventory("A 1 2".to_string())),
            (
                "AB 2",
                ParseError::UnknownBlock {
                    key: "AB".to_string(),
                    line: "AB 2".to_string(),
                },
            ),
            (
                "C two",
                ParseError::BadNumber {
                    token: "two".to_string(),
                    line: "C two".to_string(),
                },
            ),
            (
                "B -1",
                ParseError::BadNumber {
                    token: "-1".to_string(),
                    line: "B -1".to_string(),
                },
            ),
            ("L 1 2 1", ParseError::BadLaser("L 1 2 1".to_string())),
            ("L 0 1 1 0", ParseError::ZeroVelocity("L 0 1 1 0".to_string())),
            ("P 1", ParseError::BadTarget("P 1".to_string())),
            (
                "P 1 y",
                ParseError::BadNumber {
                    token: "y".to_string(),
                    line: "P 1 y".to_string(),
                },
            ),
        ];

        for (line, expected) in cases {
            let text = format!("{grid}{line}\n");
            assert_eq!(parse(&text).unwrap_err(), expected, "line {line:?}");
        }
    }

    #[test]
    fn test_bare_block_letter_is_ignored() {
        let puzzle = parse("GRID START\no\nGRID STOP\nB\n").unwrap();
        assert_eq!(puzzle.inventory, Inventory::default());
    }
}
