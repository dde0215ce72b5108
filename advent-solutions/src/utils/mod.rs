//! Helpers shared between puzzle solutions

pub mod dp_cache;

use advent_solver::{ParseError, SolveError};

/// Parses each non-empty line with `f`, reporting the 1-based line number on failure
pub fn parse_lines<'a, T, F>(input: &'a str, mut f: F) -> Result<Vec<T>, ParseError>
where
    F: FnMut(&'a str) -> anyhow::Result<T>,
{
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            f(line.trim())
                .map_err(|e| ParseError::InvalidFormat(format!("(line {}) {}", idx + 1, e)))
        })
        .collect()
}

/// Splits input into groups of lines separated by blank lines
///
/// Each line keeps its 1-based line number for error messages.
pub fn blank_line_groups(input: &str) -> Vec<Vec<(usize, &str)>> {
    let mut groups = vec![];
    let mut current = vec![];
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push((idx + 1, line));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Wraps a message as a failed solve
pub fn solve_failed(msg: impl Into<String>) -> SolveError {
    let msg: String = msg.into();
    SolveError::SolveFailed(msg.into())
}
