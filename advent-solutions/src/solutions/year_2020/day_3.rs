use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::bail;

use crate::utils::parse_lines;

const SLOPES: [(usize, usize); 5] = [(1, 1), (3, 1), (5, 1), (7, 1), (1, 2)];

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 3, tags = ["grid"])]
pub struct Solver;

/// Rows of the map, repeating to the right; `#` is a tree
pub struct Map<'a> {
    rows: Vec<&'a [u8]>,
}

impl Map<'_> {
    fn trees(&self, right: usize, down: usize) -> usize {
        self.rows
            .iter()
            .step_by(down)
            .enumerate()
            .filter(|(step, row)| row[(step * right) % row.len()] == b'#')
            .count()
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Map<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut width = None;
        let rows = parse_lines(input, |line| {
            if let Some(c) = line.chars().find(|&c| c != '.' && c != '#') {
                bail!("unexpected {:?}", c);
            }
            match width {
                None => width = Some(line.len()),
                Some(w) if w != line.len() => bail!("row width {} differs from {}", line.len(), w),
                _ => {}
            }
            Ok(line.as_bytes())
        })?;

        if rows.is_empty() {
            return Err(ParseError::MissingData("empty map".into()));
        }
        Ok(Map { rows })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.trees(3, 1).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(SLOPES
            .iter()
            .map(|&(right, down)| shared.trees(right, down))
            .product::<usize>()
            .to_string())
    }
}
