use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::solve_failed;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2015, day = 1, tags = ["parsing"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = &'a [u8];

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let trimmed = input.trim();
        match trimmed.char_indices().find(|&(_, c)| c != '(' && c != ')') {
            Some((idx, c)) => Err(ParseError::InvalidFormat(format!(
                "unexpected {:?} at position {}",
                c,
                idx + 1
            ))),
            None => Ok(trimmed.as_bytes()),
        }
    }
}

fn step(b: u8) -> i64 {
    if b == b'(' { 1 } else { -1 }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().map(|&b| step(b)).sum::<i64>().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .scan(0i64, |floor, &b| {
                *floor += step(b);
                Some(*floor)
            })
            .position(|floor| floor == -1)
            .map(|idx| (idx + 1).to_string())
            .ok_or_else(|| solve_failed("never entered the basement"))
    }
}
