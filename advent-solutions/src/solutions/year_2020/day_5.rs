use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::bail;

use crate::utils::{parse_lines, solve_failed};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 5, tags = ["binary"])]
pub struct Solver;

/// Decodes a boarding pass: 7 row letters (F/B) then 3 column letters (L/R), read as binary
fn seat_id(pass: &str) -> anyhow::Result<u16> {
    if pass.len() != 10 {
        bail!("boarding pass must be 10 characters, got {:?}", pass);
    }
    pass.bytes().enumerate().try_fold(0u16, |id, (idx, b)| {
        let bit = match (idx < 7, b) {
            (true, b'F') | (false, b'L') => 0,
            (true, b'B') | (false, b'R') => 1,
            _ => bail!("unexpected {:?} at position {}", b as char, idx + 1),
        };
        Ok(id << 1 | bit)
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<u16>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut ids = parse_lines(input, seat_id)?;
        ids.sort_unstable();
        Ok(ids)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .last()
            .map(|id| id.to_string())
            .ok_or_else(|| solve_failed("no boarding passes"))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .windows(2)
            .find(|w| w[1] == w[0] + 2)
            .map(|w| (w[0] + 1).to_string())
            .ok_or_else(|| solve_failed("no free seat between two taken ones"))
    }
}
