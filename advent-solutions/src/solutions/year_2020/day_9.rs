use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::{Itertools, MinMaxResult};

use crate::utils::{parse_lines, solve_failed};

/// Preamble length of real puzzle inputs. The worked example uses 5, which
/// only `first_invalid` callers can choose; the solver has no per-day options.
const PREAMBLE: usize = 25;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 9, tags = ["search", "sliding-window"])]
pub struct Solver;

#[derive(Debug)]
pub struct SharedData {
    numbers: Vec<u64>,
    invalid: Option<u64>,
}

/// First number that is not the sum of two different numbers among the `preamble` before it
fn first_invalid(numbers: &[u64], preamble: usize) -> Option<u64> {
    numbers.windows(preamble + 1).find_map(|window| {
        let (&target, previous) = window.split_last()?;
        let valid = previous
            .iter()
            .tuple_combinations()
            .any(|(a, b)| a != b && a + b == target);
        (!valid).then_some(target)
    })
}

/// min + max of the first contiguous run of at least two numbers summing to `target`
fn weakness(numbers: &[u64], target: u64) -> Option<u64> {
    let (mut lo, mut sum) = (0, 0);
    for hi in 0..numbers.len() {
        sum += numbers[hi];
        while sum > target && lo < hi {
            sum -= numbers[lo];
            lo += 1;
        }
        if sum == target && hi > lo {
            return match numbers[lo..=hi].iter().minmax() {
                MinMaxResult::MinMax(min, max) => Some(min + max),
                _ => None,
            };
        }
    }
    None
}

fn invalid_number(shared: &mut SharedData) -> Result<u64, SolveError> {
    if let Some(invalid) = shared.invalid {
        return Ok(invalid);
    }
    let invalid = first_invalid(&shared.numbers, PREAMBLE)
        .ok_or_else(|| solve_failed("every number follows the XMAS rule"))?;
    shared.invalid = Some(invalid);
    Ok(invalid)
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        Ok(SharedData {
            numbers: parse_lines(input, |line| Ok(line.parse::<u64>()?))?,
            invalid: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        invalid_number(shared).map(|n| n.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let target = invalid_number(shared)?;
        weakness(&shared.numbers, target)
            .map(|n| n.to_string())
            .ok_or_else(|| solve_failed(format!("no contiguous run sums to {}", target)))
    }
}
