use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;

use crate::utils::{parse_lines, solve_failed};

const TARGET: u64 = 2020;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 1, tags = ["search"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Vec<u64>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_lines(input, |line| Ok(line.parse::<u64>()?))
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .tuple_combinations()
            .find(|&(a, b)| a + b == TARGET)
            .map(|(a, b)| (a * b).to_string())
            .ok_or_else(|| solve_failed("no pair sums to 2020"))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .iter()
            .tuple_combinations()
            .find(|&(a, b, c)| a + b + c == TARGET)
            .map(|(a, b, c)| (a * b * c).to_string())
            .ok_or_else(|| solve_failed("no triple sums to 2020"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_solver::Solver as _;

    const EXAMPLE: &str = "1721\n979\n366\n299\n675\n1456\n";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "514579");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "241861950");
    }

    #[test]
    fn test_no_match() {
        let mut shared = Solver::parse("1\n2\n3").unwrap();
        assert!(Solver::solve_part(&mut shared, 1).is_err());
        assert!(Solver::solve_part(&mut shared, 2).is_err());
    }

    #[test]
    fn test_entry_is_not_paired_with_itself() {
        let mut shared = Solver::parse("1010\n5").unwrap();
        assert!(Solver::solve_part(&mut shared, 1).is_err());
    }
}
