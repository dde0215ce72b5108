use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::{anyhow, bail};
use regex::Regex;

use crate::utils::parse_lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 2, tags = ["parsing", "regex"])]
pub struct Solver;

/// One `lo-hi c: password` line
#[derive(Debug, PartialEq, Eq)]
pub struct Entry<'a> {
    lo: usize,
    hi: usize,
    letter: char,
    password: &'a str,
}

impl Entry<'_> {
    fn valid_by_count(&self) -> bool {
        let count = self.password.chars().filter(|&c| c == self.letter).count();
        (self.lo..=self.hi).contains(&count)
    }

    fn valid_by_position(&self) -> bool {
        let at = |pos: usize| self.password.chars().nth(pos - 1) == Some(self.letter);
        at(self.lo) ^ at(self.hi)
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Entry<'a>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let re = Regex::new(r"^(\d+)-(\d+) (\w): (\w+)$")
            .map_err(|e| ParseError::Other(e.to_string()))?;

        parse_lines(input, |line| {
            let caps = re
                .captures(line)
                .ok_or_else(|| anyhow!("expected `lo-hi c: password`, got {:?}", line))?;
            let lo: usize = caps[1].parse()?;
            let hi: usize = caps[2].parse()?;
            if lo == 0 || lo > hi {
                bail!("invalid range {}-{}", lo, hi);
            }
            let letter = caps[3]
                .chars()
                .next()
                .ok_or_else(|| anyhow!("missing letter"))?;
            let password = caps.get(4).map_or("", |m| m.as_str());
            Ok(Entry {
                lo,
                hi,
                letter,
                password,
            })
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.iter().filter(|e| e.valid_by_count()).count().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared
            .iter()
            .filter(|e| e.valid_by_position())
            .count()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_solver::Solver as _;

    const EXAMPLE: &str = "1-3 a: abcde\n1-3 b: cdefg\n2-9 c: ccccccccc\n";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "2");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "1");
    }

    #[test]
    fn test_password_borrows_input() {
        let input = String::from("4-5 z: zzzzq");
        let shared = Solver::parse(&input).unwrap();
        assert_eq!(
            shared[0],
            Entry {
                lo: 4,
                hi: 5,
                letter: 'z',
                password: "zzzzq"
            }
        );
        assert!(shared[0].valid_by_count());
        assert!(shared[0].valid_by_position());
    }

    #[test]
    fn test_position_past_end_does_not_match() {
        let shared = Solver::parse("1-9 a: ab").unwrap();
        assert!(shared[0].valid_by_position());
    }

    #[test]
    fn test_malformed_lines() {
        assert!(Solver::parse("1-3 a abcde").is_err());
        assert!(Solver::parse("0-3 a: abcde").is_err());
        assert!(Solver::parse("5-3 a: abcde").is_err());
    }
}
