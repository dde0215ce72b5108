use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::blank_line_groups;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 6, tags = ["sets"])]
pub struct Solver;

/// Answers of one person as a bitset over `a..=z`
type Answers = u32;

impl AocParser for Solver {
    type SharedData<'a> = Vec<Vec<Answers>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        blank_line_groups(input)
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .map(|(line_no, person)| {
                        person.bytes().try_fold(0, |set, b| match b {
                            b'a'..=b'z' => Ok(set | 1 << (b - b'a')),
                            _ => Err(ParseError::InvalidFormat(format!(
                                "(line {}) unexpected {:?} in {:?}",
                                line_no, b as char, person
                            ))),
                        })
                    })
                    .collect::<Result<Vec<Answers>, ParseError>>()
            })
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total: u32 = shared
            .iter()
            .map(|group| group.iter().fold(0, |acc, p| acc | p).count_ones())
            .sum();
        Ok(total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total: u32 = shared
            .iter()
            .map(|group| group.iter().fold(!0, |acc, p| acc & p).count_ones())
            .sum();
        Ok(total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_solver::Solver as _;

    const EXAMPLE: &str = "abc\n\na\nb\nc\n\nab\nac\n\na\na\na\na\n\nb\n";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(shared.len(), 5);
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "11");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "6");
    }

    #[test]
    fn test_rejects_non_letters() {
        assert!(matches!(
            Solver::parse("ab\n\nc\nab1"),
            Err(ParseError::InvalidFormat(msg)) if msg.starts_with("(line 4)")
        ));
    }
}
