use std::collections::HashMap;

use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 15, tags = ["simulation"])]
pub struct Solver;

/// Number spoken on turn `turns` of the memory game
fn spoken_at(starting: &[u32], turns: u32) -> u32 {
    let start_len = starting.len() as u32;
    if turns <= start_len {
        return starting[turns as usize - 1];
    }

    // Turn (1-based) on which each number was last spoken, 0 for never.
    // Every spoken age is below `turns`; only starting numbers can exceed it.
    let mut last_turn = vec![0u32; turns as usize];
    let mut large: HashMap<u32, u32> = HashMap::new();
    let mut speak = |n: u32, turn: u32| match last_turn.get_mut(n as usize) {
        Some(slot) => std::mem::replace(slot, turn),
        None => large.insert(n, turn).unwrap_or(0),
    };
    for (turn, &n) in (1..).zip(&starting[..starting.len() - 1]) {
        speak(n, turn);
    }

    let mut current = starting[starting.len() - 1];
    for turn in start_len..turns {
        let previous = speak(current, turn);
        current = if previous == 0 { 0 } else { turn - previous };
    }
    current
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<u32>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let Some((idx, line)) = input
            .lines()
            .enumerate()
            .find(|(_, line)| !line.trim().is_empty())
        else {
            return Err(ParseError::MissingData("no starting numbers".into()));
        };
        let starting = line
            .trim()
            .split(',')
            .map(|n| {
                n.trim().parse().map_err(|_| {
                    ParseError::InvalidFormat(format!(
                        "(line {}) bad starting number {:?}",
                        idx + 1,
                        n
                    ))
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        if starting.is_empty() {
            return Err(ParseError::MissingData("no starting numbers".into()));
        }
        Ok(starting)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(spoken_at(shared, 2020).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(spoken_at(shared, 30_000_000).to_string())
    }
}
