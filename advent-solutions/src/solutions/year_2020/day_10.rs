use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::utils::dp_cache::{DpCache, VecBackend};
use crate::utils::parse_lines;

const MAX_GAP: u64 = 3;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 10, tags = ["dp"])]
pub struct Solver;

/// Sorted joltage chain from the outlet (0) to the device (max + 3)
pub type Chain = Vec<u64>;

impl AocParser for Solver {
    type SharedData<'a> = Chain;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut adapters = parse_lines(input, |line| Ok(line.parse::<u64>()?))?;
        adapters.sort_unstable();

        let device = adapters.last().copied().unwrap_or(0) + MAX_GAP;
        let chain: Chain = std::iter::once(0)
            .chain(adapters)
            .chain(std::iter::once(device))
            .collect();

        if let Some(w) = chain.windows(2).find(|w| w[1] - w[0] > MAX_GAP) {
            return Err(ParseError::InvalidFormat(format!(
                "gap of {} jolts between {} and {}",
                w[1] - w[0],
                w[0],
                w[1]
            )));
        }
        Ok(chain)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut counts = [0u64; MAX_GAP as usize + 1];
        for w in shared.windows(2) {
            counts[(w[1] - w[0]) as usize] += 1;
        }
        Ok((counts[1] * counts[3]).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let chain: &Chain = shared;
        // Arrangements reaching each chain index
        let cache = DpCache::new(
            VecBackend::with_capacity(chain.len()),
            |&i: &usize| {
                (i.saturating_sub(MAX_GAP as usize)..i)
                    .filter(|&j| chain[i] - chain[j] <= MAX_GAP)
                    .collect()
            },
            |&i: &usize, deps: Vec<u64>| if i == 0 { 1 } else { deps.iter().sum() },
        );
        Ok(cache.get(&(chain.len() - 1)).to_string())
    }
}
