use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::trace;

use crate::utils::solve_failed;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 13, tags = ["math"])]
pub struct Solver;

#[derive(Debug)]
pub struct Notes {
    earliest: u64,
    /// Bus ids by list offset; `None` for `x`
    buses: Vec<Option<u64>>,
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Earliest `t` where the bus at offset `i` departs at `t + i`, found by sieving
///
/// Ids need not be coprime. Stepping by `step` revisits the same residue mod `id`
/// after `id / gcd(step, id)` steps, so a bus that is not aligned by then never will be.
fn aligned_departure(buses: &[Option<u64>]) -> Result<u64, SolveError> {
    let overflow = || solve_failed("aligned departure overflows u64");
    let (mut t, mut step) = (0u64, 1u64);
    for (offset, id) in buses
        .iter()
        .enumerate()
        .filter_map(|(offset, id)| Some((offset as u64, (*id)?)))
    {
        let mut aligned = false;
        for _ in 0..id / gcd(step, id) {
            if t.checked_add(offset).ok_or_else(overflow)? % id == 0 {
                aligned = true;
                break;
            }
            t = t.checked_add(step).ok_or_else(overflow)?;
        }
        if !aligned {
            return Err(solve_failed(format!(
                "no timestamp aligns bus {} at offset {}",
                id, offset
            )));
        }
        step = (step / gcd(step, id)).checked_mul(id).ok_or_else(overflow)?;
        trace!(id, t, step, "aligned bus");
    }
    Ok(t)
}

fn parse_buses(line_no: usize, line: &str) -> Result<Vec<Option<u64>>, ParseError> {
    line.split(',')
        .map(|entry| match entry.trim() {
            "x" => Ok(None),
            id => match id.parse::<u64>() {
                Ok(0) | Err(_) => Err(ParseError::InvalidFormat(format!(
                    "(line {}) bad bus id {:?}",
                    line_no, id
                ))),
                Ok(id) => Ok(Some(id)),
            },
        })
        .collect()
}

impl AocParser for Solver {
    type SharedData<'a> = Notes;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut lines = input
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(idx, l)| (idx + 1, l));
        let (Some((earliest_line, earliest)), Some((buses_line, buses))) =
            (lines.next(), lines.next())
        else {
            return Err(ParseError::MissingData(
                "expected a timestamp line and a bus line".into(),
            ));
        };
        let earliest: u64 = earliest
            .parse()
            .map_err(|_| {
                ParseError::InvalidFormat(format!(
                    "(line {}) bad timestamp {:?}",
                    earliest_line, earliest
                ))
            })?;
        Ok(Notes {
            earliest,
            buses: parse_buses(buses_line, buses)?,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let earliest = shared.earliest;
        shared
            .buses
            .iter()
            .flatten()
            .map(|&id| (id, (id - earliest % id) % id))
            .min_by_key(|&(_, wait)| wait)
            .map(|(id, wait)| (id * wait).to_string())
            .ok_or_else(|| solve_failed("no buses in service"))
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if shared.buses.iter().all(Option::is_none) {
            return Err(solve_failed("no buses in service"));
        }
        Ok(aligned_departure(&shared.buses)?.to_string())
    }
}
