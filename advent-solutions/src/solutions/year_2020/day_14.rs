use std::collections::HashMap;

use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::anyhow;
use regex::Regex;
use tracing::debug;

use crate::utils::parse_lines;

const WORD_BITS: usize = 36;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 14, tags = ["bits"])]
pub struct Solver;

/// A 36-bit mask split by what each position says
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mask {
    ones: u64,
    zeros: u64,
    floating: u64,
}

impl Mask {
    fn parse(text: &str) -> anyhow::Result<Mask> {
        if text.len() != WORD_BITS {
            return Err(anyhow!("mask must have {} bits, got {}", WORD_BITS, text.len()));
        }
        text.bytes().try_fold(Mask::default(), |mask, b| {
            let shifted = Mask {
                ones: mask.ones << 1,
                zeros: mask.zeros << 1,
                floating: mask.floating << 1,
            };
            match b {
                b'1' => Ok(Mask { ones: shifted.ones | 1, ..shifted }),
                b'0' => Ok(Mask { zeros: shifted.zeros | 1, ..shifted }),
                b'X' => Ok(Mask { floating: shifted.floating | 1, ..shifted }),
                other => Err(anyhow!("unexpected {:?} in mask", other as char)),
            }
        })
    }

    fn apply_to_value(&self, value: u64) -> u64 {
        (value | self.ones) & !self.zeros
    }

    /// Every address the mask decodes `address` into
    fn addresses(&self, address: u64) -> impl Iterator<Item = u64> + use<> {
        let base = (address | self.ones) & !self.floating;
        let floating = self.floating;
        // Walk all subsets of the floating bits, from full down to empty
        let mut subset = Some(floating);
        std::iter::from_fn(move || {
            let current = subset?;
            subset = (current != 0).then(|| (current - 1) & floating);
            Some(base | current)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    SetMask(Mask),
    Write { address: u64, value: u64 },
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Instruction>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let write_re =
            Regex::new(r"^mem\[(\d+)\] = (\d+)$").map_err(|e| ParseError::Other(e.to_string()))?;

        parse_lines(input, |line| {
            if let Some(mask) = line.strip_prefix("mask = ") {
                return Ok(Instruction::SetMask(Mask::parse(mask)?));
            }
            let caps = write_re
                .captures(line)
                .ok_or_else(|| anyhow!("expected `mask = ...` or `mem[a] = v`, got {:?}", line))?;
            Ok(Instruction::Write {
                address: caps[1].parse()?,
                value: caps[2].parse()?,
            })
        })
    }
}

fn run<F>(program: &[Instruction], mut write: F) -> u64
where
    F: FnMut(&mut HashMap<u64, u64>, &Mask, u64, u64),
{
    let mut memory = HashMap::new();
    let mut mask = Mask::default();
    for instruction in program {
        match *instruction {
            Instruction::SetMask(m) => mask = m,
            Instruction::Write { address, value } => write(&mut memory, &mask, address, value),
        }
    }
    debug!(cells = memory.len(), "docking program finished");
    memory.values().sum()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum = run(shared, |memory, mask, address, value| {
            memory.insert(address, mask.apply_to_value(value));
        });
        Ok(sum.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum = run(shared, |memory, mask, address, value| {
            for decoded in mask.addresses(address) {
                memory.insert(decoded, value);
            }
        });
        Ok(sum.to_string())
    }
}
