use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::{anyhow, bail};
use tracing::{debug, trace};

use crate::utils::{parse_lines, solve_failed};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 8, tags = ["vm"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Acc(i64),
    Jmp(i64),
    Nop(i64),
}

impl Op {
    fn flipped(self) -> Option<Op> {
        match self {
            Op::Jmp(arg) => Some(Op::Nop(arg)),
            Op::Nop(arg) => Some(Op::Jmp(arg)),
            Op::Acc(_) => None,
        }
    }
}

/// How a run of the handheld program ended
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// An instruction was about to run a second time
    Looped(i64),
    /// The program counter reached the end of the program
    Terminated(i64),
}

fn run(program: &[Op]) -> anyhow::Result<Outcome> {
    let mut visited = vec![false; program.len()];
    let (mut pc, mut acc) = (0usize, 0i64);

    loop {
        if pc == program.len() {
            return Ok(Outcome::Terminated(acc));
        }
        if std::mem::replace(&mut visited[pc], true) {
            return Ok(Outcome::Looped(acc));
        }
        let offset = match program[pc] {
            Op::Acc(arg) => {
                acc += arg;
                1
            }
            Op::Jmp(arg) => arg,
            Op::Nop(_) => 1,
        };
        pc = pc
            .checked_add_signed(offset as isize)
            .filter(|&next| next <= program.len())
            .ok_or_else(|| anyhow!("jump from {} by {} leaves the program", pc, offset))?;
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Op>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_lines(input, |line| {
            let (name, arg) = line
                .split_once(' ')
                .ok_or_else(|| anyhow!("expected `<op> <arg>`, got {:?}", line))?;
            let arg: i64 = arg.parse()?;
            Ok(match name {
                "acc" => Op::Acc(arg),
                "jmp" => Op::Jmp(arg),
                "nop" => Op::Nop(arg),
                other => bail!("unknown operation {:?}", other),
            })
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        match run(shared).map_err(|e| SolveError::SolveFailed(e.into()))? {
            Outcome::Looped(acc) => Ok(acc.to_string()),
            Outcome::Terminated(_) => Err(solve_failed("program terminated without looping")),
        }
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        for idx in 0..shared.len() {
            let Some(flipped) = shared[idx].flipped() else {
                continue;
            };
            let original = std::mem::replace(&mut shared[idx], flipped);
            let outcome = run(shared);
            shared[idx] = original;

            match outcome {
                Ok(Outcome::Terminated(acc)) => {
                    debug!(idx, "flipping this instruction terminates the program");
                    return Ok(acc.to_string());
                }
                Ok(Outcome::Looped(_)) => {}
                Err(e) => trace!(idx, error = %e, "candidate jumps out of the program"),
            }
        }
        Err(solve_failed("no single flip makes the program terminate"))
    }
}
