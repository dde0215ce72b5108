use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::{anyhow, bail};

use crate::utils::parse_lines;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 12, tags = ["simulation"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move by (east, north)
    Shift(i64, i64),
    /// Counter-clockwise quarter turns, 0..4
    Turn(u8),
    Forward(i64),
}

/// East/north vector
type Vector = (i64, i64);

fn rotate((east, north): Vector, quarter_turns: u8) -> Vector {
    (0..quarter_turns).fold((east, north), |(e, n), _| (-n, e))
}

fn parse_action(line: &str) -> anyhow::Result<Action> {
    let mut chars = line.chars();
    let kind = chars.next().ok_or_else(|| anyhow!("empty action"))?;
    let value: i64 = chars.as_str().parse()?;

    let turn = |value: i64| -> anyhow::Result<u8> {
        if value % 90 != 0 {
            bail!("rotation of {} is not a multiple of 90", value);
        }
        Ok((value / 90).rem_euclid(4) as u8)
    };

    Ok(match kind {
        'N' => Action::Shift(0, value),
        'S' => Action::Shift(0, -value),
        'E' => Action::Shift(value, 0),
        'W' => Action::Shift(-value, 0),
        'L' => Action::Turn(turn(value)?),
        'R' => Action::Turn((4 - turn(value)?) % 4),
        'F' => Action::Forward(value),
        other => bail!("unknown action {:?}", other),
    })
}

/// Sails the route; `Shift` moves the ship itself or the waypoint
fn sail(actions: &[Action], waypoint: Vector, shift_waypoint: bool) -> i64 {
    let (mut ship, mut waypoint) = ((0i64, 0i64), waypoint);
    for &action in actions {
        match action {
            Action::Shift(de, dn) if shift_waypoint => waypoint = (waypoint.0 + de, waypoint.1 + dn),
            Action::Shift(de, dn) => ship = (ship.0 + de, ship.1 + dn),
            Action::Turn(quarters) => waypoint = rotate(waypoint, quarters),
            Action::Forward(n) => ship = (ship.0 + waypoint.0 * n, ship.1 + waypoint.1 * n),
        }
    }
    ship.0.abs() + ship.1.abs()
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Action>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        parse_lines(input, parse_action)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        // Heading is a unit waypoint starting east
        Ok(sail(shared, (1, 0), false).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(sail(shared, (10, 1), true).to_string())
    }
}
