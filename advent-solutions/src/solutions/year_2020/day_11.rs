use advent_solver::{AocParser, ParseError, PartSolver, SolveError};
use advent_solver_macros::{AocSolver, AutoRegisterSolver};
use anyhow::bail;
use tracing::debug;

use crate::utils::parse_lines;

const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2020, day = 11, tags = ["grid", "simulation"])]
pub struct Solver;

/// Floor plan: which cells hold a seat
pub struct Layout {
    width: usize,
    height: usize,
    seats: Vec<bool>,
}

impl Layout {
    fn is_seat(&self, row: isize, col: isize) -> Option<bool> {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            return None;
        }
        Some(self.seats[row as usize * self.width + col as usize])
    }

    /// For every seat, the seats it looks at; `reach` limits how far along each direction
    fn neighbours(&self, reach: Option<usize>) -> Vec<Vec<usize>> {
        let max_steps = reach.unwrap_or(usize::MAX);
        (0..self.seats.len())
            .map(|idx| {
                if !self.seats[idx] {
                    return vec![];
                }
                let (row, col) = ((idx / self.width) as isize, (idx % self.width) as isize);
                DIRECTIONS
                    .iter()
                    .filter_map(|&(dr, dc)| {
                        (1..=max_steps).find_map(|step| {
                            let (r, c) = (row + dr * step as isize, col + dc * step as isize);
                            match self.is_seat(r, c) {
                                None => Some(None),
                                Some(true) => Some(Some(r as usize * self.width + c as usize)),
                                Some(false) => None,
                            }
                        })?
                    })
                    .collect()
            })
            .collect()
    }
}

/// Runs the seating rules until nothing changes and counts occupied seats
fn settle(layout: &Layout, neighbours: &[Vec<usize>], tolerance: usize) -> usize {
    let mut occupied = vec![false; layout.seats.len()];
    let mut rounds = 0;
    loop {
        let next: Vec<bool> = (0..occupied.len())
            .map(|idx| {
                if !layout.seats[idx] {
                    return false;
                }
                let around = neighbours[idx].iter().filter(|&&n| occupied[n]).count();
                match occupied[idx] {
                    false => around == 0,
                    true => around < tolerance,
                }
            })
            .collect();
        rounds += 1;
        if next == occupied {
            debug!(rounds, tolerance, "seating settled");
            return occupied.iter().filter(|&&o| o).count();
        }
        occupied = next;
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Layout;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let rows = parse_lines(input, |line| {
            line.chars()
                .map(|c| match c {
                    'L' => Ok(true),
                    '.' => Ok(false),
                    other => bail!("unexpected {:?}", other),
                })
                .collect::<anyhow::Result<Vec<bool>>>()
        })?;

        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(ParseError::MissingData("empty floor plan".into()));
        }
        if let Some(idx) = rows.iter().position(|row| row.len() != width) {
            return Err(ParseError::InvalidFormat(format!(
                "row {} has width {}, expected {}",
                idx + 1,
                rows[idx].len(),
                width
            )));
        }

        Ok(Layout {
            width,
            height: rows.len(),
            seats: rows.concat(),
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let neighbours = shared.neighbours(Some(1));
        Ok(settle(shared, &neighbours, 4).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let neighbours = shared.neighbours(None);
        Ok(settle(shared, &neighbours, 5).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_solver::Solver as _;

    const EXAMPLE: &str = "\
L.LL.LL.LL
LLLLLLL.LL
L.L.L..L..
LLLL.LL.LL
L.LL.LL.LL
L.LLLLL.LL
..L.L.....
LLLLLLLLLL
L.LLLLLL.L
L.LLLLL.LL
";

    #[test]
    fn test_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "37");
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "26");
    }

    #[test]
    fn test_visible_seats_skip_floor() {
        let layout = Solver::parse("L..L\n....\nL..L\n").unwrap();
        let adjacent = layout.neighbours(Some(1));
        let visible = layout.neighbours(None);
        assert!(adjacent[0].is_empty());
        assert_eq!(visible[0], vec![3, 8]);
        assert_eq!(visible[3], vec![0, 11]);
        assert!(visible[1].is_empty());
    }

    #[test]
    fn test_rejects_occupied_or_unknown_cells() {
        assert!(Solver::parse("L#L").is_err());
        assert!(Solver::parse("LL\nL").is_err());
    }
}
