use advent_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver};

#[derive(Debug, Clone)]
struct SharedData {
    numbers: Vec<i32>,
    sum: Option<i32>,
}

#[derive(AocSolver)]
#[aoc_solver(max_parts = 3)]
struct TestDependentSolver;

impl AocParser for TestDependentSolver {
    type SharedData<'a> = SharedData;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        let numbers = input
            .lines()
            .map(|line| {
                line.trim()
                    .parse::<i32>()
                    .map_err(|_| ParseError::InvalidFormat("Expected integer".into()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SharedData { numbers, sum: None })
    }
}

// Stores the sum for part 2
impl PartSolver<1> for TestDependentSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum = shared.numbers.iter().sum();
        shared.sum = Some(sum);
        Ok(sum.to_string())
    }
}

// Falls back to computing the sum itself
impl PartSolver<2> for TestDependentSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum = shared.sum.unwrap_or_else(|| shared.numbers.iter().sum());
        let count = shared.numbers.len();
        if count == 0 {
            return Err(SolveError::SolveFailed("Empty input".into()));
        }
        Ok(format!("{:.2}", sum as f64 / count as f64))
    }
}

// Requires part 1 to have run
impl PartSolver<3> for TestDependentSolver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum = shared
            .sum
            .ok_or_else(|| SolveError::SolveFailed("No previous data".into()))?;
        Ok((sum * 2).to_string())
    }
}

#[test]
fn test_part1_stores_data() {
    let mut shared = <TestDependentSolver as AocParser>::parse("10\n20\n30").unwrap();

    let result = <TestDependentSolver as Solver>::solve_part(&mut shared, 1).unwrap();
    assert_eq!(result, "60");
    assert_eq!(shared.sum, Some(60));
}

#[test]
fn test_part2_uses_part1_data() {
    let mut shared = <TestDependentSolver as AocParser>::parse("10\n20\n30").unwrap();

    <TestDependentSolver as Solver>::solve_part(&mut shared, 1).unwrap();
    let result = <TestDependentSolver as Solver>::solve_part(&mut shared, 2).unwrap();
    assert_eq!(result, "20.00");
}

#[test]
fn test_part2_solves_independently() {
    let mut shared = <TestDependentSolver as AocParser>::parse("10\n20\n30").unwrap();
    let result = <TestDependentSolver as Solver>::solve_part(&mut shared, 2).unwrap();
    assert_eq!(result, "20.00");
}

#[test]
fn test_part3_without_part1_fails() {
    let mut shared = <TestDependentSolver as AocParser>::parse("1\n2").unwrap();
    let result = <TestDependentSolver as Solver>::solve_part(&mut shared, 3);
    assert!(matches!(result, Err(SolveError::SolveFailed(_))));

    <TestDependentSolver as Solver>::solve_part(&mut shared, 1).unwrap();
    let result = <TestDependentSolver as Solver>::solve_part(&mut shared, 3).unwrap();
    assert_eq!(result, "6");
}

#[test]
fn test_parse_error() {
    let result = <TestDependentSolver as AocParser>::parse("10\nabc");
    assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
}
