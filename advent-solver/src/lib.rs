//! Advent of Code Solver Library
//!
//! A small, type-safe framework for Advent of Code puzzles. Each puzzle is a
//! solver with its own input parser and one function per part. Solvers
//! register themselves through a plugin table so a runner can discover every
//! (year, day) the workspace knows about.
//!
//! # Overview
//!
//! - [`AocParser`] turns raw input into shared data, which may borrow from the input
//! - [`PartSolver<N>`] solves part `N` given mutable access to the shared data
//! - [`Solver`] ties the parts together; usually generated by `#[derive(AocSolver)]`
//! - [`DynSolver`] erases the solver type so a registry can hold all of them
//! - [`SolverRegistry`] maps (year, day) to a factory producing a [`DynSolver`]
//!
//! # Quick Example
//!
//! ```
//! use advent_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Sums;
//!
//! impl AocParser for Sums {
//!     type SharedData<'a> = Vec<i64>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat(l.to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Sums {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i64>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Sums {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().product::<i64>().to_string())
//!     }
//! }
//!
//! let registry = SolverRegistryBuilder::new()
//!     .register_solver::<Sums>(2020, 1)
//!     .unwrap()
//!     .build();
//!
//! let mut solver = registry.create_solver(2020, 1, "2\n3\n4").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "9");
//! assert_eq!(solver.solve(2).unwrap().answer, "24");
//! ```
//!
//! # Plugins
//!
//! `#[derive(AutoRegisterSolver)]` submits a [`SolverPlugin`] to the `inventory`
//! table; [`SolverRegistryBuilder::register_all_plugins`] picks them all up:
//!
//! ```ignore
//! #[derive(AocSolver, AutoRegisterSolver)]
//! #[aoc_solver(max_parts = 2)]
//! #[aoc(year = 2020, day = 1, tags = ["search"])]
//! pub struct Solver;
//! ```

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    FactoryInfo, RegisterableSolver, SolverFactory, SolverFactoryStorage, SolverPlugin,
    SolverRegistry, SolverRegistryBuilder, BASE_YEAR, DAYS_PER_YEAR, MAX_YEARS,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Re-exported for the derive macros
pub use inventory;

pub use advent_solver_macros::{AocSolver, AutoRegisterSolver};
