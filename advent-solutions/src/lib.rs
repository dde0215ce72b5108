//! Advent of Code puzzle solutions with automatic registration
//!
//! Solutions live in `solutions::year_YYYY::day_N`, one unit struct `Solver`
//! per puzzle. Each derives `AutoRegisterSolver`, so linking this crate is
//! enough for `SolverRegistryBuilder::register_all_plugins` to see them.

pub mod solutions;
pub mod utils;
