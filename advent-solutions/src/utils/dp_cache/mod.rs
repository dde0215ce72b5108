//! Memoization for dynamic programming over a dependency DAG
//!
//! A [`DpCache`] pairs a storage [`Backend`] with a problem definition, either a
//! [`DpProblem`] implementation or a [`ClosureProblem`] built from two closures.
//!
//! - [`VecBackend`]: dense `usize` indices
//! - [`HashMapBackend`]: any `Hash + Eq` index, e.g. `&str` names
//!
//! Dependencies must form a DAG.
//!
//! ```rust
//! use advent_solutions::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};
//!
//! struct GridPaths;
//!
//! impl DpProblem<(usize, usize), u64> for GridPaths {
//!     fn deps(&self, pos: &(usize, usize)) -> Vec<(usize, usize)> {
//!         match *pos {
//!             (0, 0) => vec![],
//!             (0, c) => vec![(0, c - 1)],
//!             (r, 0) => vec![(r - 1, 0)],
//!             (r, c) => vec![(r - 1, c), (r, c - 1)],
//!         }
//!     }
//!
//!     fn compute(&self, _pos: &(usize, usize), deps: Vec<u64>) -> u64 {
//!         if deps.is_empty() { 1 } else { deps.iter().sum() }
//!     }
//! }
//!
//! let cache = DpCache::with_problem(HashMapBackend::new(), GridPaths);
//! assert_eq!(cache.get(&(4, 4)), 70);
//! ```

mod backend;
mod cache;
mod problem;

pub use backend::{Backend, HashMapBackend, VecBackend};
pub use cache::DpCache;
pub use problem::{ClosureProblem, DpProblem};
