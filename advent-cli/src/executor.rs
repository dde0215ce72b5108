//! Parallel executor for running solvers

use crate::cache::InputCache;
use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, CliError, ExecutorError};
use advent_http_client::AocClient;
use advent_solver::SolverRegistry;
use chrono::TimeDelta;
use itertools::Itertools;
use rayon::prelude::*;
use std::any::Any;
use std::borrow::Cow;
use std::ops::RangeInclusive;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Outcome of one puzzle part
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, ArcExecutorError>,
    /// Set on the first part of each day only, so totals count each parse once
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

/// A registered day and the parts selected to run
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    context: RunContext,
    thread_pool: rayon::ThreadPool,
}

/// Everything a worker thread needs, shared by reference across the pool
struct RunContext {
    registry: SolverRegistry,
    cache: InputCache,
    client: Option<AocClient>,
    session: Zeroizing<String>,
    explicit_input: Option<String>,
    parallelize_by: ParallelizeBy,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, CliError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ArcExecutorError::from(ExecutorError::ThreadPool(e.to_string())))?;

        let mut executor = Self {
            context: RunContext {
                registry,
                cache: InputCache::new(config.cache_dir.clone()),
                client: None,
                session: Zeroizing::new(String::new()),
                explicit_input: config.explicit_input.clone(),
                parallelize_by: config.parallelize_by,
                year_filter: config.year_filter,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        };
        if !config.session.is_empty() {
            executor.set_session(config.session.clone())?;
        }
        Ok(executor)
    }

    /// Use `session` for downloading inputs that are not cached
    pub fn set_session(&mut self, session: Zeroizing<String>) -> Result<(), CliError> {
        self.context.client = Some(AocClient::new()?);
        self.context.session = session;
        Ok(())
    }

    pub fn has_session(&self) -> bool {
        self.context.client.is_some()
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let ctx = &self.context;
        ctx.registry
            .storage()
            .iter_info()
            .filter(|info| ctx.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| ctx.day_filter.is_none_or(|d| info.day == d))
            .filter_map(|info| {
                let parts = match ctx.part_filter {
                    Some(p) if p <= info.parts => p..=p,
                    Some(_) => return None,
                    None => 1..=info.parts,
                };
                Some(WorkItem {
                    year: info.year,
                    day: info.day,
                    parts,
                })
            })
            .collect()
    }

    /// Days whose input would have to be downloaded
    pub fn missing_inputs(&self, work_items: &[WorkItem]) -> Vec<(u16, u8)> {
        if self.context.explicit_input.is_some() {
            return Vec::new();
        }
        work_items
            .iter()
            .filter(|w| !self.context.cache.contains(w.year, w.day))
            .map(|w| (w.year, w.day))
            .collect()
    }

    /// Execute all work items and send results to channel
    ///
    /// Per-part failures travel inside [`SolverResult`]; the returned error only
    /// covers the run itself breaking down.
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();
        let ctx = &self.context;

        let error = match ctx.parallelize_by {
            ParallelizeBy::Sequential => work_items
                .iter()
                .filter_map(|work| run_day(work, &tx, ctx).err())
                .reduce(ArcExecutorError::combine),
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.thread_pool.install(|| {
                    by_year
                        .par_iter()
                        .filter_map(|items| {
                            items
                                .iter()
                                .filter_map(|work| run_day(work, &tx, ctx).err())
                                .reduce(ArcExecutorError::combine)
                        })
                        .reduce_with(ArcExecutorError::combine)
                })
            }
            ParallelizeBy::Day => self.thread_pool.install(|| {
                work_items
                    .par_iter()
                    .filter_map(|work| run_day(work, &tx, ctx).err())
                    .reduce_with(ArcExecutorError::combine)
            }),
        };

        error.map_or(Ok(()), Err)
    }
}

fn failed(work: &WorkItem, part: u8, error: ArcExecutorError) -> SolverResult {
    SolverResult {
        year: work.year,
        day: work.day,
        part,
        answer: Err(error),
        parse_duration: None,
        solve_duration: TimeDelta::zero(),
    }
}

/// Report the same failure for every selected part of a day
fn fail_all_parts(
    work: &WorkItem,
    error: ExecutorError,
    tx: &Sender<SolverResult>,
) -> Result<(), ArcExecutorError> {
    let error = ArcExecutorError::from(error);
    for part in work.parts.clone() {
        tx.send(failed(work, part, error.clone()))
            .map_err(|_| ExecutorError::ChannelSend)?;
    }
    Ok(())
}

/// Turn a caught panic into an error for the day it happened in
fn panicked(work: &WorkItem, payload: Box<dyn Any + Send>) -> ExecutorError {
    let message = match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map_or_else(|| "unknown panic payload".to_string(), |s| s.to_string()),
    };
    ExecutorError::Panicked {
        year: work.year,
        day: work.day,
        message,
    }
}

/// Parse one day's input once and solve its parts in order
///
/// A panicking solver fails the part it panicked in and every part after it.
fn run_day(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    ctx: &RunContext,
) -> Result<(), ArcExecutorError> {
    let input = match fetch_input(work, ctx) {
        Ok(input) => input,
        Err(e) => return fail_all_parts(work, e, tx),
    };

    let created = panic::catch_unwind(AssertUnwindSafe(|| {
        ctx.registry.create_solver(work.year, work.day, &input)
    }));
    let mut solver = match created {
        Ok(Ok(solver)) => solver,
        Ok(Err(e)) => return fail_all_parts(work, e.into(), tx),
        Err(payload) => return fail_all_parts(work, panicked(work, payload), tx),
    };
    let mut parse_duration = Some(solver.parse_duration());
    let mut poisoned: Option<ArcExecutorError> = None;

    for part in work.parts.clone() {
        if let Some(error) = &poisoned {
            tx.send(failed(work, part, error.clone()))
                .map_err(|_| ExecutorError::ChannelSend)?;
            continue;
        }

        let result = match panic::catch_unwind(AssertUnwindSafe(|| solver.solve(part))) {
            Ok(Ok(solved)) => SolverResult {
                year: work.year,
                day: work.day,
                part,
                solve_duration: solved.duration(),
                answer: Ok(solved.answer),
                parse_duration: parse_duration.take(),
            },
            Ok(Err(e)) => {
                let error = ExecutorError::Solver(e.into());
                SolverResult {
                    parse_duration: parse_duration.take(),
                    ..failed(work, part, error.into())
                }
            }
            Err(payload) => {
                let error = ArcExecutorError::from(panicked(work, payload));
                warn!(year = work.year, day = work.day, part, "{}", error);
                poisoned = Some(error.clone());
                SolverResult {
                    parse_duration: parse_duration.take(),
                    ..failed(work, part, error)
                }
            }
        };
        debug!(
            year = work.year,
            day = work.day,
            part,
            ok = result.answer.is_ok(),
            "part finished"
        );
        tx.send(result).map_err(|_| ExecutorError::ChannelSend)?;
    }
    Ok(())
}

/// Input from the command line, the cache, or adventofcode.com in that order
fn fetch_input<'c>(work: &WorkItem, ctx: &'c RunContext) -> Result<Cow<'c, str>, ExecutorError> {
    let (year, day) = (work.year, work.day);
    if let Some(input) = &ctx.explicit_input {
        return Ok(Cow::Borrowed(input.as_str()));
    }

    let fetch_error = |source: Box<dyn std::error::Error + Send + Sync>| {
        ExecutorError::InputFetch { year, day, source }
    };

    if let Some(input) = ctx.cache.get(year, day).map_err(|e| fetch_error(Box::new(e)))? {
        debug!(year, day, "input read from cache");
        return Ok(Cow::Owned(input));
    }

    let client = ctx.client.as_ref().ok_or_else(|| {
        fetch_error(Box::new(std::io::Error::other(
            "not cached and no session token available",
        )))
    })?;
    debug!(year, day, "downloading input");
    let input = client
        .get_input(year, day, &ctx.session)
        .map_err(|e| fetch_error(Box::new(e)))?;

    if let Err(e) = ctx.cache.put(year, day, &input) {
        warn!(
            "{}",
            ExecutorError::CacheWrite {
                year,
                day,
                message: e.to_string(),
            }
        );
    }

    Ok(Cow::Owned(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use advent_solutions::solutions::year_2020;
    use advent_solver::{DynSolver, SolveError, SolveResult, SolverRegistryBuilder};
    use chrono::{DateTime, Utc};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn registry() -> SolverRegistry {
        SolverRegistryBuilder::new()
            .register_solver::<year_2020::day_1::Solver>(2020, 1)
            .unwrap()
            .register_solver::<year_2020::day_5::Solver>(2020, 5)
            .unwrap()
            .register_solver::<year_2020::day_6::Solver>(2020, 6)
            .unwrap()
            .build()
    }

    fn config(cache_dir: &TempDir, parallelize_by: ParallelizeBy) -> Config {
        Config {
            year_filter: None,
            day_filter: None,
            part_filter: None,
            tags: Vec::new(),
            explicit_input: None,
            cache_dir: cache_dir.path().to_path_buf(),
            thread_count: 2,
            parallelize_by,
            session: Zeroizing::new(String::new()),
            quiet: true,
        }
    }

    fn collect(executor: &Executor) -> Vec<SolverResult> {
        let (tx, rx) = mpsc::channel();
        executor.execute(tx).unwrap();
        let mut results: Vec<SolverResult> = rx.into_iter().collect();
        results.sort_by_key(|r| (r.year, r.day, r.part));
        results
    }

    #[test]
    fn test_work_items_follow_filters() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp, ParallelizeBy::Day);
        config.day_filter = Some(5);
        config.part_filter = Some(2);

        let executor = Executor::new(registry(), &config).unwrap();
        let items = executor.collect_work_items();
        assert_eq!(items.len(), 1);
        assert_eq!((items[0].year, items[0].day), (2020, 5));
        assert_eq!(items[0].parts, 2..=2);
    }

    #[test]
    fn test_explicit_input_is_used() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp, ParallelizeBy::Sequential);
        config.day_filter = Some(1);
        config.explicit_input = Some("1721\n979\n366\n299\n675\n1456\n".to_string());

        let executor = Executor::new(registry(), &config).unwrap();
        assert!(executor.missing_inputs(&executor.collect_work_items()).is_empty());

        let results = collect(&executor);
        let answers: Vec<&str> = results
            .iter()
            .map(|r| r.answer.as_deref().unwrap())
            .collect();
        assert_eq!(answers, vec!["514579", "241861950"]);
        assert!(results[0].parse_duration.is_some());
        assert!(results[1].parse_duration.is_none());
    }

    #[test]
    fn test_cached_inputs_across_days() {
        let temp = TempDir::new().unwrap();
        let cache = InputCache::new(temp.path().to_path_buf());
        cache.put(2020, 1, "1721\n979\n366\n299\n675\n1456\n").unwrap();
        cache
            .put(2020, 6, "abc\n\na\nb\nc\n\nab\nac\n\na\na\na\na\n\nb\n")
            .unwrap();

        for mode in [ParallelizeBy::Sequential, ParallelizeBy::Year, ParallelizeBy::Day] {
            let mut config = config(&temp, mode);
            config.part_filter = Some(1);
            let executor = Executor::new(registry(), &config).unwrap();

            let items = executor.collect_work_items();
            assert_eq!(executor.missing_inputs(&items), vec![(2020, 5)]);

            let results = collect(&executor);
            assert_eq!(results.len(), 3);
            assert_eq!(results[0].answer.as_deref().unwrap(), "514579");
            // day 5 has no cached input and no session: an error, not a stop
            assert!(
                results[1]
                    .answer
                    .as_ref()
                    .unwrap_err()
                    .to_string()
                    .contains("Input fetch failed for 2020/5")
            );
            assert_eq!(results[2].answer.as_deref().unwrap(), "11");
        }
    }

    /// Answers part 1, panics on part 2
    struct Fragile;

    impl DynSolver for Fragile {
        fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError> {
            if part == 2 {
                panic!("part two blew up");
            }
            let now = Utc::now();
            Ok(SolveResult {
                answer: "fine".to_string(),
                solve_start: now,
                solve_end: now,
            })
        }
        fn parse_start(&self) -> DateTime<Utc> {
            Utc::now()
        }
        fn parse_end(&self) -> DateTime<Utc> {
            Utc::now()
        }
        fn year(&self) -> u16 {
            2020
        }
        fn day(&self) -> u8 {
            2
        }
        fn parts(&self) -> u8 {
            3
        }
    }

    fn fragile_registry() -> SolverRegistry {
        SolverRegistryBuilder::new()
            .register_solver::<year_2020::day_1::Solver>(2020, 1)
            .unwrap()
            .register_factory(2020, 2, 3, |_| Ok(Box::new(Fragile)))
            .unwrap()
            .register_factory(2020, 3, 2, |_| panic!("{} refused to parse", "day three"))
            .unwrap()
            .build()
    }

    #[test]
    fn test_panicking_solvers_stay_contained() {
        let temp = TempDir::new().unwrap();
        for mode in [ParallelizeBy::Sequential, ParallelizeBy::Year, ParallelizeBy::Day] {
            let mut config = config(&temp, mode);
            config.explicit_input = Some("1721\n979\n366\n299\n675\n1456\n".to_string());
            let executor = Executor::new(fragile_registry(), &config).unwrap();

            let results = collect(&executor);
            let outcomes: Vec<(u8, u8, Result<&str, String>)> = results
                .iter()
                .map(|r| (r.day, r.part, r.answer.as_deref().map_err(|e| e.to_string())))
                .collect();
            assert_eq!(outcomes.len(), 7, "{:?}", outcomes);
            assert_eq!(outcomes[0], (1, 1, Ok("514579")));
            assert_eq!(outcomes[1], (1, 2, Ok("241861950")));
            assert_eq!(outcomes[2], (2, 1, Ok("fine")));
            for (day, _, outcome) in &outcomes[3..5] {
                assert_eq!(*day, 2);
                assert_eq!(
                    outcome.as_ref().unwrap_err(),
                    "Solver for 2020/2 panicked: part two blew up"
                );
            }
            for (day, _, outcome) in &outcomes[5..] {
                assert_eq!(*day, 3);
                assert_eq!(
                    outcome.as_ref().unwrap_err(),
                    "Solver for 2020/3 panicked: day three refused to parse"
                );
            }
        }
    }

    #[test]
    fn test_parse_failure_reported_per_part() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp, ParallelizeBy::Day);
        config.day_filter = Some(5);
        config.explicit_input = Some("not a seat\n".to_string());

        let executor = Executor::new(registry(), &config).unwrap();
        let results = collect(&executor);
        assert_eq!(results.len(), 2);
        for result in results {
            let message = result.answer.unwrap_err().to_string();
            assert!(message.starts_with("Parse error:"), "{}", message);
        }
    }
}
