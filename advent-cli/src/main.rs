//! advent - run Advent of Code solvers, bootstrap new days, show leaderboards

mod aggregator;
mod bootstrap;
mod cache;
mod calendar;
mod cli;
mod config;
mod error;
mod executor;
mod leaderboard;
mod output;

// Link the solutions crate so its plugins reach the inventory
use advent_solutions as _;

use advent_solver::{SolverRegistry, SolverRegistryBuilder};
use clap::Parser;
use cli::{Args, Command, RunArgs};
use config::Config;
use error::CliError;
use executor::Executor;
use output::OutputFormatter;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbose).and_then(|()| dispatch(args.command)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) -> Result<(), CliError> {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Config(format!("invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
    Ok(())
}

fn dispatch(command: Command) -> Result<(), CliError> {
    match command {
        Command::Run(args) => run(args),
        Command::Bootstrap(args) => {
            let plan = bootstrap::Plan::resolve(args, chrono::Utc::now())?;
            let target = bootstrap::run(&plan)?;
            println!("bootstrapped {}/{:02} at {}", plan.year, plan.day, target.display());
            Ok(())
        }
        Command::Leaderboard(args) => leaderboard::run(args),
    }
}

fn run(args: RunArgs) -> Result<(), CliError> {
    let config = Config::from_args(args)?;
    let registry = build_registry(&config.tags)?;
    let mut executor = Executor::new(registry, &config)?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    let missing = executor.missing_inputs(&work_items);
    if !missing.is_empty() {
        debug!(count = missing.len(), "inputs not cached");
        if !executor.has_session() {
            println!("Missing {} input file(s):", missing.len());
            for (year, day) in &missing {
                println!("  - {}/day{:02}", year, day);
            }
            println!();
            let session = config::prompt_session(
                "Session token required to fetch missing inputs from adventofcode.com",
            )?;
            executor.set_session(session)?;
        }
    }

    run_executor(executor, &work_items, config.quiet)
}

/// Run the executor on a worker thread, printing results in order as they arrive
fn run_executor(
    executor: Executor,
    work_items: &[executor::WorkItem],
    quiet: bool,
) -> Result<(), CliError> {
    if !quiet {
        println!("Running {} solver(s)...", work_items.len());
    }

    let expected_keys: Vec<aggregator::ResultKey> = work_items
        .iter()
        .flat_map(|w| {
            w.parts.clone().map(move |part| aggregator::ResultKey {
                year: w.year,
                day: w.day,
                part,
            })
        })
        .collect();

    let (tx, rx) = std::sync::mpsc::channel();
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    let formatter = OutputFormatter::new(quiet);
    let mut aggregator = aggregator::ResultAggregator::new(expected_keys);
    let mut results = Vec::new();

    for result in rx {
        for ready in aggregator.add(result) {
            formatter.print_result(&ready);
            results.push(ready);
        }
    }

    for ready in aggregator.drain() {
        formatter.print_result(&ready);
        results.push(ready);
    }
    if !aggregator.is_complete() {
        warn!("not all expected results were received");
    }

    executor_handle
        .join()
        .map_err(|_| CliError::Config("Executor thread panicked".to_string()))??;

    formatter.print_summary(&results);
    Ok(())
}

/// Registry of all linked solvers carrying every requested tag
fn build_registry(tags: &[String]) -> Result<SolverRegistry, CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_with_tags() {
        let all = build_registry(&[]).unwrap();
        assert!(all.storage().contains(2020, 1));
        assert!(all.storage().contains(2015, 1));

        let grid = build_registry(&["grid".to_string()]).unwrap();
        let days: Vec<u8> = grid.storage().iter_info().map(|i| i.day).collect();
        assert_eq!(days, vec![3, 11]);

        let both = build_registry(&["grid".to_string(), "simulation".to_string()]).unwrap();
        let days: Vec<u8> = both.storage().iter_info().map(|i| i.day).collect();
        assert_eq!(days, vec![11]);

        let none = build_registry(&["no-such-tag".to_string()]).unwrap();
        assert!(none.storage().is_empty());
    }
}
