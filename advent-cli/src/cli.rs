//! CLI argument parsing using clap

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Parallelization level for solver execution
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ParallelizeBy {
    /// Execute all solvers one after another
    Sequential,
    /// Parallelize across years; days run in order within a year
    Year,
    /// Parallelize across year/day combinations (default)
    #[default]
    Day,
}

/// Advent of Code solutions and tooling
#[derive(Parser, Debug)]
#[command(name = "advent", about = "Advent of Code solutions and tooling", version)]
pub struct Args {
    /// More log output on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run registered solvers and print their answers
    Run(RunArgs),
    /// Create the source file for a new puzzle day from a template
    #[command(visible_alias = "b")]
    Bootstrap(BootstrapArgs),
    /// Show the standings of a private leaderboard
    #[command(visible_alias = "lb")]
    Leaderboard(LeaderboardArgs),
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    /// Year to run (runs all years if omitted)
    #[arg(short, long)]
    pub year: Option<u16>,

    /// Day to run (runs all days if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: Option<u8>,

    /// Part to run (runs all parts if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub part: Option<u8>,

    /// Tags to filter solvers (comma-separated, all must match)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Read the puzzle input from a file, or stdin with `-`
    #[arg(short, long, requires_all = ["year", "day"])]
    pub input: Option<PathBuf>,

    /// Cache directory for puzzle inputs
    #[arg(long, default_value = "~/.cache/advent")]
    pub cache_dir: PathBuf,

    /// Number of threads for parallel execution
    #[arg(long)]
    pub threads: Option<usize>,

    /// Parallelization level: sequential, year or day
    #[arg(long, value_enum, default_value = "day")]
    pub parallelize_by: ParallelizeBy,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ClapArgs, Debug)]
pub struct BootstrapArgs {
    /// Day to bootstrap (defaults to the day of the next puzzle release)
    #[arg(short, long)]
    pub day: Option<u8>,

    /// Event year (defaults to the most recent event)
    #[arg(short, long)]
    pub year: Option<u16>,

    /// Template file to render instead of the built-in one
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Directory holding the `year_*` solution modules
    #[arg(long, default_value = "advent-solutions/src/solutions")]
    pub puzzle_root: PathBuf,

    /// Overwrite the target file if it already exists
    #[arg(short, long)]
    pub force: bool,
}

#[derive(ClapArgs, Debug)]
pub struct LeaderboardArgs {
    /// Private leaderboard id
    #[arg(long)]
    pub id: Option<u64>,

    /// Session token (falls back to AOC_SESSION_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Event year (defaults to the most recent event)
    #[arg(short, long)]
    pub year: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommand_aliases() {
        let args = Args::try_parse_from(["advent", "b", "-d", "3", "-y", "2020"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Bootstrap(BootstrapArgs { day: Some(3), year: Some(2020), .. })
        ));

        let args = Args::try_parse_from(["advent", "-vv", "lb", "--id", "7"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(
            args.command,
            Command::Leaderboard(LeaderboardArgs { id: Some(7), token: None, .. })
        ));
    }

    #[test]
    fn test_run_filters() {
        let args =
            Args::try_parse_from(["advent", "run", "-y", "2020", "-t", "grid,simulation", "-q"])
                .unwrap();
        let Command::Run(run) = args.command else {
            panic!("expected run");
        };
        assert_eq!(run.year, Some(2020));
        assert_eq!(run.tags, vec!["grid", "simulation"]);
        assert_eq!(run.parallelize_by, ParallelizeBy::Day);
        assert!(run.quiet);
    }

    #[test]
    fn test_input_requires_year_and_day() {
        assert!(Args::try_parse_from(["advent", "run", "--input", "-"]).is_err());
        assert!(Args::try_parse_from(["advent", "run", "-y", "2020", "--input", "-"]).is_err());
        assert!(
            Args::try_parse_from(["advent", "run", "-y", "2020", "-d", "1", "--input", "-"])
                .is_ok()
        );
    }

    #[test]
    fn test_run_day_out_of_range() {
        assert!(Args::try_parse_from(["advent", "run", "-d", "26"]).is_err());
        assert!(Args::try_parse_from(["advent", "run", "-p", "3"]).is_err());
    }
}
