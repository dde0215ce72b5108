//! Configuration resolution for the `run` subcommand

use crate::cli::{ParallelizeBy, RunArgs};
use crate::error::CliError;
use std::io::Read;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Environment variable holding the adventofcode.com session cookie
pub const SESSION_ENV: &str = "AOC_SESSION_TOKEN";

/// Resolved runtime configuration
pub struct Config {
    /// Year filter (None = all years)
    pub year_filter: Option<u16>,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Input given on the command line; replaces cache and download
    pub explicit_input: Option<String>,
    /// Cache directory path
    pub cache_dir: PathBuf,
    pub thread_count: usize,
    pub parallelize_by: ParallelizeBy,
    /// Session key, empty when unknown (zeroized on drop)
    pub session: Zeroizing<String>,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args, reading `--input` eagerly
    pub fn from_args(args: RunArgs) -> Result<Self, CliError> {
        let explicit_input = match &args.input {
            Some(path) => Some(read_input(path, std::io::stdin().lock())?),
            None => None,
        };

        let session = std::env::var(SESSION_ENV)
            .map(Zeroizing::new)
            .unwrap_or_else(|_| Zeroizing::new(String::new()));

        Ok(Config {
            year_filter: args.year,
            day_filter: args.day,
            part_filter: args.part,
            tags: args.tags,
            explicit_input,
            cache_dir: expand_tilde(&args.cache_dir),
            thread_count: args.threads.unwrap_or_else(num_cpus),
            parallelize_by: args.parallelize_by,
            session,
            quiet: args.quiet,
        })
    }
}

/// Read puzzle input from `path`, or from `stdin` when the path is `-`
fn read_input(path: &Path, mut stdin: impl Read) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut input = String::new();
        stdin.read_to_string(&mut input)?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read input {}: {}", path.display(), e))
        })
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.trim_start_matches('~').trim_start_matches('/'));
    }
    path.to_path_buf()
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Prompt for the session token without echoing it
pub fn prompt_session(reason: &str) -> Result<Zeroizing<String>, CliError> {
    println!("{}", reason);
    let session = Zeroizing::new(
        rpassword::prompt_password("Enter AOC session key: ")
            .map_err(|e| CliError::Config(format!("Failed to read session: {}", e)))?,
    );
    if session.trim().is_empty() {
        return Err(CliError::Config("Session token is required.".to_string()));
    }
    Ok(session)
}
