//! `leaderboard` subcommand

use crate::calendar;
use crate::cli::LeaderboardArgs;
use crate::config::SESSION_ENV;
use crate::error::CliError;
use advent_http_client::{AocClient, Leaderboard};
use chrono::{DateTime, Utc};
use std::io::Read;
use tracing::info;
use zeroize::Zeroizing;

/// Where the leaderboard JSON comes from
pub enum Source {
    /// A JSON document piped in on stdin
    Stdin,
    /// Fetched from adventofcode.com
    Fetch {
        year: u16,
        id: u64,
        session: Zeroizing<String>,
    },
}

impl Source {
    /// Decide the source from the flags; `env_token` is the value of `AOC_SESSION_TOKEN`
    pub fn resolve(
        args: LeaderboardArgs,
        env_token: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, CliError> {
        let token = args
            .token
            .or(env_token)
            .filter(|t| !t.is_empty())
            .map(Zeroizing::new);

        match (args.id, token) {
            (None, None) => Ok(Source::Stdin),
            (Some(id), Some(session)) => Ok(Source::Fetch {
                year: args
                    .year
                    .unwrap_or_else(|| calendar::latest_event_year(now)),
                id,
                session,
            }),
            (Some(_), None) => Err(CliError::Config(format!(
                "--id needs a session token (--token or {})",
                SESSION_ENV
            ))),
            (None, Some(_)) => Err(CliError::Config(
                "a session token was given without --id".to_string(),
            )),
        }
    }

    pub fn load(self, stdin: impl Read) -> Result<Leaderboard, CliError> {
        match self {
            Source::Stdin => Ok(Leaderboard::from_reader(stdin)?),
            Source::Fetch { year, id, session } => {
                info!(year, id, "fetching private leaderboard");
                Ok(AocClient::new()?.get_leaderboard(year, id, &session)?)
            }
        }
    }
}

pub fn run(args: LeaderboardArgs) -> Result<(), CliError> {
    let source = Source::resolve(args, std::env::var(SESSION_ENV).ok(), Utc::now())?;
    let board = source.load(std::io::stdin().lock())?;
    print!("{}", board);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(id: Option<u64>, token: Option<&str>, year: Option<u16>) -> LeaderboardArgs {
        LeaderboardArgs {
            id,
            token: token.map(str::to_string),
            year,
        }
    }

    fn july_2021() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 7, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_flags_reads_stdin() {
        let source = Source::resolve(args(None, None, None), None, july_2021()).unwrap();
        assert!(matches!(source, Source::Stdin));

        let json = r#"{"owner_id": 1, "event": "2020", "members": {
            "1": {"id": 1, "name": "Ada", "local_score": 3}
        }}"#;
        let board = source.load(json.as_bytes()).unwrap();
        assert_eq!(board.members["1"].local_score, 3);
    }

    #[test]
    fn test_id_and_token_fetch() {
        let source = Source::resolve(args(Some(99), Some("abc"), None), None, july_2021()).unwrap();
        let Source::Fetch { year, id, session } = source else {
            panic!("expected fetch");
        };
        assert_eq!(year, 2020);
        assert_eq!(id, 99);
        assert_eq!(session.as_str(), "abc");
    }

    #[test]
    fn test_token_from_environment() {
        let source = Source::resolve(
            args(Some(99), None, Some(2019)),
            Some("from-env".to_string()),
            july_2021(),
        )
        .unwrap();
        assert!(matches!(source, Source::Fetch { year: 2019, .. }));
    }

    #[test]
    fn test_half_configured_is_an_error() {
        assert!(matches!(
            Source::resolve(args(Some(99), None, None), None, july_2021()),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            Source::resolve(args(None, Some("abc"), None), None, july_2021()),
            Err(CliError::Config(_))
        ));
        assert!(matches!(
            Source::resolve(args(Some(99), Some(""), None), None, july_2021()),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_stdin_garbage_is_reported() {
        let result = Source::Stdin.load("not json".as_bytes());
        assert!(matches!(result, Err(CliError::Http(_))));
    }
}
