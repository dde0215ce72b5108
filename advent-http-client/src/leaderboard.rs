//! Private leaderboard model and text rendering
//!
//! AoC has served ids and timestamps both as JSON numbers and as numeric
//! strings over the years, so those fields go through `lenient`.

use crate::error::AocError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

const HEADING_NAME: &str = "NAME";
const HEADING_POINTS: &str = "POINTS";
const HEADING_MOST_RECENT_STAR: &str = "MOST RECENT STAR";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S +0000 UTC";
const TIMESTAMP_WIDTH: usize = "2006-01-02 15:04:05 +0000 UTC".len();

/// A private leaderboard for one event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Leaderboard {
    #[serde(deserialize_with = "lenient::id")]
    pub owner_id: u64,
    pub event: String,
    /// Members keyed by their id as it appears in the JSON
    #[serde(default)]
    pub members: HashMap<String, Member>,
}

/// One member of a private leaderboard
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Member {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    /// `None` for users who have not set a public name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub global_score: u64,
    #[serde(default)]
    pub local_score: u64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_star_ts: Option<DateTime<Utc>>,
    /// day -> part -> when the star was earned
    #[serde(default)]
    pub completion_day_level: BTreeMap<u8, BTreeMap<u8, StarTimestamp>>,
}

/// When a single star was awarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StarTimestamp {
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub get_star_ts: Option<DateTime<Utc>>,
}

impl Member {
    /// The public name, or AoC's placeholder for anonymous users
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("(anonymous user #{})", self.id),
        }
    }
}

impl Leaderboard {
    /// Decode a leaderboard from JSON
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AocError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Members from most to fewest local points; ties by name, then id
    pub fn sorted_members(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by_cached_key(|m| (Reverse(m.local_score), m.display_name(), m.id));
        members
    }
}

impl FromStr for Leaderboard {
    type Err = AocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.members.is_empty() {
            return Ok(());
        }

        let members = self.sorted_members();
        let names: Vec<String> = members.iter().map(|m| m.display_name()).collect();
        let width = names
            .iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(HEADING_NAME.len());

        writeln!(
            f,
            "{:<width$}  {}  {}",
            HEADING_NAME, HEADING_POINTS, HEADING_MOST_RECENT_STAR
        )?;
        writeln!(
            f,
            "{}  {}  {}",
            "=".repeat(width),
            "=".repeat(HEADING_POINTS.len()),
            "=".repeat(TIMESTAMP_WIDTH)
        )?;

        for (member, name) in members.iter().zip(&names) {
            let last_star = match member.last_star_ts {
                Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
                None => "(none)".to_string(),
            };
            writeln!(
                f,
                "{:<width$}  {:>points$}  {:>stamp$}",
                name,
                member.local_score,
                last_star,
                points = HEADING_POINTS.len(),
                stamp = TIMESTAMP_WIDTH,
            )?;
        }
        Ok(())
    }
}

mod lenient {
    use chrono::{DateTime, Utc};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    impl NumberOrString {
        fn into_i64<E: de::Error>(self) -> Result<i64, E> {
            match self {
                NumberOrString::Number(n) => Ok(n),
                NumberOrString::Text(s) => s
                    .trim()
                    .parse()
                    .map_err(|_| E::custom(format!("expected a number, got {:?}", s))),
            }
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let n = NumberOrString::deserialize(deserializer)?.into_i64()?;
        u64::try_from(n).map_err(|_| de::Error::custom(format!("negative id {}", n)))
    }

    /// Unix seconds; null and 0 both mean "never"
    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => match raw.into_i64()? {
                0 => Ok(None),
                secs => DateTime::from_timestamp(secs, 0)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("timestamp {} out of range", secs))),
            },
        }
    }
}
