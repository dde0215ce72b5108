//! Event calendar arithmetic
//!
//! Puzzles unlock at midnight US Eastern time. The release clock is kept at a
//! fixed UTC-5, which is what Eastern time is throughout December.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Utc};

/// Wall-clock time in the puzzle release timezone
fn release_clock(now: DateTime<Utc>) -> NaiveDateTime {
    now.naive_utc() - TimeDelta::hours(5)
}

/// Day of month the next puzzle belongs to
///
/// In the last hour before midnight this is already the following day, so a
/// bootstrap just before release prepares the right file.
pub fn likely_puzzle_day(now: DateTime<Utc>) -> u32 {
    (release_clock(now) + TimeDelta::hours(1)).day()
}

/// Year of the most recent event that has started
pub fn latest_event_year(now: DateTime<Utc>) -> u16 {
    let clock = release_clock(now);
    let year = if clock.month() == 12 {
        clock.year()
    } else {
        clock.year() - 1
    };
    year as u16
}
