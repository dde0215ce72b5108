//! AoC HTTP Client Library
//!
//! Blocking access to adventofcode.com: puzzle inputs and private leaderboards.
//! TLS goes through rustls, redirects are never followed (an expired session
//! shows up as a 3xx status instead of the login page), and the session cookie
//! header is marked sensitive.
//!
//! # Example
//!
//! ```no_run
//! use advent_http_client::AocClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AocClient::new()?;
//! let session = "your_session_cookie_here";
//!
//! let input = client.get_input(2020, 1, session)?;
//! println!("{} bytes of input", input.len());
//!
//! let leaderboard = client.get_leaderboard(2020, 123456, session)?;
//! print!("{}", leaderboard);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod leaderboard;

pub use client::{AocClient, AocClientBuilder};
pub use error::AocError;
pub use leaderboard::{Leaderboard, Member, StarTimestamp};
