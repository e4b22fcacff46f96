//! Chess.com public API access.
//!
//! The lookup tool asks this module for a player profile. The profile is
//! fetched from `GET {base_url}/pub/player/{username}` and returned as a raw
//! JSON object; picking fields out of it is the caller's job.
//!
//! [`ProfileClient`] is the seam between the tool invoker and the network.
//! [`ChesscomClient`] is the real implementation; tests substitute their own.

pub mod client;
pub mod error;

pub use client::ChesscomClient;
pub use error::{LookupError, LookupResult};

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Longest username accepted before a request is built.
pub const MAX_USERNAME_LEN: usize = 64;

/// Source of player profiles.
#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// Fetches the profile object for `username`.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] describing why no profile data is available.
    async fn fetch_profile(&self, username: &str) -> LookupResult<Map<String, Value>>;
}

/// Checks that `username` is safe to place in a URL path.
///
/// Chess.com usernames consist of ASCII letters, digits, `_` and `-`.
/// Anything else is rejected before a request is made.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
