//! Error taxonomy for rate retrieval.

use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by a rate provider.
///
/// A missing archive entry for the exact requested date is not represented
/// here: providers recover from it by walking back one day at a time, and
/// only the exhaustion of that walk becomes an error.
#[derive(Debug, Error)]
pub enum RateError {
    /// Network-level failure (DNS, timeout, connection). Terminal, no
    /// snapshot was produced.
    #[error("rate service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but the body was not a rate snapshot.
    #[error("failed to parse rate snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backward walk over unpublished dates hit its bound.
    #[error("no rates published between {earliest} and {requested}")]
    LookbackExhausted {
        requested: NaiveDate,
        earliest: NaiveDate,
    },
}
