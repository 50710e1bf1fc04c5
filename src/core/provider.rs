//! Rate retrieval abstraction.

use crate::core::error::RateError;
use crate::core::snapshot::RateSnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the rate snapshot for `date`.
    ///
    /// Implementations may fall back to an earlier publication date when
    /// the requested one has no data; callers must read the returned
    /// snapshot's effective date rather than assume the requested one.
    async fn fetch(&self, date: NaiveDate) -> Result<RateSnapshot, RateError>;
}
