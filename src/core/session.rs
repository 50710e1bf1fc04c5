//! Converter state transitions.
//!
//! Selecting a date requires a fresh snapshot; selecting a currency or
//! editing the amount only requires a recompute. The session performs no
//! I/O itself: `select_date` hands the caller a [`FetchRequest`] and
//! `apply_snapshot` installs the result once the fetch completes. Each
//! request carries a generation number so that when a newer date selection
//! supersedes an in-flight fetch, the stale result is dropped instead of
//! overwriting the fresher one.

use crate::core::convert::convert;
use crate::core::snapshot::RateSnapshot;
use chrono::NaiveDate;
use tracing::debug;

/// A pending fetch the caller must perform on the session's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub date: NaiveDate,
}

pub struct ConverterSession {
    snapshot: Option<RateSnapshot>,
    selected_date: Option<NaiveDate>,
    from_code: Option<String>,
    to_code: Option<String>,
    input_amount: f64,
    converted_amount: Option<f64>,
    generation: u64,
}

impl ConverterSession {
    pub fn new() -> Self {
        ConverterSession {
            snapshot: None,
            selected_date: None,
            from_code: None,
            to_code: None,
            input_amount: 1.0,
            converted_amount: None,
            generation: 0,
        }
    }

    /// Selects a new rate date. Returns the fetch to perform, or `None`
    /// when the date did not change.
    pub fn select_date(&mut self, date: NaiveDate) -> Option<FetchRequest> {
        if self.selected_date == Some(date) {
            return None;
        }
        self.selected_date = Some(date);
        self.generation += 1;
        Some(FetchRequest {
            generation: self.generation,
            date,
        })
    }

    /// Installs a fetched snapshot. Returns `false` when the request has
    /// been superseded by a newer date selection; the snapshot is then
    /// discarded so the fresher fetch wins.
    pub fn apply_snapshot(&mut self, generation: u64, snapshot: RateSnapshot) -> bool {
        if generation != self.generation {
            debug!(
                "Dropping stale snapshot (generation {} superseded by {})",
                generation, self.generation
            );
            return false;
        }

        // The snapshot may be for an earlier date than requested; the
        // displayed selection follows what was actually published.
        self.selected_date = Some(snapshot.effective_date());

        let first = snapshot.codes().first().map(|c| c.to_string());
        let keep = |selection: &Option<String>| match selection {
            Some(code) if snapshot.get(code).is_some() => selection.clone(),
            _ => first.clone(),
        };
        self.from_code = keep(&self.from_code);
        self.to_code = keep(&self.to_code);

        self.snapshot = Some(snapshot);
        self.recompute();
        true
    }

    pub fn select_from(&mut self, code: &str) {
        self.from_code = Some(code.to_string());
        self.recompute();
    }

    pub fn select_to(&mut self, code: &str) {
        self.to_code = Some(code.to_string());
        self.recompute();
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.input_amount = amount;
        self.recompute();
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn from_code(&self) -> Option<&str> {
        self.from_code.as_deref()
    }

    pub fn to_code(&self) -> Option<&str> {
        self.to_code.as_deref()
    }

    pub fn input_amount(&self) -> f64 {
        self.input_amount
    }

    /// The current conversion result. `None` while no snapshot is loaded
    /// or while a selected code is absent from the snapshot, which can
    /// happen transiently after a refresh.
    pub fn converted(&self) -> Option<f64> {
        self.converted_amount
    }

    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        self.snapshot.as_ref()
    }

    fn recompute(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            self.converted_amount = None;
            return;
        };

        let from = self.from_code.as_deref().and_then(|c| snapshot.get(c));
        let to = self.to_code.as_deref().and_then(|c| snapshot.get(c));

        self.converted_amount = match (from, to) {
            (Some(from), Some(to)) => Some(convert(Some(from), Some(to), self.input_amount)),
            _ => None,
        };
    }
}

impl Default for ConverterSession {
    fn default() -> Self {
        Self::new()
    }
}
