//! Statistics engine: read-only aggregations over a [`TripTable`].
//!
//! ```text
//!   TripTable (filtered)
//!        │
//!        ├──► time      most common month / day / hour
//!        ├──► station   most common start, end and start→end trip
//!        ├──► duration  total and mean trip duration
//!        └──► user      user types, gender, birth years
//! ```
//!
//! Each routine is independent: a `NoData` error from one says nothing about
//! the others.
//!
//! [`TripTable`]: crate::data::model::TripTable

pub mod duration;
pub mod mode;
pub mod station;
pub mod time;
pub mod user;

use std::time::{Duration, Instant};

use serde::Serialize;

pub use duration::{duration_stats, Breakdown, DurationStats};
pub use mode::{most_common, ModeResult};
pub use station::{station_stats, StationPair, StationStats};
pub use time::{time_stats, TimeStats};
pub use user::{
    birth_year_summary, gender_counts, user_stats, user_type_counts, BirthYearSummary,
    CategoryCount, UserStats,
};

// ---------------------------------------------------------------------------
// Applicable – results for columns a dataset may not have
// ---------------------------------------------------------------------------

/// Result for an optional column. `NotApplicable` means the dataset never
/// has the column, which is different from an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicable<T> {
    NotApplicable,
    Present(T),
}

impl<T> Applicable<T> {
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Applicable::Present(value) => Some(value),
            Applicable::NotApplicable => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// A value together with how long it took to compute.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

/// Run `f`, measuring its wall time and logging it under `label`.
pub fn timed<T>(label: &str, f: impl FnOnce() -> T) -> Timed<T> {
    let started = Instant::now();
    let value = f();
    let elapsed = started.elapsed();
    log::debug!("{label} took {:.6}s", elapsed.as_secs_f64());
    Timed { value, elapsed }
}
