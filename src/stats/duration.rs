use std::fmt;

use serde::Serialize;

use crate::data::model::TripTable;
use crate::error::{Result, StatsError};

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Total and average trip duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    /// Sum of all durations; zero for an empty table.
    pub total_seconds: f64,
    pub trip_count: usize,
}

impl DurationStats {
    /// Arithmetic mean duration. Undefined, and therefore an error, when
    /// there are no trips.
    pub fn mean_seconds(&self) -> Result<f64> {
        if self.trip_count == 0 {
            return Err(StatsError::NoData {
                statistic: "mean trip duration",
            });
        }
        Ok(self.total_seconds / self.trip_count as f64)
    }
}

pub fn duration_stats(table: &TripTable) -> DurationStats {
    DurationStats {
        total_seconds: table.iter().map(|trip| trip.trip_duration).sum(),
        trip_count: table.len(),
    }
}

/// A number of seconds split into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    /// Whatever is left below a minute, fractional part included.
    pub seconds: f64,
}

impl Breakdown {
    /// Split `seconds` by successive floor division. `seconds` must not be
    /// negative.
    pub fn from_seconds(seconds: f64) -> Self {
        debug_assert!(seconds >= 0.0, "negative duration: {seconds}");
        let days = (seconds / SECONDS_PER_DAY).floor();
        let rest = seconds % SECONDS_PER_DAY;
        let hours = (rest / SECONDS_PER_HOUR).floor();
        let rest = rest % SECONDS_PER_HOUR;
        let minutes = (rest / SECONDS_PER_MINUTE).floor();
        Breakdown {
            days: days as u64,
            hours: hours as u32,
            minutes: minutes as u32,
            seconds: rest % SECONDS_PER_MINUTE,
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days, {} hours, {} minutes and ",
            self.days, self.hours, self.minutes
        )?;
        if self.seconds.fract() == 0.0 {
            write!(f, "{:.0} seconds", self.seconds)
        } else {
            write!(f, "{:.2} seconds", self.seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn table(durations: &[f64]) -> TripTable {
        let start = NaiveDate::from_ymd_opt(2017, 4, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .expect("valid timestamp");
        let trips = durations
            .iter()
            .map(|d| TripRecord::new(start, *d, "A", "B"))
            .collect();
        TripTable::new(Schema::default(), trips)
    }

    #[test]
    fn total_and_breakdown() {
        let stats = duration_stats(&table(&[0.0, 3661.0, 90.0]));
        assert_eq!(stats.total_seconds, 3751.0);
        assert_eq!(
            Breakdown::from_seconds(stats.total_seconds),
            Breakdown {
                days: 0,
                hours: 1,
                minutes: 2,
                seconds: 31.0,
            }
        );
        let mean = stats.mean_seconds().expect("non-empty");
        assert!((mean - 3751.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_total_is_zero_but_mean_fails() {
        let stats = duration_stats(&table(&[]));
        assert_eq!(stats.total_seconds, 0.0);
        assert!(matches!(
            stats.mean_seconds(),
            Err(StatsError::NoData { .. })
        ));
    }

    #[test]
    fn breakdown_over_a_day() {
        let b = Breakdown::from_seconds(2.0 * 86_400.0 + 5.0 * 3_600.0 + 59.0 * 60.0 + 12.5);
        assert_eq!((b.days, b.hours, b.minutes), (2, 5, 59));
        assert!((b.seconds - 12.5).abs() < 1e-9);
        assert_eq!(b.to_string(), "2 days, 5 hours, 59 minutes and 12.50 seconds");
        assert_eq!(
            Breakdown::from_seconds(3751.0).to_string(),
            "0 days, 1 hours, 2 minutes and 31 seconds"
        );
    }
}
