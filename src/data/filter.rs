use std::fmt;
use std::str::FromStr;

use chrono::{Month, Weekday};
use serde::Serialize;
use thiserror::Error;

use super::model::{month_name, weekday_name, City, TripRecord, TripTable};

// ---------------------------------------------------------------------------
// Filter predicates: month and day of week
// ---------------------------------------------------------------------------

/// Months the datasets cover, in the order the shell offers them.
pub const OFFERED_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Month filter. `All` disables month filtering entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

/// Day-of-week filter. `All` disables day filtering entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Only(Weekday),
}

impl MonthFilter {
    pub fn matches(self, trip: &TripRecord) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(month) => trip.month == month,
        }
    }
}

impl DayFilter {
    pub fn matches(self, trip: &TripRecord) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(day) => trip.day_of_week == day,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(m) => f.write_str(month_name(*m)),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// A filter value that names no month/day. Raised at the input boundary only;
/// the filter types themselves cannot hold an invalid value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for MonthFilter {
    type Err = UnknownChoice;

    /// Accepts `all` or a full month name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(MonthFilter::All);
        }
        (1..=12u8)
            .filter_map(|n| Month::try_from(n).ok())
            .find(|m| month_name(*m).to_lowercase() == wanted)
            .map(MonthFilter::Only)
            .ok_or_else(|| UnknownChoice {
                kind: "month",
                value: s.to_string(),
            })
    }
}

impl FromStr for DayFilter {
    type Err = UnknownChoice;

    /// Accepts `all` or a full weekday name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(DayFilter::All);
        }
        WEEKDAYS
            .into_iter()
            .find(|d| weekday_name(*d).to_lowercase() == wanted)
            .map(DayFilter::Only)
            .ok_or_else(|| UnknownChoice {
                kind: "day",
                value: s.to_string(),
            })
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for DayFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The (city, month, day) triple that decides which trips take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSelection {
    /// Selection with no month or day filtering.
    pub fn unfiltered(city: City) -> Self {
        FilterSelection {
            city,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Applying filters
// ---------------------------------------------------------------------------

/// Return indices of trips that pass both filters, in table order.
///
/// The two filters are independent and combine with AND. An `All` filter
/// places no constraint on its dimension.
pub fn filtered_indices(table: &TripTable, month: MonthFilter, day: DayFilter) -> Vec<usize> {
    table
        .iter()
        .enumerate()
        .filter(|(_, trip)| month.matches(trip) && day.matches(trip))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new table holding only the trips that pass both filters.
/// The input table is left untouched.
pub fn apply(table: &TripTable, month: MonthFilter, day: DayFilter) -> TripTable {
    if month == MonthFilter::All && day == DayFilter::All {
        return table.clone();
    }
    let kept: Vec<TripRecord> = filtered_indices(table, month, day)
        .into_iter()
        .filter_map(|i| table.trips().get(i).cloned())
        .collect();
    log::debug!(
        "filter month={month} day={day}: kept {} of {} trips",
        kept.len(),
        table.len()
    );
    TripTable::new(table.schema(), kept)
}
