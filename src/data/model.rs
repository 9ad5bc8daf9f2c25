use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::error::StatsError;

// ---------------------------------------------------------------------------
// City – the closed set of known datasets
// ---------------------------------------------------------------------------

/// One of the cities a trip log exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lowercase key used for lookup and prompting, e.g. `"new york city"`.
    pub const fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// File name of the city's dataset inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        f.write_str(name)
    }
}

impl FromStr for City {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or(StatsError::DatasetNotFound {
                city: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Calendar names
// ---------------------------------------------------------------------------

/// Full English month name, e.g. `"June"`.
pub fn month_name(month: Month) -> &'static str {
    month.name()
}

/// Full English weekday name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// TripRecord – one row of the trip log
// ---------------------------------------------------------------------------

/// A single trip (one row of the source CSV) with its derived temporal
/// features.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    /// Kept verbatim for raw-row display only.
    pub end_time: Option<String>,
    /// Seconds, never negative.
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    /// `None` for a blank cell.
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    // Derived from `start_time` at construction.
    pub month: Month,
    pub day_of_week: Weekday,
    pub hour: u32,
}

impl TripRecord {
    /// Build a record and derive `month`, `day_of_week` and `hour`.
    pub fn new(
        start_time: NaiveDateTime,
        trip_duration: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        // `month()` is always 1..=12, so the fallback is never taken.
        let month = Month::try_from(start_time.month() as u8).unwrap_or(Month::January);
        TripRecord {
            start_time,
            end_time: None,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month,
            day_of_week: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<String>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }
}

// ---------------------------------------------------------------------------
// Schema / TripTable
// ---------------------------------------------------------------------------

/// Which optional columns the dataset carries. A property of the whole
/// file, never of individual rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    /// Schema with every optional column present.
    pub const FULL: Schema = Schema {
        has_gender: true,
        has_birth_year: true,
    };
}

/// An ordered set of trips sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    schema: Schema,
    trips: Vec<TripRecord>,
}

impl TripTable {
    pub fn new(schema: Schema, trips: Vec<TripRecord>) -> Self {
        TripTable { schema, trips }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.trips.iter()
    }

    /// Number of trips.
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the table has no trips.
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

impl<'a> IntoIterator for &'a TripTable {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}

// ---------------------------------------------------------------------------
// Field – columns a mode can be computed over
// ---------------------------------------------------------------------------

/// A categorical column of the trip table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Month,
    DayOfWeek,
    Hour,
    StartStation,
    EndStation,
    UserType,
    Gender,
    BirthYear,
}

impl Field {
    /// Human readable column label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Month => "Month",
            Field::DayOfWeek => "Day",
            Field::Hour => "Hour",
            Field::StartStation => "Start Station",
            Field::EndStation => "End Station",
            Field::UserType => "User Type",
            Field::Gender => "Gender",
            Field::BirthYear => "Birth Year",
        }
    }

    /// The rendered value of this column for one trip, `None` if missing.
    pub fn value_of(self, trip: &TripRecord) -> Option<String> {
        match self {
            Field::Month => Some(month_name(trip.month).to_string()),
            Field::DayOfWeek => Some(weekday_name(trip.day_of_week).to_string()),
            Field::Hour => Some(trip.hour.to_string()),
            Field::StartStation => Some(trip.start_station.clone()),
            Field::EndStation => Some(trip.end_station.clone()),
            Field::UserType => trip.user_type.clone(),
            Field::Gender => trip.gender.clone(),
            Field::BirthYear => trip.birth_year.map(|y| y.to_string()),
        }
    }

    /// Whether a table with `schema` has this column at all.
    pub fn is_present_in(self, schema: Schema) -> bool {
        match self {
            Field::Gender => schema.has_gender,
            Field::BirthYear => schema.has_birth_year,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 15, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn derives_temporal_features() {
        // 2017-06-23 was a Friday.
        let trip = TripRecord::new(at(2017, 6, 23, 15), 321.0, "A", "B");
        assert_eq!(trip.month, Month::June);
        assert_eq!(trip.day_of_week, Weekday::Fri);
        assert_eq!(trip.hour, 15);
        assert_eq!(Field::Month.value_of(&trip).as_deref(), Some("June"));
        assert_eq!(Field::DayOfWeek.value_of(&trip).as_deref(), Some("Friday"));
        assert_eq!(Field::Hour.value_of(&trip).as_deref(), Some("15"));
    }

    #[test]
    fn city_lookup_is_case_insensitive() {
        assert_eq!("Chicago".parse::<City>().ok(), Some(City::Chicago));
        assert_eq!(
            " New York City ".parse::<City>().ok(),
            Some(City::NewYorkCity)
        );
        assert!(matches!(
            "boston".parse::<City>(),
            Err(StatsError::DatasetNotFound { .. })
        ));
    }

    #[test]
    fn optional_fields_follow_schema() {
        let schema = Schema {
            has_gender: false,
            has_birth_year: true,
        };
        assert!(!Field::Gender.is_present_in(schema));
        assert!(Field::BirthYear.is_present_in(schema));
        assert!(Field::StartStation.is_present_in(schema));
    }
}
