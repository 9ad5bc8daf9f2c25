use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;

use super::filter::{self, DayFilter, MonthFilter};
use super::model::{City, Schema, TripRecord, TripTable};
use crate::config::Config;
use crate::error::{Result, StatsError};

const START_TIME: &str = "Start Time";
const TRIP_DURATION: &str = "Trip Duration";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [
    START_TIME,
    TRIP_DURATION,
    START_STATION,
    END_STATION,
    USER_TYPE,
];

/// Timestamp layouts accepted for `Start Time`.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset for `city` from the configured data directory and apply
/// the month and day filters.
///
/// `city` is matched case-insensitively against the known cities; anything
/// else fails with [`StatsError::DatasetNotFound`].
pub fn load(
    config: &Config,
    city: &str,
    month: MonthFilter,
    day: DayFilter,
) -> Result<TripTable> {
    let city: City = city.parse()?;
    load_city(config, city, month, day)
}

/// Same as [`load`] for an already resolved city.
pub fn load_city(
    config: &Config,
    city: City,
    month: MonthFilter,
    day: DayFilter,
) -> Result<TripTable> {
    let path = config.dataset_path(city);
    log::info!("loading {city} trips from {}", path.display());
    load_path(&path, month, day)
}

/// Load and filter a trip CSV at an explicit path.
pub fn load_path(path: &Path, month: MonthFilter, day: DayFilter) -> Result<TripTable> {
    let file = File::open(path).map_err(|source| StatsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file, month, day)
}

/// Load and filter trips from any CSV source.
pub fn load_reader<R: Read>(reader: R, month: MonthFilter, day: DayFilter) -> Result<TripTable> {
    let table = read_trips(reader)?;
    Ok(filter::apply(&table, month, day))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Raw text of one CSV row. Columns not listed here (`End Time`, the unnamed
/// index column some exports carry) are ignored by serde.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

/// Read every row into a [`TripTable`]. The first bad row aborts the load.
pub fn read_trips<R: Read>(reader: R) -> Result<TripTable> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(StatsError::MalformedRecord {
                line: 1,
                column,
                value: String::new(),
                reason: "missing column in header".to_string(),
            });
        }
    }
    let schema = Schema {
        has_gender: headers.iter().any(|h| h == GENDER),
        has_birth_year: headers.iter().any(|h| h == BIRTH_YEAR),
    };

    let mut trips = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record).map_err(short_row)? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawTrip = record.deserialize(Some(&headers))?;
        trips.push(parse_trip(raw, line, schema)?);
    }

    log::info!(
        "read {} trips (gender: {}, birth year: {})",
        trips.len(),
        schema.has_gender,
        schema.has_birth_year
    );
    Ok(TripTable::new(schema, trips))
}

fn parse_trip(raw: RawTrip, line: u64, schema: Schema) -> Result<TripRecord> {
    let start_time =
        parse_timestamp(&raw.start_time).ok_or_else(|| StatsError::MalformedRecord {
            line,
            column: START_TIME,
            value: raw.start_time.clone(),
            reason: "not a timestamp".to_string(),
        })?;
    let trip_duration = parse_duration(&raw.trip_duration, line)?;
    let birth_year = if schema.has_birth_year {
        parse_birth_year(raw.birth_year.as_deref(), line)?
    } else {
        None
    };
    let gender = if schema.has_gender {
        non_blank(raw.gender)
    } else {
        None
    };

    let start_station = required(raw.start_station, START_STATION, line)?;
    let end_station = required(raw.end_station, END_STATION, line)?;

    Ok(TripRecord::new(start_time, trip_duration, start_station, end_station)
        .with_end_time(non_blank(raw.end_time))
        .with_user_type(non_blank(raw.user_type))
        .with_gender(gender)
        .with_birth_year(birth_year))
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

fn parse_duration(s: &str, line: u64) -> Result<f64> {
    let malformed = |reason: &str| StatsError::MalformedRecord {
        line,
        column: TRIP_DURATION,
        value: s.to_string(),
        reason: reason.to_string(),
    };
    let seconds: f64 = s.parse().map_err(|_| malformed("not a number"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(malformed("duration must be a non-negative number of seconds"));
    }
    Ok(seconds)
}

/// Birth years are stored as `1992` or `1992.0`; blank means unknown.
fn parse_birth_year(s: Option<&str>, line: u64) -> Result<Option<i32>> {
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let malformed = |reason: &str| StatsError::MalformedRecord {
        line,
        column: BIRTH_YEAR,
        value: s.to_string(),
        reason: reason.to_string(),
    };
    let year: f64 = s.parse().map_err(|_| malformed("not a number"))?;
    if year.fract() != 0.0 || year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return Err(malformed("not a whole year"));
    }
    Ok(Some(year as i32))
}

fn required(s: String, column: &'static str, line: u64) -> Result<String> {
    if s.is_empty() {
        return Err(StatsError::MalformedRecord {
            line,
            column,
            value: s,
            reason: "blank required value".to_string(),
        });
    }
    Ok(s)
}

/// A row with the wrong number of fields is a malformed record like any
/// other bad row.
fn short_row(err: csv::Error) -> StatsError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => StatsError::MalformedRecord {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            column: "record",
            value: format!("{len} fields"),
            reason: format!("expected {expected_len} fields"),
        },
        _ => StatsError::Csv(err),
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Month, Weekday};

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1423854,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St & Hubbard St,Damen Ave & Chicago Ave,Subscriber,Male,1992.0
955915,2017-05-25 18:19:03,2017-05-25 18:45:53,1610,Theater on the Lake,Sheffield Ave & Waveland Ave,Subscriber,Female,1992.0
9031,2017-01-04 08:27:49,2017-01-04 08:34:45,416,May St & Taylor St,Wood St & Taylor St,Subscriber,,
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
";

    #[test]
    fn reads_rows_and_schema() {
        let table = read_trips(CHICAGO.as_bytes()).expect("valid csv");
        assert_eq!(table.len(), 3);
        assert_eq!(table.schema(), Schema::FULL);

        let first = &table.trips()[0];
        assert_eq!(first.month, Month::June);
        assert_eq!(first.day_of_week, Weekday::Fri);
        assert_eq!(first.hour, 15);
        assert_eq!(first.trip_duration, 321.0);
        assert_eq!(first.birth_year, Some(1992));
        assert_eq!(first.end_time.as_deref(), Some("2017-06-23 15:14:53"));

        let last = &table.trips()[2];
        assert_eq!(last.gender, None);
        assert_eq!(last.birth_year, None);
    }

    #[test]
    fn schema_without_optional_columns() {
        let table = read_trips(WASHINGTON.as_bytes()).expect("valid csv");
        assert_eq!(table.schema(), Schema::default());
        assert_eq!(table.trips()[0].trip_duration, 489.066);
        assert_eq!(table.trips()[0].gender, None);
    }

    #[test]
    fn load_reader_applies_filters() {
        let table = load_reader(
            CHICAGO.as_bytes(),
            MonthFilter::Only(Month::May),
            DayFilter::All,
        )
        .expect("valid csv");
        assert_eq!(table.len(), 1);
        assert_eq!(table.trips()[0].start_station, "Theater on the Lake");
    }

    #[test]
    fn bad_timestamp_aborts_with_line() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-23 15:09:32,321,A,B,Subscriber
yesterday,10,A,B,Customer
";
        let err = read_trips(csv.as_bytes()).expect_err("bad timestamp");
        match err {
            StatsError::MalformedRecord {
                line, column, value, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, START_TIME);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_duration_aborts() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-23 15:09:32,-5,A,B,Subscriber
";
        assert!(matches!(
            read_trips(csv.as_bytes()),
            Err(StatsError::MalformedRecord {
                column: TRIP_DURATION,
                ..
            })
        ));

        let csv = csv.replace("-5", "fast");
        assert!(matches!(
            read_trips(csv.as_bytes()),
            Err(StatsError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn missing_required_column() {
        let csv = "Start Time,Trip Duration,Start Station,User Type\n";
        assert!(matches!(
            read_trips(csv.as_bytes()),
            Err(StatsError::MalformedRecord {
                line: 1,
                column: END_STATION,
                ..
            })
        ));
    }

    #[test]
    fn fractional_birth_year_is_malformed() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Birth Year
2017-06-23 15:09:32,321,A,B,Subscriber,1992.5
";
        assert!(matches!(
            read_trips(csv.as_bytes()),
            Err(StatsError::MalformedRecord {
                column: BIRTH_YEAR,
                ..
            })
        ));
    }

    #[test]
    fn blank_station_aborts() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-23 15:09:32,321, ,B,Subscriber
2017-06-23 16:09:32,321,,B,Subscriber
2017-06-23 17:09:32,321,C,B,Subscriber
";
        match read_trips(csv.as_bytes()).expect_err("blank start station") {
            StatsError::MalformedRecord {
                line, column, reason, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, START_STATION);
                assert_eq!(reason, "blank required value");
            }
            other => panic!("unexpected error: {other}"),
        }

        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-23 15:09:32,321,A,,Subscriber
";
        assert!(matches!(
            read_trips(csv.as_bytes()),
            Err(StatsError::MalformedRecord {
                line: 2,
                column: END_STATION,
                ..
            })
        ));
    }

    #[test]
    fn row_with_missing_fields_is_malformed() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-23 15:09:32,321,A,B,Subscriber
2017-06-23 16:09:32,321,A,B
";
        match read_trips(csv.as_bytes()).expect_err("short row") {
            StatsError::MalformedRecord {
                line, value, reason, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(value, "4 fields");
                assert_eq!(reason, "expected 5 fields");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_city_is_not_found() {
        let config = Config::default();
        let err =
            load(&config, "gotham", MonthFilter::All, DayFilter::All).expect_err("unknown city");
        assert!(matches!(err, StatsError::DatasetNotFound { city } if city == "gotham"));
    }
}
