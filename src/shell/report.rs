use std::io::{self, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::data::filter::FilterSelection;
use crate::data::model::{Schema, TripRecord, TripTable};
use crate::error::{Result, StatsError};
use crate::stats::{
    self, duration_stats, station_stats, time_stats, user_stats, Applicable, Breakdown,
    DurationStats, ModeResult, StationStats, TimeStats, Timed, UserStats,
};

pub const SEPARATOR: &str = "----------------------------------------";

// ---------------------------------------------------------------------------
// Report – every statistic for one selection
// ---------------------------------------------------------------------------

/// All statistics for one filtered table, each with its own timing and
/// its own success or failure.
#[derive(Debug)]
pub struct Report {
    pub selection: FilterSelection,
    pub trip_count: usize,
    pub time: Timed<Result<TimeStats>>,
    pub stations: Timed<Result<StationStats>>,
    pub durations: Timed<DurationStats>,
    pub users: Timed<UserStats>,
}

impl Report {
    /// Run every statistic over `table`.
    pub fn build(table: &TripTable, selection: FilterSelection) -> Self {
        Report {
            selection,
            trip_count: table.len(),
            time: stats::timed("time stats", || time_stats(table)),
            stations: stats::timed("station stats", || station_stats(table)),
            durations: stats::timed("duration stats", || duration_stats(table)),
            users: stats::timed("user stats", || user_stats(table)),
        }
    }

    /// Human readable report.
    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{} trips for {} (month: {}, day: {})",
            self.trip_count, self.selection.city, self.selection.month, self.selection.day
        )?;

        writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n")?;
        match &self.time.value {
            Ok(time) => {
                for mode in [&time.month, &time.day, &time.hour] {
                    write_mode(out, mode)?;
                }
            }
            Err(err) => writeln!(out, "Cannot compute travel times: {err}")?,
        }
        footer(out, self.time.elapsed.as_secs_f64())?;

        writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
        match &self.stations.value {
            Ok(st) => {
                write_mode(out, &st.most_common_start)?;
                write_mode(out, &st.most_common_end)?;
                writeln!(
                    out,
                    "Most frequent combination of start and end station is: {}, and: {}",
                    st.most_common_pair.start, st.most_common_pair.end
                )?;
                writeln!(out, "This trip was done {} times", st.most_common_pair_count)?;
            }
            Err(err) => writeln!(out, "Cannot compute station popularity: {err}")?,
        }
        footer(out, self.stations.elapsed.as_secs_f64())?;

        writeln!(out, "\nCalculating Trip Duration...\n")?;
        let durations = &self.durations.value;
        writeln!(out, "Displaying total travel time")?;
        write_duration(out, "Total", durations.total_seconds)?;
        writeln!(out, "Displaying average travel time")?;
        match durations.mean_seconds() {
            Ok(mean) => write_duration(out, "Average", mean)?,
            Err(err) => writeln!(out, "Cannot compute average: {err}")?,
        }
        footer(out, self.durations.elapsed.as_secs_f64())?;

        writeln!(out, "\nCalculating User Stats...\n")?;
        let users = &self.users.value;
        writeln!(out, "Displaying user types:")?;
        writeln!(out, "There are {} user types", users.user_types.len())?;
        for c in &users.user_types {
            writeln!(out, "{} user type with total count of {}", c.category, c.count)?;
        }
        writeln!(out, "Displaying gender data")?;
        match &users.gender {
            Applicable::Present(counts) => {
                for c in counts {
                    writeln!(out, "{}, total count: {}", c.category, c.count)?;
                }
            }
            Applicable::NotApplicable => writeln!(out, "There is no gender data to display.")?,
        }
        writeln!(out, "Displaying birth year values")?;
        match &users.birth_years {
            Ok(Applicable::Present(years)) => {
                writeln!(out, "{} is earliest birth year.", years.earliest_year)?;
                writeln!(out, "{} is most recent birth year.", years.most_recent_year)?;
                write_mode(out, &years.most_common)?;
            }
            Ok(Applicable::NotApplicable) => {
                writeln!(out, "There is no birth year data to display.")?;
            }
            Err(err) => writeln!(out, "Cannot compute birth years: {err}")?,
        }
        footer(out, self.users.elapsed.as_secs_f64())
    }

    /// The report as a JSON document. Failed statistics carry an `error`
    /// message in place of their `result`.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let durations = &self.durations.value;
        let mean = durations.mean_seconds().map(|mean| {
            json!({
                "seconds": mean,
                "breakdown": Breakdown::from_seconds(mean),
            })
        });
        let users = &self.users.value;
        let users = json!({
            "user_types": users.user_types,
            "gender": users.gender,
            "birth_years": section(users.birth_years.as_ref())?,
        });

        Ok(json!({
            "selection": self.selection,
            "trip_count": self.trip_count,
            "time": timed_section(&self.time)?,
            "stations": timed_section(&self.stations)?,
            "durations": {
                "elapsed_seconds": self.durations.elapsed.as_secs_f64(),
                "total_seconds": durations.total_seconds,
                "total_breakdown": Breakdown::from_seconds(durations.total_seconds),
                "mean": section(mean.as_ref())?,
            },
            "users": {
                "elapsed_seconds": self.users.elapsed.as_secs_f64(),
                "result": users,
            },
        }))
    }
}

fn footer<W: Write>(out: &mut W, seconds: f64) -> io::Result<()> {
    writeln!(out, "\nThis took {seconds:.6} seconds.")?;
    writeln!(out, "{SEPARATOR}")
}

fn write_mode<W: Write>(out: &mut W, mode: &ModeResult) -> io::Result<()> {
    writeln!(out, "Most Common {}: {}, Count: {}", mode.label, mode.value, mode.count)
}

fn write_duration<W: Write>(out: &mut W, label: &str, seconds: f64) -> io::Result<()> {
    writeln!(out, "{label} time is {seconds:.2} seconds")?;
    writeln!(out, "That is {}", Breakdown::from_seconds(seconds))
}

fn section<T: Serialize>(result: Result<&T, &StatsError>) -> serde_json::Result<Value> {
    Ok(match result {
        Ok(value) => json!({ "result": serde_json::to_value(value)? }),
        Err(err) => json!({ "error": err.to_string() }),
    })
}

fn timed_section<T: Serialize>(timed: &Timed<Result<T>>) -> serde_json::Result<Value> {
    let mut value = section(timed.value.as_ref())?;
    if let Value::Object(map) = &mut value {
        map.insert(
            "elapsed_seconds".to_string(),
            json!(timed.elapsed.as_secs_f64()),
        );
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One trip as displayed to the user, columns in file order.
#[derive(Debug, Serialize)]
pub struct RawRow<'a> {
    pub index: usize,
    pub start_time: String,
    pub end_time: Option<&'a str>,
    pub trip_duration: f64,
    pub start_station: &'a str,
    pub end_station: &'a str,
    pub user_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<Option<i32>>,
}

impl<'a> RawRow<'a> {
    /// `gender`/`birth_year` are `None` when the dataset lacks the column,
    /// `Some(None)` for a blank cell.
    pub fn new(index: usize, trip: &'a TripRecord, schema: Schema) -> Self {
        RawRow {
            index,
            start_time: trip.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            end_time: trip.end_time.as_deref(),
            trip_duration: trip.trip_duration,
            start_station: &trip.start_station,
            end_station: &trip.end_station,
            user_type: trip.user_type.as_deref(),
            gender: schema.has_gender.then_some(trip.gender.as_deref()),
            birth_year: schema.has_birth_year.then_some(trip.birth_year),
        }
    }
}

/// Rows starting at table index `first`.
pub fn raw_rows<'a>(first: usize, trips: &'a [TripRecord], schema: Schema) -> Vec<RawRow<'a>> {
    trips
        .iter()
        .enumerate()
        .map(|(i, trip)| RawRow::new(first + i, trip, schema))
        .collect()
}

pub fn write_raw_rows<W: Write>(out: &mut W, rows: &[RawRow<'_>]) -> io::Result<()> {
    const BLANK: &str = "-";
    for row in rows {
        writeln!(out, "[{}]", row.index)?;
        writeln!(out, "  Start Time:    {}", row.start_time)?;
        writeln!(out, "  End Time:      {}", row.end_time.unwrap_or(BLANK))?;
        writeln!(out, "  Trip Duration: {}", row.trip_duration)?;
        writeln!(out, "  Start Station: {}", row.start_station)?;
        writeln!(out, "  End Station:   {}", row.end_station)?;
        writeln!(out, "  User Type:     {}", row.user_type.unwrap_or(BLANK))?;
        if let Some(gender) = row.gender {
            writeln!(out, "  Gender:        {}", gender.unwrap_or(BLANK))?;
        }
        if let Some(year) = row.birth_year {
            match year {
                Some(year) => writeln!(out, "  Birth Year:    {year}")?,
                None => writeln!(out, "  Birth Year:    {BLANK}")?,
            }
        }
    }
    Ok(())
}
