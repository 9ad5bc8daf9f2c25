//! Terminal front end: prompts for a selection, prints the report, pages
//! through raw rows and restarts on request.
//!
//! The shell only talks to the core through [`loader::load_city`] and the
//! [`Report`] built from the statistics engine.
//!
//! [`loader::load_city`]: crate::data::loader::load_city

pub mod prompt;
pub mod report;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::data::filter::{DayFilter, FilterSelection, MonthFilter};
use crate::data::loader;
use crate::data::model::City;
use crate::state::Session;
use crate::stats;
use prompt::{ask, DAY_CHOICES, MONTH_CHOICES, YES_NO};
use report::{raw_rows, write_raw_rows, Report, SEPARATOR};

const CITY_CHOICES: [&str; 3] = [
    City::Chicago.key(),
    City::NewYorkCity.key(),
    City::Washington.key(),
];

/// Output format for a one-shot report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Ask for city, and optionally month and day.
/// `None` if input ended first.
fn ask_selection<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<FilterSelection>> {
    writeln!(out, "Please provide from which city you would like to get data.")?;
    let Some(city) = ask(input, out, "Type Chicago, New York City or Washington:", &CITY_CHOICES)?
    else {
        return Ok(None);
    };
    let mut selection = FilterSelection::unfiltered(city.parse()?);

    writeln!(out, "Do you want to filter data by month, day or both?")?;
    match ask(input, out, "Type yes or no:", &YES_NO)? {
        None => return Ok(None),
        Some("no") => return Ok(Some(selection)),
        Some(_) => {}
    }

    writeln!(out, "Please provide for which month you would like to get data.")?;
    let Some(month) = ask(
        input,
        out,
        "Type all, January, February, March, April, May or June (prefixes work):",
        &MONTH_CHOICES,
    )?
    else {
        return Ok(None);
    };
    selection.month = month.parse::<MonthFilter>()?;

    writeln!(out, "Please provide for which day you would like to get data.")?;
    let Some(day) = ask(
        input,
        out,
        "Type all, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday or Sunday (prefixes work):",
        &DAY_CHOICES,
    )?
    else {
        return Ok(None);
    };
    selection.day = day.parse::<DayFilter>()?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(Some(selection))
}

/// Offer raw rows five at a time until the user declines or rows run out.
/// Returns `false` if input ended.
fn browse_raw_rows<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    let mut question = "Do you want to see 5 rows of data? Type yes or no:";
    while session.has_more_rows() {
        match ask(input, out, question, &YES_NO)? {
            None => return Ok(false),
            Some("no") => return Ok(true),
            Some(_) => {}
        }
        let schema = match &session.table {
            Some(table) => table.schema(),
            None => break,
        };
        let (first, trips) = session.next_page();
        write_raw_rows(out, &raw_rows(first, trips, schema))?;
        writeln!(out, "{SEPARATOR}")?;
        question = "Do you want to see another 5? Type yes or no:";
    }
    writeln!(out, "No more rows to display.")?;
    Ok(true)
}

/// The interactive loop. Returns when the user declines to restart or input
/// ends.
pub fn run<R: BufRead, W: Write>(config: &Config, input: &mut R, out: &mut W) -> Result<()> {
    let mut session = Session::default();
    loop {
        session.reset();
        writeln!(out, "Hello! Let's explore some US bikeshare data!")?;
        let Some(selection) = ask_selection(input, out)? else {
            return Ok(());
        };

        let loaded = stats::timed("load", || {
            loader::load_city(config, selection.city, selection.month, selection.day)
        });
        match loaded.value {
            Ok(table) => {
                writeln!(out, "\nThis took {:.6} seconds.", loaded.elapsed.as_secs_f64())?;
                writeln!(out, "{SEPARATOR}")?;
                Report::build(&table, selection).render_text(out)?;
                session.set_table(selection, table);
                if !browse_raw_rows(&mut session, input, out)? {
                    return Ok(());
                }
            }
            Err(err) => {
                log::error!("loading {} failed: {err}", selection.city);
                writeln!(out, "Could not load {} data: {err}", selection.city)?;
            }
        }

        writeln!(out)?;
        match ask(input, out, "Would you like to restart? Type yes or no:", &YES_NO)? {
            Some("yes") => continue,
            _ => return Ok(()),
        }
    }
}

/// Load one selection and print its report without prompting.
pub fn run_once<W: Write>(
    config: &Config,
    selection: FilterSelection,
    format: Format,
    raw_row_count: usize,
    out: &mut W,
) -> Result<()> {
    let table = loader::load_city(config, selection.city, selection.month, selection.day)
        .with_context(|| format!("loading {} data", selection.city))?;
    let report = Report::build(&table, selection);
    let shown = table.trips().get(..raw_row_count.min(table.len())).unwrap_or_default();
    let rows = raw_rows(0, shown, table.schema());

    match format {
        Format::Text => {
            report.render_text(out)?;
            write_raw_rows(out, &rows)?;
        }
        Format::Json => {
            let mut json = report.to_json()?;
            if raw_row_count > 0 {
                json["raw_rows"] = serde_json::to_value(&rows)?;
            }
            serde_json::to_writer_pretty(&mut *out, &json)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
