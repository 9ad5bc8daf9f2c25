use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use bikeshare_stats::config::{Config, DATA_DIR_ENV};
use bikeshare_stats::data::filter::{DayFilter, FilterSelection, MonthFilter};
use bikeshare_stats::data::model::City;
use bikeshare_stats::shell::{self, Format};

/// Explore US bike-share trip data for Chicago, New York City and Washington.
///
/// Without `--city` the program asks for a selection interactively.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv.
    #[arg(long, env = DATA_DIR_ENV, default_value = ".")]
    data_dir: PathBuf,

    /// Print a single report for this city and exit.
    #[arg(long)]
    city: Option<City>,

    /// Month filter for --city: `all` or a month name.
    #[arg(long, default_value = "all", requires = "city")]
    month: MonthFilter,

    /// Day filter for --city: `all` or a weekday name.
    #[arg(long, default_value = "all", requires = "city")]
    day: DayFilter,

    /// Print the --city report as JSON.
    #[arg(long, requires = "city")]
    json: bool,

    /// Also print the first N raw rows of the --city selection.
    #[arg(long, default_value_t = 0, requires = "city")]
    raw_rows: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = Config::new(args.data_dir);
    log::debug!("datasets in {}", config.data_dir().display());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.city {
        Some(city) => {
            let selection = FilterSelection {
                city,
                month: args.month,
                day: args.day,
            };
            let format = if args.json { Format::Json } else { Format::Text };
            shell::run_once(&config, selection, format, args.raw_rows, &mut out)
        }
        None => {
            let stdin = io::stdin();
            shell::run(&config, &mut stdin.lock(), &mut out)
        }
    }
}
