//! Write small synthetic trip logs for every city so the explorer can run
//! without the real datasets.
//!
//! Usage: `generate_sample [OUTPUT_DIR] [TRIPS_PER_CITY]`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use bikeshare_stats::data::model::City;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Pick from `items`, where earlier items are more likely.
    fn pick_skewed<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let a = self.below(items.len());
        let b = self.below(items.len());
        items[a.min(b)]
    }
}

fn stations(city: City) -> &'static [&'static str] {
    match city {
        City::Chicago => &[
            "Streeter Dr & Grand Ave",
            "Lake Shore Dr & Monroe St",
            "Clinton St & Washington Blvd",
            "Theater on the Lake",
            "Canal St & Adams St",
            "Wood St & Hubbard St",
        ],
        City::NewYorkCity => &[
            "Pershing Square North",
            "E 17 St & Broadway",
            "W 21 St & 6 Ave",
            "Broadway & E 22 St",
            "West St & Chambers St",
            "Central Park S & 6 Ave",
        ],
        City::Washington => &[
            "Columbus Circle / Union Station",
            "Lincoln Memorial",
            "Jefferson Dept of Transportation",
            "Massachusetts Ave & Dupont Circle NW",
            "15th & P St NW",
            "Jefferson Memorial",
        ],
    }
}

/// Trips start between January 1st and the end of June 2017.
fn random_start(rng: &mut SimpleRng) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let day = rng.below(181) as i64;
    // Commute peaks around 8:00 and 17:00.
    let hour = if rng.next_f64() < 0.5 {
        rng.gauss(8.0, 1.5)
    } else {
        rng.gauss(17.0, 2.0)
    };
    let seconds = (hour.clamp(0.0, 23.99) * 3600.0) as i64;
    base + Duration::days(day) + Duration::seconds(seconds)
}

fn write_city(dir: &Path, city: City, trips: usize, rng: &mut SimpleRng) -> Result<PathBuf> {
    let with_demographics = city != City::Washington;
    let path = dir.join(city.file_name());
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![
        "",
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
    ];
    if with_demographics {
        header.extend(["Gender", "Birth Year"]);
    }
    writer.write_record(&header)?;

    let names = stations(city);
    for id in 0..trips {
        let start = random_start(rng);
        let duration = rng.gauss(6.5, 0.7).exp().round().max(60.0);
        let end = start + Duration::seconds(duration as i64);
        let from = rng.pick_skewed(names);
        let to = rng.pick_skewed(names);
        let user_type = if rng.next_f64() < 0.8 { "Subscriber" } else { "Customer" };

        let mut row = vec![
            id.to_string(),
            start.format("%Y-%m-%d %H:%M:%S").to_string(),
            end.format("%Y-%m-%d %H:%M:%S").to_string(),
            duration.to_string(),
            from.to_string(),
            to.to_string(),
            user_type.to_string(),
        ];
        if with_demographics {
            // Some riders leave gender and birth year blank.
            let blank = rng.next_f64() < 0.1;
            let gender = match (blank, rng.next_f64() < 0.7) {
                (true, _) => "",
                (false, true) => "Male",
                (false, false) => "Female",
            };
            let birth_year = if blank {
                String::new()
            } else {
                format!("{:.1}", rng.gauss(1982.0, 11.0).round().clamp(1930.0, 2001.0))
            };
            row.push(gender.to_string());
            row.push(birth_year);
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let trips: usize = match args.next() {
        Some(n) => n.parse().context("TRIPS_PER_CITY must be a number")?,
        None => 2_000,
    };

    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut rng = SimpleRng::new(42);
    for city in City::ALL {
        let path = write_city(&dir, city, trips, &mut rng)?;
        println!("Wrote {trips} {city} trips to {}", path.display());
    }
    Ok(())
}
