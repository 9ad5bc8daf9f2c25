//! Data layer: trip records, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  chicago.csv / new_york_city.csv / washington.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse rows, derive month / weekday / hour → TripTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ TripTable  │  Vec<TripRecord> + Schema (gender / birth year present?)
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  month AND day-of-week → new TripTable
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
