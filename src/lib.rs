//! Descriptive statistics over US bike-share trip logs.
//!
//! Load a city's trips with [`data::loader::load`], optionally narrowed to a
//! month and/or day of week, then run any of the [`stats`] routines over the
//! resulting [`data::model::TripTable`].

pub mod config;
pub mod data;
pub mod error;
pub mod shell;
pub mod state;
pub mod stats;

pub use config::Config;
pub use error::{Result, StatsError};
