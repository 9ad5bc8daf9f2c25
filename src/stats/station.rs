use serde::Serialize;

use super::mode::{mode, most_common, ModeResult};
use crate::data::model::{Field, TripTable};
use crate::error::{Result, StatsError};

/// A directed trip between two stations. `A -> B` and `B -> A` differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StationPair {
    pub start: String,
    pub end: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub most_common_start: ModeResult,
    pub most_common_end: ModeResult,
    pub most_common_pair: StationPair,
    pub most_common_pair_count: usize,
}

pub fn station_stats(table: &TripTable) -> Result<StationStats> {
    let most_common_start = most_common(table, Field::StartStation)?;
    let most_common_end = most_common(table, Field::EndStation)?;

    let pairs = table.iter().map(|trip| StationPair {
        start: trip.start_station.clone(),
        end: trip.end_station.clone(),
    });
    let (most_common_pair, most_common_pair_count) = mode(pairs).ok_or(StatsError::NoData {
        statistic: "most common trip",
    })?;

    Ok(StationStats {
        most_common_start,
        most_common_end,
        most_common_pair,
        most_common_pair_count,
    })
}
