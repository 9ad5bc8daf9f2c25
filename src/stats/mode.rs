use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::data::model::{Field, TripTable};
use crate::error::{Result, StatsError};

// ---------------------------------------------------------------------------
// Counting with a first-occurrence tie-break
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Tally {
    count: usize,
    /// Position of the value's first occurrence in input order.
    first_seen: usize,
}

fn tally<K, I>(values: I) -> HashMap<K, Tally>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut tallies: HashMap<K, Tally> = HashMap::new();
    for (pos, value) in values.into_iter().enumerate() {
        tallies
            .entry(value)
            .and_modify(|t| t.count += 1)
            .or_insert(Tally {
                count: 1,
                first_seen: pos,
            });
    }
    tallies
}

/// The most frequent value and its count, or `None` for no values.
///
/// Among values sharing the highest count, the one that occurs first in
/// `values` wins.
pub fn mode<K, I>(values: I) -> Option<(K, usize)>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    tally(values)
        .into_iter()
        .min_by_key(|(_, t)| (Reverse(t.count), t.first_seen))
        .map(|(value, t)| (value, t.count))
}

/// Every distinct value with its count, most frequent first. Ties keep
/// first-occurrence order.
pub fn ranked_counts<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts: Vec<(K, Tally)> = tally(values).into_iter().collect();
    counts.sort_by_key(|(_, t)| (Reverse(t.count), t.first_seen));
    counts.into_iter().map(|(value, t)| (value, t.count)).collect()
}

// ---------------------------------------------------------------------------
// Mode of a table column
// ---------------------------------------------------------------------------

/// The winner of a single-mode statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeResult {
    pub label: &'static str,
    pub value: String,
    pub count: usize,
}

/// Most common value of `field` over the table.
///
/// Missing cells are skipped. Fails with [`StatsError::NoData`] when there is
/// nothing to count and with [`StatsError::MissingColumn`] when the dataset
/// does not carry `field` at all.
pub fn most_common(table: &TripTable, field: Field) -> Result<ModeResult> {
    if !field.is_present_in(table.schema()) {
        return Err(StatsError::MissingColumn {
            column: field.label(),
        });
    }
    let (value, count) = mode(table.iter().filter_map(|trip| field.value_of(trip))).ok_or(
        StatsError::NoData {
            statistic: field.label(),
        },
    )?;
    Ok(ModeResult {
        label: field.label(),
        value,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn table(stations: &[&str]) -> TripTable {
        let start = NaiveDate::from_ymd_opt(2017, 3, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid timestamp");
        let trips = stations
            .iter()
            .map(|s| TripRecord::new(start, 10.0, *s, "End"))
            .collect();
        TripTable::new(Schema::default(), trips)
    }

    #[test]
    fn tie_goes_to_first_occurrence() {
        assert_eq!(mode(["A", "B", "A", "B"]), Some(("A", 2)));
        assert_eq!(mode(["B", "A", "A", "B"]), Some(("B", 2)));
        assert_eq!(mode(["C", "B", "A", "B", "A"]), Some(("B", 2)));
    }

    #[test]
    fn mode_of_nothing() {
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn ranked_counts_orders_by_count_then_first_seen() {
        let ranked = ranked_counts(["x", "y", "z", "y", "z", "w"]);
        assert_eq!(ranked, vec![("y", 2), ("z", 2), ("x", 1), ("w", 1)]);
    }

    #[test]
    fn most_common_column_value() {
        let t = table(&["A", "B", "A", "B"]);
        let result = most_common(&t, Field::StartStation).expect("non-empty");
        assert_eq!(
            result,
            ModeResult {
                label: "Start Station",
                value: "A".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn most_common_on_empty_table() {
        let t = table(&[]);
        assert!(matches!(
            most_common(&t, Field::Hour),
            Err(StatsError::NoData { statistic: "Hour" })
        ));
    }

    #[test]
    fn most_common_on_absent_column() {
        let t = table(&["A"]);
        assert!(matches!(
            most_common(&t, Field::Gender),
            Err(StatsError::MissingColumn { column: "Gender" })
        ));
    }
}
