use serde::Serialize;

use super::mode::{most_common, ranked_counts, ModeResult};
use super::Applicable;
use crate::data::model::{Field, TripTable};
use crate::error::{Result, StatsError};

/// One category of a breakdown and how many trips fall into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Birth year range and mode for the riders in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearSummary {
    pub earliest_year: i32,
    pub most_recent_year: i32,
    pub most_common: ModeResult,
}

/// Rider demographics. Each part stands on its own: an empty slice still
/// reports its (empty) user types and gender counts when the birth years
/// have nothing to summarise.
#[derive(Debug)]
pub struct UserStats {
    pub user_types: Vec<CategoryCount>,
    pub gender: Applicable<Vec<CategoryCount>>,
    pub birth_years: Result<Applicable<BirthYearSummary>>,
}

fn breakdown(table: &TripTable, field: Field) -> Vec<CategoryCount> {
    ranked_counts(table.iter().filter_map(|trip| field.value_of(trip)))
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect()
}

/// Count of every user type present, most frequent first. Blank cells are
/// not counted.
pub fn user_type_counts(table: &TripTable) -> Vec<CategoryCount> {
    breakdown(table, Field::UserType)
}

/// Gender breakdown, or `NotApplicable` if the dataset has no gender column.
/// An empty vector means the column exists but this slice has no values.
pub fn gender_counts(table: &TripTable) -> Applicable<Vec<CategoryCount>> {
    if !table.schema().has_gender {
        return Applicable::NotApplicable;
    }
    Applicable::Present(breakdown(table, Field::Gender))
}

/// Earliest, most recent and most common birth year.
///
/// `NotApplicable` if the dataset has no birth year column;
/// [`StatsError::NoData`] if it has one but the table holds no values.
pub fn birth_year_summary(table: &TripTable) -> Result<Applicable<BirthYearSummary>> {
    if !table.schema().has_birth_year {
        return Ok(Applicable::NotApplicable);
    }
    let years = || table.iter().filter_map(|trip| trip.birth_year);
    let no_data = || StatsError::NoData {
        statistic: "birth years",
    };
    let earliest_year = years().min().ok_or_else(no_data)?;
    let most_recent_year = years().max().ok_or_else(no_data)?;

    Ok(Applicable::Present(BirthYearSummary {
        earliest_year,
        most_recent_year,
        most_common: most_common(table, Field::BirthYear)?,
    }))
}

pub fn user_stats(table: &TripTable) -> UserStats {
    UserStats {
        user_types: user_type_counts(table),
        gender: gender_counts(table),
        birth_years: birth_year_summary(table),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Schema, TripRecord};
    use chrono::NaiveDate;

    fn rider(user_type: &str, gender: Option<&str>, birth_year: Option<i32>) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2017, 5, 5)
            .and_then(|d| d.and_hms_opt(7, 45, 0))
            .expect("valid timestamp");
        TripRecord::new(start, 300.0, "A", "B")
            .with_user_type(Some(user_type.to_string()))
            .with_gender(gender.map(str::to_string))
            .with_birth_year(birth_year)
    }

    fn counts(pairs: &[(&str, usize)]) -> Vec<CategoryCount> {
        pairs
            .iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count: *count,
            })
            .collect()
    }

    #[test]
    fn full_breakdown() {
        let table = TripTable::new(
            Schema::FULL,
            vec![
                rider("Customer", Some("Female"), Some(1985)),
                rider("Subscriber", Some("Male"), Some(1992)),
                rider("Subscriber", None, None),
                rider("Subscriber", Some("Male"), Some(1992)),
                rider("Dependent", Some("Female"), Some(1960)),
            ],
        );
        let stats = user_stats(&table);

        assert_eq!(
            stats.user_types,
            counts(&[("Subscriber", 3), ("Customer", 1), ("Dependent", 1)])
        );
        assert_eq!(
            stats.gender,
            Applicable::Present(counts(&[("Female", 2), ("Male", 2)]))
        );
        let Ok(Applicable::Present(years)) = stats.birth_years else {
            panic!("birth years should be present");
        };
        assert_eq!(years.earliest_year, 1960);
        assert_eq!(years.most_recent_year, 1992);
        assert_eq!(years.most_common.value, "1992");
        assert_eq!(years.most_common.count, 2);
    }

    #[test]
    fn dataset_without_gender_is_not_applicable() {
        let table = TripTable::new(
            Schema::default(),
            vec![rider("Subscriber", None, None)],
        );
        let stats = user_stats(&table);
        assert_eq!(stats.gender, Applicable::NotApplicable);
        assert!(matches!(stats.birth_years, Ok(Applicable::NotApplicable)));
    }

    #[test]
    fn empty_slice_with_gender_column_is_present_and_empty() {
        let table = TripTable::new(Schema::FULL, Vec::new());
        assert_eq!(gender_counts(&table), Applicable::Present(Vec::new()));
        assert!(user_type_counts(&table).is_empty());
    }

    #[test]
    fn empty_slice_keeps_every_part() {
        let table = TripTable::new(Schema::FULL, Vec::new());
        let stats = user_stats(&table);
        assert!(stats.user_types.is_empty());
        assert_eq!(stats.gender, Applicable::Present(Vec::new()));
        assert!(matches!(
            stats.birth_years,
            Err(StatsError::NoData {
                statistic: "birth years"
            })
        ));
    }
}
