use serde::Serialize;

use super::mode::{most_common, ModeResult};
use crate::data::model::{Field, TripTable};
use crate::error::Result;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub month: ModeResult,
    pub day: ModeResult,
    pub hour: ModeResult,
}

/// Most common month, day of week and start hour.
pub fn time_stats(table: &TripTable) -> Result<TimeStats> {
    Ok(TimeStats {
        month: most_common(table, Field::Month)?,
        day: most_common(table, Field::DayOfWeek)?,
        hour: most_common(table, Field::Hour)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Schema, TripRecord};
    use crate::error::StatsError;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, m, d)
            .and_then(|date| date.and_hms_opt(h, 30, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn picks_busiest_month_day_and_hour() {
        // 2017-03-06 Monday, 2017-03-07 Tuesday, 2017-04-04 Tuesday.
        let trips = [at(3, 6, 8), at(3, 7, 17), at(4, 4, 17), at(3, 7, 9)]
            .into_iter()
            .map(|t| TripRecord::new(t, 100.0, "A", "B"))
            .collect();
        let stats = time_stats(&TripTable::new(Schema::default(), trips)).expect("non-empty");

        assert_eq!((stats.month.value.as_str(), stats.month.count), ("March", 3));
        assert_eq!((stats.day.value.as_str(), stats.day.count), ("Tuesday", 3));
        assert_eq!((stats.hour.value.as_str(), stats.hour.count), ("17", 2));
    }

    #[test]
    fn hour_tie_uses_table_order() {
        let trips = [at(1, 2, 9), at(1, 2, 7), at(1, 2, 7), at(1, 2, 9)]
            .into_iter()
            .map(|t| TripRecord::new(t, 100.0, "A", "B"))
            .collect();
        let stats = time_stats(&TripTable::new(Schema::default(), trips)).expect("non-empty");
        assert_eq!(stats.hour.value, "9");
    }

    #[test]
    fn empty_table_has_no_mode() {
        let table = TripTable::new(Schema::default(), Vec::new());
        assert!(matches!(
            time_stats(&table),
            Err(StatsError::NoData { statistic: "Month" })
        ));
    }
}
