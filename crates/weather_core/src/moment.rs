use chrono::{Local, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::models::Moment;
use crate::sun_table::{DATE_FORMAT, SunTable};

const TIME_FORMAT: &str = "%H:%M";

/// Source of the current process-local wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Why a moment could not be resolved. Never leaves this module: every
/// variant degrades to [`Moment::Unknown`].
#[derive(Error, Debug, PartialEq, Eq)]
enum ResolveError {
    #[error("No sun entry for {location_name} on {date}")]
    NotFound { location_name: String, date: String },
    #[error("Sun entry for {location_name} on {date} has malformed time {value:?}")]
    Malformed {
        location_name: String,
        date: String,
        value: String,
    },
}

/// Classify `now` as day or night at `location_name`.
///
/// `now` is local wall-clock time; its calendar date selects the table row.
/// Sunrise and sunset are both counted as day.
pub fn resolve_moment(table: &SunTable, location_name: &str, now: NaiveDateTime) -> Moment {
    match try_resolve(table, location_name, now) {
        Ok(moment) => moment,
        Err(err @ ResolveError::NotFound { .. }) => {
            tracing::debug!("{}", err);
            Moment::Unknown
        }
        Err(err @ ResolveError::Malformed { .. }) => {
            tracing::warn!("{}", err);
            Moment::Unknown
        }
    }
}

fn try_resolve(
    table: &SunTable,
    location_name: &str,
    now: NaiveDateTime,
) -> Result<Moment, ResolveError> {
    let date = now.date();
    let Some(entry) = table.lookup(location_name, date) else {
        return Err(ResolveError::NotFound {
            location_name: location_name.into(),
            date: date.format(DATE_FORMAT).to_string(),
        });
    };

    let parse = |value: &str| {
        NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| ResolveError::Malformed {
            location_name: location_name.into(),
            date: entry.date.clone(),
            value: value.into(),
        })
    };
    let sunrise = date.and_time(parse(&entry.sunrise)?);
    let sunset = date.and_time(parse(&entry.sunset)?);

    if sunrise <= now && now <= sunset {
        Ok(Moment::Day)
    } else {
        Ok(Moment::Night)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap())
    }

    fn table() -> SunTable {
        SunTable::from_json(
            r#"
            [
              {"locationName": "臺北", "time": [
                {"dataTime": "2026-10-19", "sunrise": "06:00", "sunset": "17:30"}
              ]},
              {"locationName": "測試", "time": [
                {"dataTime": "2026-10-19", "sunrise": "06:00", "sunset": "18:00"},
                {"dataTime": "2026-10-20", "sunrise": "6 AM", "sunset": "18:00"},
                {"dataTime": "2026-10-21", "sunrise": "06:00", "sunset": "25:61"}
              ]}
            ]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_day_and_night() {
        let table = table();

        assert_eq!(resolve_moment(&table, "臺北", at("2026-10-19", "12:00:00")), Moment::Day);
        assert_eq!(resolve_moment(&table, "臺北", at("2026-10-19", "20:00:00")), Moment::Night);
        assert_eq!(resolve_moment(&table, "臺北", at("2026-10-19", "05:59:59")), Moment::Night);
        assert_eq!(resolve_moment(&table, "臺北", at("2026-10-19", "00:00:00")), Moment::Night);
    }

    #[test]
    fn test_sunrise_and_sunset_are_day() {
        let table = table();

        assert_eq!(resolve_moment(&table, "臺北", at("2026-10-19", "06:00:00")), Moment::Day);
        assert_eq!(resolve_moment(&table, "臺北", at("2026-10-19", "17:30:00")), Moment::Day);
        assert_eq!(resolve_moment(&table, "臺北", at("2026-10-19", "17:30:01")), Moment::Night);
    }

    #[test]
    fn test_unknown_location_or_date() {
        let table = table();

        assert_eq!(
            resolve_moment(&table, "不存在", at("2026-10-19", "12:00:00")),
            Moment::Unknown
        );
        assert_eq!(
            resolve_moment(&table, "臺北", at("2026-10-20", "12:00:00")),
            Moment::Unknown
        );
        assert_eq!(
            resolve_moment(&SunTable::empty(), "臺北", at("2026-10-19", "12:00:00")),
            Moment::Unknown
        );
    }

    #[test]
    fn test_malformed_times_are_unknown() {
        let table = table();

        assert_eq!(
            resolve_moment(&table, "測試", at("2026-10-20", "12:00:00")),
            Moment::Unknown
        );
        assert_eq!(
            resolve_moment(&table, "測試", at("2026-10-21", "12:00:00")),
            Moment::Unknown
        );
        assert!(matches!(
            try_resolve(&table, "測試", at("2026-10-20", "12:00:00")),
            Err(ResolveError::Malformed { value, .. }) if value == "6 AM"
        ));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let table = table();
        let now = at("2026-10-19", "17:30:00");

        let first = resolve_moment(&table, "臺北", now);
        for _ in 0..10 {
            assert_eq!(resolve_moment(&table, "臺北", now), first);
        }
    }

    #[test]
    fn test_fixed_clock() {
        let now = at("2026-10-19", "08:15:00");
        assert_eq!(FixedClock(now).now(), now);
    }
}
