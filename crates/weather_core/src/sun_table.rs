use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{LocationSunTimes, SunsetEntry};

/// Date key format shared by the table and the lookups.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum SunTableError {
    #[error("Location {location_name} has more than one entry for {date}")]
    DuplicateEntry { location_name: String, date: String },
    #[error("Could not parse the sunrise/sunset table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Date-indexed sunrise and sunset times per location, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SunTable {
    locations: HashMap<String, HashMap<String, SunsetEntry>>,
}

impl SunTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_locations(locations: Vec<LocationSunTimes>) -> Result<Self, SunTableError> {
        let mut table: HashMap<String, HashMap<String, SunsetEntry>> = HashMap::new();
        for location in locations {
            let entries = table.entry(location.location_name.clone()).or_default();
            for entry in location.time {
                if entries.contains_key(&entry.date) {
                    return Err(SunTableError::DuplicateEntry {
                        location_name: location.location_name,
                        date: entry.date,
                    });
                }
                entries.insert(entry.date.clone(), entry);
            }
        }
        Ok(SunTable { locations: table })
    }

    pub fn from_json(json: &str) -> Result<Self, SunTableError> {
        let locations: Vec<LocationSunTimes> = serde_json::from_str(json)?;
        Self::from_locations(locations)
    }

    /// Entry for `location_name` on the given calendar date.
    pub fn lookup(&self, location_name: &str, date: NaiveDate) -> Option<&SunsetEntry> {
        self.lookup_key(location_name, &date.format(DATE_FORMAT).to_string())
    }

    /// Entry for `location_name` under a preformatted `YYYY-MM-DD` key.
    pub fn lookup_key(&self, location_name: &str, date: &str) -> Option<&SunsetEntry> {
        self.locations.get(location_name)?.get(date)
    }

    /// Number of (location, date) entries.
    pub fn len(&self) -> usize {
        self.locations.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
