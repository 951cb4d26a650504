use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use weather_core::LocationRecord;

/// Current conditions for one location, as shown on the weather card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub observation_time: NaiveDateTime,
    pub location_name: String,
    pub description: String,
    pub weather_code: u32,
    /// Degrees Celsius
    pub temperature: f64,
    /// Metres per second
    pub wind_speed: f64,
    /// Percent chance of rain
    pub rain_possibility: u8,
    pub comfortability: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No weather data for {location_name}")]
    NoData { location_name: String },
}

/// Source of weather snapshots. Retries and backoff are the provider's own
/// business.
pub trait WeatherProvider: Send + Sync {
    fn fetch(
        &self,
        location: &LocationRecord,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send;
}

/// Serves canned snapshots keyed by station id or location name.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    snapshots: HashMap<String, WeatherSnapshot>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping a station id or location name to a snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(FixtureProvider {
            snapshots: serde_json::from_str(json)?,
        })
    }

    pub fn insert(&mut self, key: impl Into<String>, snapshot: WeatherSnapshot) {
        self.snapshots.insert(key.into(), snapshot);
    }
}

impl WeatherProvider for FixtureProvider {
    async fn fetch(&self, location: &LocationRecord) -> Result<WeatherSnapshot, ProviderError> {
        self.snapshots
            .get(&location.station_id)
            .or_else(|| self.snapshots.get(&location.location_name))
            .cloned()
            .ok_or_else(|| ProviderError::NoData {
                location_name: location.location_name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURES: &str = r#"
    {
      "466920": {
        "observationTime": "2026-10-19T12:00:00",
        "locationName": "臺北",
        "description": "多雲時晴",
        "weatherCode": 3,
        "temperature": 27.4,
        "windSpeed": 2.1,
        "rainPossibility": 20,
        "comfortability": "舒適至悶熱"
      },
      "高雄": {
        "observationTime": "2026-10-19T12:00:00",
        "locationName": "高雄",
        "description": "晴時多雲",
        "weatherCode": 2,
        "temperature": 30.1,
        "windSpeed": 3.4,
        "rainPossibility": 10,
        "comfortability": "悶熱"
      }
    }
    "#;

    #[tokio::test]
    async fn test_fixture_lookup_by_station_then_name() {
        let provider = FixtureProvider::from_json(FIXTURES).unwrap();

        let taipei = LocationRecord::new("臺北市", "臺北", "466920");
        let snapshot = provider.fetch(&taipei).await.unwrap();
        assert_eq!(snapshot.description, "多雲時晴");
        assert_eq!(snapshot.rain_possibility, 20);

        let kaohsiung = LocationRecord::new("高雄市", "高雄", "unknown-station");
        let snapshot = provider.fetch(&kaohsiung).await.unwrap();
        assert_eq!(snapshot.location_name, "高雄");
    }

    #[tokio::test]
    async fn test_fixture_missing_location() {
        let provider = FixtureProvider::new();
        let hualien = LocationRecord::new("花蓮縣", "花蓮", "466990");

        assert_eq!(
            provider.fetch(&hualien).await,
            Err(ProviderError::NoData {
                location_name: "花蓮".into()
            })
        );
    }
}
