use serde::{Deserialize, Serialize};

/// A known city and the identifiers needed to query weather and sun data for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// User-facing name, unique across a catalog
    pub city_name: String,
    pub location_name: String,
    /// Observation station used by the weather provider
    pub station_id: String,
    /// Key into the sunrise/sunset table when it differs from `location_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise_city_name: Option<String>,
}

impl LocationRecord {
    pub fn new(city_name: &str, location_name: &str, station_id: &str) -> Self {
        LocationRecord {
            city_name: city_name.into(),
            location_name: location_name.into(),
            station_id: station_id.into(),
            sunrise_city_name: None,
        }
    }

    /// The key this location uses in the sunrise/sunset table.
    pub fn sun_table_key(&self) -> &str {
        self.sunrise_city_name
            .as_deref()
            .unwrap_or(&self.location_name)
    }

    /// The default record has no city and never triggers a weather fetch.
    pub fn is_default(&self) -> bool {
        self.city_name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SunsetEntry {
    #[serde(rename = "dataTime", alias = "date")]
    pub date: String,
    pub sunrise: String,
    pub sunset: String,
}

/// All sunrise/sunset rows of one location, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSunTimes {
    pub location_name: String,
    #[serde(default)]
    pub time: Vec<SunsetEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moment {
    Day,
    Night,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Night is dark, everything else is light. An unknown moment means there
    /// is no sun data for the location, which is not evidence of night.
    pub fn from_moment(moment: Moment) -> Self {
        match moment {
            Moment::Night => Theme::Dark,
            Moment::Day | Moment::Unknown => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                background_color: "#ededed",
                foreground_color: "#f9f9f9",
                box_shadow: "0 1px 3px 0 #999999",
                title_color: "#212121",
                temperature_color: "#757575",
                text_color: "#828282",
            },
            Theme::Dark => Palette {
                background_color: "#1F2022",
                foreground_color: "#121416",
                box_shadow: "0 1px 4px 0 rgba(12, 12, 13, 0.2), 0 0 0 1px rgba(0, 0, 0, 0.15)",
                title_color: "#f9f9fa",
                temperature_color: "#dddddd",
                text_color: "#cccccc",
            },
        }
    }
}

/// Colours the view layer applies for a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background_color: &'static str,
    pub foreground_color: &'static str,
    pub box_shadow: &'static str,
    pub title_color: &'static str,
    pub temperature_color: &'static str,
    pub text_color: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    Main,
    Settings,
}

/// Everything the view layer needs to render the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub active_view: View,
    pub theme: Theme,
    pub palette: Palette,
    pub selected_city: String,
    /// Display name of the resolved location, empty when the city is unknown
    pub city_name: String,
    pub moment: Moment,
}
