mod catalog;
mod models;
mod moment;
mod store;
mod sun_table;

pub use crate::catalog::{CatalogError, LocationCatalog};
pub use crate::models::*;
pub use crate::moment::{Clock, FixedClock, SystemClock, resolve_moment};
pub use crate::store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use crate::sun_table::{DATE_FORMAT, SunTable, SunTableError};

use std::sync::Arc;

use thiserror::Error;

/// City shown when nothing usable was persisted.
pub const DEFAULT_CITY: &str = "臺北市";

/// Store key holding the selected city.
pub const CITY_KEY: &str = "cityName";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DashboardError {
    #[error("City name must not be blank")]
    EmptyCity,
}

/// The dashboard's single source of truth.
///
/// `selected_city` is the only input; location, moment and theme are derived
/// from it again every time it changes.
pub struct DashboardState {
    catalog: Arc<LocationCatalog>,
    sun_table: Arc<SunTable>,
    store: Box<dyn KeyValueStore + Send>,
    clock: Box<dyn Clock + Send>,
    selected_city: String,
    location: LocationRecord,
    active_view: View,
    moment: Moment,
    theme: Theme,
}

impl DashboardState {
    /// Restore the dashboard from `store`, falling back to [`DEFAULT_CITY`].
    pub fn startup(
        catalog: Arc<LocationCatalog>,
        sun_table: Arc<SunTable>,
        store: Box<dyn KeyValueStore + Send>,
        clock: Box<dyn Clock + Send>,
    ) -> Self {
        Self::startup_with_default(catalog, sun_table, store, clock, DEFAULT_CITY)
    }

    pub fn startup_with_default(
        catalog: Arc<LocationCatalog>,
        sun_table: Arc<SunTable>,
        store: Box<dyn KeyValueStore + Send>,
        clock: Box<dyn Clock + Send>,
        default_city: &str,
    ) -> Self {
        let stored = store.get(CITY_KEY).unwrap_or_else(|err| {
            tracing::warn!("Could not read the stored city: {}", err);
            None
        });
        let selected_city = match stored.as_deref().map(str::trim) {
            Some(city) if catalog.find_location(city).is_some() => city.to_string(),
            Some(city) => {
                tracing::info!(
                    "Stored city {:?} is not in the catalog, using {}",
                    city,
                    default_city
                );
                default_city.to_string()
            }
            None => default_city.to_string(),
        };

        let mut state = DashboardState {
            catalog,
            sun_table,
            store,
            clock,
            selected_city,
            location: LocationRecord::default(),
            active_view: View::Main,
            moment: Moment::Unknown,
            theme: Theme::Light,
        };
        if stored.as_deref() != Some(state.selected_city.as_str()) {
            state.persist_city();
        }
        state.recompute();
        tracing::info!(
            "Dashboard started for {} ({:?}, {:?})",
            state.selected_city,
            state.moment,
            state.theme
        );
        state
    }

    pub fn selected_city(&self) -> &str {
        &self.selected_city
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn moment(&self) -> Moment {
        self.moment
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    /// The resolved location, or the default record when the city is unknown.
    pub fn location(&self) -> &LocationRecord {
        &self.location
    }

    /// The location to fetch weather for; `None` when the city is unknown.
    pub fn fetch_target(&self) -> Option<&LocationRecord> {
        (!self.location.is_default()).then_some(&self.location)
    }

    /// Change the selected city.
    ///
    /// Cities missing from the catalog are accepted; they resolve to the
    /// default location. Returns whether the selection actually changed.
    pub fn set_selected_city(&mut self, city: &str) -> Result<bool, DashboardError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DashboardError::EmptyCity);
        }
        if city == self.selected_city {
            tracing::debug!("City {} is already selected", city);
            return Ok(false);
        }

        tracing::info!("Selected city changed from {} to {}", self.selected_city, city);
        self.selected_city = city.to_string();
        self.persist_city();
        self.recompute();
        Ok(true)
    }

    pub fn set_active_view(&mut self, view: View) {
        if view != self.active_view {
            tracing::debug!("Switching view from {:?} to {:?}", self.active_view, view);
        }
        self.active_view = view;
    }

    pub fn open_settings(&mut self) {
        self.set_active_view(View::Settings);
    }

    pub fn cancel_settings(&mut self) {
        self.set_active_view(View::Main);
    }

    /// Apply the settings form. A blank city keeps the settings view open.
    pub fn submit_settings(&mut self, city: &str) -> Result<bool, DashboardError> {
        let changed = self.set_selected_city(city)?;
        self.set_active_view(View::Main);
        Ok(changed)
    }

    /// Re-resolve the moment against the current clock, for sessions that
    /// outlive a sunrise or sunset. Returns whether the moment changed.
    pub fn refresh_moment(&mut self) -> bool {
        let previous = self.moment;
        self.update_moment();
        previous != self.moment
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            active_view: self.active_view,
            theme: self.theme,
            palette: self.theme.palette(),
            selected_city: self.selected_city.clone(),
            city_name: self.location.city_name.clone(),
            moment: self.moment,
        }
    }

    fn recompute(&mut self) {
        self.location = self
            .catalog
            .find_location(&self.selected_city)
            .cloned()
            .unwrap_or_default();
        self.update_moment();
    }

    fn update_moment(&mut self) {
        self.moment = if self.location.is_default() {
            Moment::Unknown
        } else {
            resolve_moment(
                &self.sun_table,
                self.location.sun_table_key(),
                self.clock.now(),
            )
        };
        self.theme = Theme::from_moment(self.moment);
    }

    fn persist_city(&mut self) {
        if let Err(err) = self.store.set(CITY_KEY, &self.selected_city) {
            tracing::warn!("Could not persist city {}: {}", self.selected_city, err);
        }
    }
}
