mod provider;

pub use crate::provider::{FixtureProvider, ProviderError, WeatherProvider, WeatherSnapshot};

use serde::Serialize;
use uuid::Uuid;
use weather_core::{DashboardError, DashboardSnapshot, DashboardState, LocationRecord, View};

/// Identifies one in-flight weather fetch and the city it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: Uuid,
    pub city: String,
    pub location: LocationRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The city changed or a newer fetch started; the result was dropped.
    Stale,
    Failed,
}

/// What the view layer renders: dashboard state plus the latest weather.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub dashboard: DashboardSnapshot,
    pub weather: Option<WeatherSnapshot>,
    pub loading: bool,
}

/// Couples the dashboard state with the weather data fetched for it.
///
/// All city changes go through the engine so that an in-flight fetch for the
/// previous city can never land on the new one.
pub struct Engine {
    state: DashboardState,
    weather: Option<WeatherSnapshot>,
    pending: Option<FetchTicket>,
}

impl Engine {
    pub fn new(state: DashboardState) -> Self {
        Engine {
            state,
            weather: None,
            pending: None,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            dashboard: self.state.snapshot(),
            weather: self.weather.clone(),
            loading: self.is_loading(),
        }
    }

    pub fn set_selected_city(&mut self, city: &str) -> Result<bool, DashboardError> {
        let changed = self.state.set_selected_city(city)?;
        if changed {
            self.forget_weather();
        }
        Ok(changed)
    }

    pub fn set_active_view(&mut self, view: View) {
        self.state.set_active_view(view);
    }

    pub fn open_settings(&mut self) {
        self.state.open_settings();
    }

    pub fn cancel_settings(&mut self) {
        self.state.cancel_settings();
    }

    pub fn submit_settings(&mut self, city: &str) -> Result<bool, DashboardError> {
        let changed = self.state.submit_settings(city)?;
        if changed {
            self.forget_weather();
        }
        Ok(changed)
    }

    /// Re-resolve the moment against the clock. Returns whether it changed.
    pub fn refresh_moment(&mut self) -> bool {
        self.state.refresh_moment()
    }

    /// Start a fetch for the selected city.
    ///
    /// Returns `None` when the city is not in the catalog. A new ticket
    /// supersedes any outstanding one.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let Some(location) = self.state.fetch_target() else {
            tracing::debug!(
                "No weather fetch for unknown city {}",
                self.state.selected_city()
            );
            return None;
        };
        let ticket = FetchTicket {
            id: Uuid::new_v4(),
            city: self.state.selected_city().to_string(),
            location: location.clone(),
        };
        tracing::info!("Fetching weather for {} ({})", ticket.city, ticket.id);
        self.pending = Some(ticket.clone());
        Some(ticket)
    }

    /// Deliver the result of a fetch started with [`Engine::begin_fetch`].
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<WeatherSnapshot, ProviderError>,
    ) -> FetchOutcome {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.id == ticket.id)
            && ticket.city == self.state.selected_city();
        if !is_current {
            tracing::info!("Discarding stale weather for {} ({})", ticket.city, ticket.id);
            return FetchOutcome::Stale;
        }

        self.pending = None;
        match result {
            Ok(snapshot) => {
                tracing::info!("Weather for {} updated", ticket.city);
                self.weather = Some(snapshot);
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!("Weather fetch for {} failed: {}", ticket.city, err);
                FetchOutcome::Failed
            }
        }
    }

    /// The manual refresh action: re-resolve the moment, then fetch weather.
    ///
    /// Returns `None` when no fetch was issued.
    pub async fn refresh<P: WeatherProvider>(&mut self, provider: &P) -> Option<FetchOutcome> {
        self.refresh_moment();
        let ticket = self.begin_fetch()?;
        let result = provider.fetch(&ticket.location).await;
        Some(self.complete_fetch(&ticket, result))
    }

    fn forget_weather(&mut self) {
        self.weather = None;
        self.pending = None;
    }
}
