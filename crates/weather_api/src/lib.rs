//! Weather dashboard API
//!
//! Serves the dashboard state to the view layer and accepts its two
//! mutators: selecting a city and switching views.

pub mod config;
mod dashboard;
mod settings;

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::trace::TraceLayer;
use weather_engine::{Engine, FetchOutcome, WeatherProvider};

/// State shared by every handler.
pub struct AppContext<P> {
    engine: Mutex<Engine>,
    provider: P,
}

impl<P: WeatherProvider> AppContext<P> {
    pub fn new(engine: Engine, provider: P) -> Self {
        AppContext {
            engine: Mutex::new(engine),
            provider,
        }
    }

    fn engine(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch weather for the selected city without holding the engine lock
    /// across the provider call.
    async fn fetch_weather(&self) -> Option<FetchOutcome> {
        let ticket = self.engine().begin_fetch()?;
        let result = self.provider.fetch(&ticket.location).await;
        Some(self.engine().complete_fetch(&ticket, result))
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Create the application router with all endpoints
pub fn create_app<P>(engine: Engine, provider: P) -> Router
where
    P: WeatherProvider + 'static,
{
    let shared_state = Arc::new(AppContext::new(engine, provider));
    Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(dashboard::get_dashboard::<P>))
        .route("/locations", get(dashboard::get_locations::<P>))
        .route("/refresh", post(dashboard::refresh::<P>))
        .route("/city", put(settings::set_city::<P>))
        .route("/view", put(settings::set_view::<P>))
        .route("/settings/open", post(settings::open_settings::<P>))
        .route("/settings/cancel", post(settings::cancel_settings::<P>))
        .route("/settings/submit", post(settings::submit_settings::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}
