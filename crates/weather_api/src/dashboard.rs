use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use weather_engine::{DashboardView, WeatherProvider};

use crate::AppContext;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
    pub cities: Vec<String>,
}

/// Get the dashboard as the view layer renders it
pub async fn get_dashboard<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
) -> Json<DashboardView> {
    Json(ctx.engine().view())
}

/// List the cities offered by the settings form
pub async fn get_locations<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
) -> Json<LocationsResponse> {
    let engine = ctx.engine();
    let cities = engine
        .state()
        .catalog()
        .cities()
        .map(String::from)
        .collect();
    Json(LocationsResponse { cities })
}

/// Manual refresh: re-resolve day or night and fetch fresh weather
pub async fn refresh<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
) -> Json<DashboardView> {
    tracing::info!("Refreshing dashboard");
    ctx.engine().refresh_moment();
    ctx.fetch_weather().await;
    Json(ctx.engine().view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_engine, test_provider};
    pub use axum::{
        Router,
        routing::{get, post},
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;
    use weather_engine::{Engine, FixtureProvider};

    /// Create the application router with dashboard endpoints
    pub fn create_app(engine: Engine, provider: FixtureProvider) -> Router {
        let shared_state = Arc::new(AppContext::new(engine, provider));
        Router::new()
            .route("/dashboard", get(get_dashboard::<FixtureProvider>))
            .route("/locations", get(get_locations::<FixtureProvider>))
            .route("/refresh", post(refresh::<FixtureProvider>))
            .with_state(shared_state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_endpoint() {
        let app = create_app(test_engine(), test_provider());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let view = body_json(response).await;
        assert_eq!(view["dashboard"]["selectedCity"], "臺北市");
        assert_eq!(view["dashboard"]["cityName"], "臺北市");
        assert_eq!(view["dashboard"]["activeView"], "Main");
        assert_eq!(view["dashboard"]["moment"], "night");
        assert_eq!(view["dashboard"]["theme"], "dark");
        assert_eq!(view["dashboard"]["palette"]["backgroundColor"], "#1F2022");
        assert!(view["weather"].is_null());
        assert_eq!(view["loading"], false);
    }

    #[tokio::test]
    async fn test_locations_endpoint() {
        let app = create_app(test_engine(), test_provider());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/locations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let locations: LocationsResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(locations.cities.first().map(String::as_str), Some("臺北市"));
        assert!(locations.cities.iter().any(|city| city == "高雄市"));
    }

    #[tokio::test]
    async fn test_refresh_endpoint_fetches_weather() {
        let app = create_app(test_engine(), test_provider());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/refresh")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let view = body_json(response).await;
        assert_eq!(view["weather"]["locationName"], "臺北");
        assert_eq!(view["weather"]["temperature"], 24.5);
        assert_eq!(view["weather"]["observationTime"], "2026-10-19T17:45:00");
        assert_eq!(view["loading"], false);
    }

    #[tokio::test]
    async fn test_refresh_endpoint_without_data() {
        let app = create_app(test_engine(), FixtureProvider::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/refresh")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let view = body_json(response).await;
        assert!(view["weather"].is_null());
        assert_eq!(view["dashboard"]["theme"], "dark");
    }
}
