use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use weather_core::{DashboardError, View};
use weather_engine::WeatherProvider;

use crate::AppContext;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRequest {
    pub city_name: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest {
    pub view: View,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

fn dashboard_error_to_response(error: DashboardError) -> impl IntoResponse {
    let status = match error {
        DashboardError::EmptyCity => StatusCode::BAD_REQUEST,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Apply a city change, fetching weather for the new city when it changed
async fn change_city<P: WeatherProvider>(
    ctx: &AppContext<P>,
    change: impl FnOnce(&mut weather_engine::Engine) -> Result<bool, DashboardError>,
) -> Response {
    let result = change(&mut *ctx.engine());
    match result {
        Ok(changed) => {
            if changed {
                ctx.fetch_weather().await;
            }
            (StatusCode::OK, Json(ctx.engine().view())).into_response()
        }
        Err(error) => dashboard_error_to_response(error).into_response(),
    }
}

/// Select the city shown on the dashboard
pub async fn set_city<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
    Json(payload): Json<CityRequest>,
) -> Response {
    change_city(&*ctx, |engine| engine.set_selected_city(&payload.city_name)).await
}

/// Switch between the main and settings views
pub async fn set_view<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
    Json(payload): Json<ViewRequest>,
) -> impl IntoResponse {
    let mut engine = ctx.engine();
    engine.set_active_view(payload.view);
    Json(engine.view())
}

pub async fn open_settings<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
) -> impl IntoResponse {
    let mut engine = ctx.engine();
    engine.open_settings();
    Json(engine.view())
}

pub async fn cancel_settings<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
) -> impl IntoResponse {
    let mut engine = ctx.engine();
    engine.cancel_settings();
    Json(engine.view())
}

/// Submit the settings form and return to the main view
pub async fn submit_settings<P: WeatherProvider>(
    State(ctx): State<Arc<AppContext<P>>>,
    Json(payload): Json<CityRequest>,
) -> Response {
    change_city(&*ctx, |engine| engine.submit_settings(&payload.city_name)).await
}
