use clap::Parser;
use std::path::PathBuf;
use weather_api::{config::DashboardConfig, create_app};
use weather_core::{DashboardState, JsonFileStore, SystemClock};
use weather_engine::Engine;

/// Command line arguments for the weather dashboard server
#[derive(Parser, Debug)]
#[command(name = "weather-dashboard")]
#[command(about = "Day/night aware weather dashboard")]
struct Args {
    /// Path to the dashboard configuration JSON file
    #[arg(short, long)]
    config: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt().pretty().init();

    let config = DashboardConfig::load(&args.config).await?;
    let data = config.load_reference_data().await?;

    let store = JsonFileStore::open_or_empty(&config.store_path);

    tracing::info!(
        "Loaded dashboard config from {}, persisting to {}",
        args.config.display(),
        store.path().display()
    );

    // Restore the dashboard and fetch weather for the restored city
    let state = DashboardState::startup_with_default(
        data.catalog,
        data.sun_table,
        Box::new(store),
        Box::new(SystemClock),
        &config.default_city,
    );
    let mut engine = Engine::new(state);
    if let Some(outcome) = engine.refresh(&data.provider).await {
        tracing::info!("Initial weather fetch: {:?}", outcome);
    }

    // Build our application with routes
    let app = create_app(engine, data.provider);

    let bind_addr = format!("127.0.0.1:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", bind_addr, e))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
