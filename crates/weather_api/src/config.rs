use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use weather_core::{CatalogError, DEFAULT_CITY, LocationCatalog, SunTable, SunTableError};
use weather_engine::FixtureProvider;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid location catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Invalid sunrise/sunset table: {0}")]
    SunTable(#[from] SunTableError),
    #[error("Invalid weather fixtures: {0}")]
    Weather(serde_json::Error),
}

/// Dashboard configuration file. Relative paths are resolved against the
/// directory holding the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Location catalog JSON; the built-in catalog when absent
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Sunrise/sunset table JSON; every moment is unknown when absent
    #[serde(default)]
    pub sun_table_path: Option<PathBuf>,
    /// Where the selected city is persisted
    pub store_path: PathBuf,
    /// Canned weather snapshots keyed by station id or location name
    #[serde(default)]
    pub weather_path: Option<PathBuf>,
    #[serde(default = "default_city")]
    pub default_city: String,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

/// Reference data loaded once at startup.
pub struct ReferenceData {
    pub catalog: Arc<LocationCatalog>,
    pub sun_table: Arc<SunTable>,
    pub provider: FixtureProvider,
}

impl DashboardConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path).await?;
        let config: DashboardConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.relative_to(path.parent().unwrap_or(Path::new("."))))
    }

    /// Resolve every relative path against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let paths = [
            Some(&mut self.store_path),
            self.catalog_path.as_mut(),
            self.sun_table_path.as_mut(),
            self.weather_path.as_mut(),
        ];
        for path in paths.into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    pub async fn load_reference_data(&self) -> Result<ReferenceData, ConfigError> {
        let catalog = match &self.catalog_path {
            Some(path) => LocationCatalog::from_json(&read(path).await?)?,
            None => LocationCatalog::builtin(),
        };
        let sun_table = match &self.sun_table_path {
            Some(path) => SunTable::from_json(&read(path).await?)?,
            None => {
                tracing::warn!("No sunrise/sunset table configured");
                SunTable::empty()
            }
        };
        let provider = match &self.weather_path {
            Some(path) => {
                FixtureProvider::from_json(&read(path).await?).map_err(ConfigError::Weather)?
            }
            None => FixtureProvider::new(),
        };

        tracing::info!(
            "Loaded {} locations and {} sunrise/sunset entries",
            catalog.len(),
            sun_table.len()
        );
        Ok(ReferenceData {
            catalog: Arc::new(catalog),
            sun_table: Arc::new(sun_table),
            provider,
        })
    }
}

async fn read(path: &Path) -> Result<String, ConfigError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })
}
