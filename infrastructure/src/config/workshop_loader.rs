//! Workshop definition files (`/load <path>`)

use figment::{
    Figment,
    providers::{Format, Json, Toml, Yaml},
};
use std::path::Path;
use tracing::debug;
use workshop_application::{ConfigError, ConfigSource};
use workshop_domain::WorkshopConfig;

/// Reads workshop configuration fragments from YAML, TOML or JSON files.
///
/// The format follows the file extension. An empty file is an empty fragment.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileWorkshopConfigSource;

impl FileWorkshopConfigSource {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigSource for FileWorkshopConfigSource {
    fn load(&self, path: &Path) -> Result<WorkshopConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if content.trim().is_empty() {
            debug!("{} is empty", path.display());
            return Ok(WorkshopConfig::default());
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let figment = match extension.as_str() {
            "yaml" | "yml" => Figment::from(Yaml::string(&content)),
            "toml" => Figment::from(Toml::string(&content)),
            "json" => Figment::from(Json::string(&content)),
            other => {
                return Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    message: format!(
                        "unsupported file extension '{}' (expected yaml, yml, toml or json)",
                        other
                    ),
                });
            }
        };

        figment.extract().map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
