//! Settings loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["workshop.toml", ".workshop.toml"];

/// Settings loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `WORKSHOP_` environment variables, `__` separating sections
    /// 2. Explicit settings path (if provided)
    /// 3. Project root: `./workshop.toml` or `./.workshop.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/llm-workshop/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("WORKSHOP_").split("__"))
    }

    /// Load only default settings (for --no-settings)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global settings file path
    ///
    /// Returns XDG_CONFIG_HOME/llm-workshop/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("llm-workshop").join("config.toml"))
    }

    /// Get the project-level settings file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}
