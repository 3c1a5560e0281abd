use super::error::ConfigError;
use super::store::HttpShapeStore;
use super::widget::{TileLayer, View};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENDPOINT_VAR: &str = "MAP_ANNOTATE_ENDPOINT";
pub const TILE_TOKEN_VAR: &str = "MAP_ANNOTATE_TILE_TOKEN";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub clear_reset_ms: u64,
    pub tiles: TileLayer,
    pub view: View,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: None,
            timeout_secs: 30,
            clear_reset_ms: 100,
            tiles: TileLayer::default(),
            view: View::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: name.clone(),
            source,
        })?;
        Config::from_toml(&content, &name)
    }

    /// Applies environment overrides, `lookup` resolves variable names.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(token) = lookup(TILE_TOKEN_VAR).filter(|v| !v.is_empty()) {
            self.tiles.access_token = Some(token);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn clear_reset(&self) -> Duration {
        Duration::from_millis(self.clear_reset_ms)
    }

    pub fn store(&self) -> Result<HttpShapeStore, ConfigError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ConfigError::MissingEndpoint)?;
        Ok(HttpShapeStore::new(endpoint, self.timeout())?)
    }
}
