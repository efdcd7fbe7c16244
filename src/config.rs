use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::client::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub mission: MissionApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionApiConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            mission: MissionApiConfig::default(),
        }
    }
}

impl Default for MissionApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Missing config file is the normal case and stays quiet; a file that
    /// exists but fails to parse falls back to defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path_ref = path.as_ref();
        match fs::read_to_string(path_ref) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!(
                        "Failed to parse config file '{}': {err}. Using defaults.",
                        path_ref.display()
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.mission.endpoint.clone(),
            model: self.mission.model.clone(),
        }
    }
}
