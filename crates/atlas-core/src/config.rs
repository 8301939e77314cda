//! Orchestrator configuration and loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::models::SpecialistKind;

/// Tunables for dispatch and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Per-kind specialist timeouts in milliseconds
    pub timeouts_ms: BTreeMap<SpecialistKind, u64>,

    /// Timeout for kinds missing from `timeouts_ms`
    pub default_timeout_ms: u64,

    /// Total attempts for a specialist whose failure is retryable
    pub specialist_attempts: u32,

    /// Total attempts for a compare-and-swap write
    pub write_attempts: u32,
}

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_SPECIALIST_ATTEMPTS: u32 = 2;
const DEFAULT_WRITE_ATTEMPTS: u32 = 3;

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timeouts_ms: BTreeMap::new(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            specialist_attempts: DEFAULT_SPECIALIST_ATTEMPTS,
            write_attempts: DEFAULT_WRITE_ATTEMPTS,
        }
    }
}

impl OrchestratorConfig {
    /// Timeout for one attempt of the given specialist.
    pub fn timeout_for(&self, kind: SpecialistKind) -> Duration {
        let ms = self
            .timeouts_ms
            .get(&kind)
            .copied()
            .unwrap_or(self.default_timeout_ms);
        Duration::from_millis(ms)
    }

    /// Overrides the timeout of one kind.
    pub fn with_timeout(mut self, kind: SpecialistKind, timeout: Duration) -> Self {
        self.timeouts_ms.insert(kind, timeout.as_millis() as u64);
        self
    }

    /// Rejects values that would make dispatch or persistence impossible.
    pub fn validate(&self) -> Result<()> {
        if self.specialist_attempts == 0 {
            return Err(AtlasError::Configuration {
                message: "specialist_attempts must be at least 1".to_string(),
            });
        }
        if self.write_attempts == 0 {
            return Err(AtlasError::Configuration {
                message: "write_attempts must be at least 1".to_string(),
            });
        }
        if self.default_timeout_ms == 0 {
            return Err(AtlasError::Configuration {
                message: "default_timeout_ms must be positive".to_string(),
            });
        }
        if let Some((kind, _)) = self.timeouts_ms.iter().find(|(_, ms)| **ms == 0) {
            return Err(AtlasError::Configuration {
                message: format!("timeout for {} must be positive", kind.as_str()),
            });
        }
        Ok(())
    }

    /// Parses a YAML document; missing fields take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| AtlasError::Configuration {
            message: format!("Failed to parse config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a YAML config file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AtlasError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_yaml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads `path` if given, otherwise the XDG config file when it exists,
    /// otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Some(path) => Self::load_from_file(path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `$XDG_CONFIG_HOME/atlas/config.yaml` (or a system config dir), if it
    /// exists.
    pub fn default_config_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("atlas").find_config_file("config.yaml")
    }
}
