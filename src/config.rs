use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::constants;

/// Everything needed to reach the model. Built once at startup.
#[derive(Clone)]
pub struct StylistConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for StylistConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylistConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StylistConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: constants::GEMINI_API_KEY.clone(),
            api_base: constants::GEMINI_API_BASE.clone(),
            model: constants::STYLECAST_MODEL.clone(),
            timeout: Duration::from_secs(*constants::HTTP_TIMEOUT_SECS),
        }
    }

    /// Applies CLI overrides on top of the environment defaults.
    pub fn with_overrides(mut self, api_key: Option<String>, model: Option<String>, api_base: Option<String>) -> Self {
        if let Some(key) = api_key {
            self.api_key = key;
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(base) = api_base {
            self.api_base = base;
        }
        self
    }

    /// Logs configuration problems. Never fails: a bad key shows up as a
    /// failed call later.
    pub fn warn_if_incomplete(&self) {
        if self.api_key.trim().is_empty() {
            warn!("GEMINI_API_KEY is not set; requests to the model will fail until it is");
        }
    }
}

/// Where the web UI loads its templates and static assets from.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from(constants::TEMPLATES_DIR.as_str()),
            static_dir: PathBuf::from(constants::STATIC_DIR.as_str()),
        }
    }
}
