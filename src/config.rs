//! Optional TOML settings file
//!
//! ```toml
//! log_level = "debug"
//!
//! [defaults]
//! built_up_area = 1200
//! floors = "G+1"
//! cost_per_sq_area = 1800
//!
//! [generator]
//! api_base_url = "https://api.groq.com/openai/v1/chat/completions"
//! model = "llama-3.3-70b-versatile"
//! timeout_seconds = 30
//! ```
//!
//! The generator API key is read from `LLM_API_KEY`, never from the file.
//!
//! Command-line flags override these values; missing values fall back to
//! the built-in defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::estimate::{DEFAULT_BUILT_UP_AREA, DEFAULT_COST_PER_AREA, EstimateRequest, Numeric};
use crate::floors::FloorSpec;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub defaults: ProjectDefaults,
    #[serde(default)]
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDefaults {
    pub built_up_area: Option<f64>,
    pub floors: Option<FloorSpec>,
    #[serde(alias = "cost_per_sq_yard")]
    pub cost_per_sq_area: Option<f64>,
}

/// Chat completions endpoint used for schedules and chat
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            defaults: ProjectDefaults::default(),
            generator: GeneratorSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from `path`, or the built-in defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Build a request, preferring explicit values over configured defaults
    pub fn request(
        &self,
        area: Option<String>,
        floors: Option<String>,
        rate: Option<String>,
    ) -> EstimateRequest {
        let built_up_area = match area {
            Some(text) => Numeric::Text(text),
            None => Numeric::Number(self.defaults.built_up_area.unwrap_or(DEFAULT_BUILT_UP_AREA)),
        };
        let floors = match floors {
            Some(text) => FloorSpec::Text(text),
            None => self.defaults.floors.clone().unwrap_or_default(),
        };
        let cost_per_sq_area = match rate {
            Some(text) => Numeric::Text(text),
            None => {
                Numeric::Number(self.defaults.cost_per_sq_area.unwrap_or(DEFAULT_COST_PER_AREA))
            }
        };

        EstimateRequest { built_up_area, floors, cost_per_sq_area }
    }
}
