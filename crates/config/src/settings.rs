//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::catalog::KnowledgeBase;
use crate::ConfigError;

/// Upper bound for the intro delay before the greeting appears
const MAX_INTRO_DELAY_MS: u64 = 60_000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// How an income-source reply is turned into a record key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMatching {
    /// Lower-case, strip non-letters, require an exact key.
    ///
    /// Labels that don't normalize to a key are ignored: "Rental Income"
    /// becomes "rentalincome" and the reply has no effect.
    Literal,
    /// Also accept the normalized quick-reply labels of every source
    #[default]
    Canonical,
}

/// Dialogue behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueConfig {
    #[serde(default)]
    pub source_matching: SourceMatching,

    /// Delay before the greeting, handled by the presentation layer
    #[serde(default = "default_intro_delay_ms")]
    pub intro_delay_ms: u64,
}

fn default_intro_delay_ms() -> u64 {
    3000
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            source_matching: SourceMatching::default(),
            intro_delay_ms: default_intro_delay_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub dialogue: DialogueConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Optional YAML catalog replacing the built-in forms and tax-saving tables
    #[serde(default)]
    pub catalog_path: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dialogue.intro_delay_ms > MAX_INTRO_DELAY_MS {
            return Err(ConfigError::InvalidValue {
                field: "dialogue.intro_delay_ms".to_string(),
                message: format!(
                    "Intro delay too high (maximum {}ms), got {}",
                    MAX_INTRO_DELAY_MS, self.dialogue.intro_delay_ms
                ),
            });
        }

        let level = self.observability.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!(
                    "Must be one of {}, got {}",
                    LOG_LEVELS.join(", "),
                    self.observability.log_level
                ),
            });
        }

        Ok(())
    }

    /// Knowledge base for this configuration
    pub fn knowledge_base(&self) -> Result<Arc<KnowledgeBase>, ConfigError> {
        match &self.catalog_path {
            Some(path) => KnowledgeBase::load(path).map(Arc::new),
            None => Ok(KnowledgeBase::builtin()),
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings with `dir` in place of the `config/` directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("TAXMATE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
