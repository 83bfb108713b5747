//! Configuration management for the tax filing assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (TAXMATE_ prefix)
//!
//! The static knowledge base (ITR forms and tax-saving sections) is built in
//! and can be replaced by a YAML catalog file via `catalog_path`.

pub mod catalog;
pub mod settings;

pub use catalog::{
    FormCatalog, FormInfo, ItrForm, KnowledgeBase, TaxSavingCatalog, TaxSavingOption,
    TaxSavingSection,
};
pub use settings::{
    load_settings, load_settings_from, DialogueConfig, ObservabilityConfig, RuntimeEnvironment,
    Settings, SourceMatching,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
