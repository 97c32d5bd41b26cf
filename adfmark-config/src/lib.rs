//! Shared configuration loader for the adfmark toolchain.
//!
//! `defaults/adfmark.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`AdfmarkConfig`].

use adfmark::{ConvertOptions, Preset};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/adfmark.default.toml");

/// Top-level configuration consumed by adfmark applications.
#[derive(Debug, Clone, Deserialize)]
pub struct AdfmarkConfig {
    pub convert: ConvertConfig,
    pub output: OutputConfig,
    pub inspect: InspectConfig,
}

/// Mirrors the knobs exposed by the conversion engine.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub preset: Preset,
    pub use_headings: bool,
    pub max_heading_level: u8,
    pub preserve_line_breaks: bool,
    pub strict_mode: bool,
    pub default_code_language: String,
    /// Left unset in the defaults file so the preset's own choice applies.
    pub warn_on_risky_nodes: Option<bool>,
}

impl From<ConvertConfig> for ConvertOptions {
    fn from(config: ConvertConfig) -> Self {
        ConvertOptions {
            preset: config.preset,
            use_headings: Some(config.use_headings),
            max_heading_level: Some(config.max_heading_level),
            preserve_line_breaks: Some(config.preserve_line_breaks),
            strict_mode: Some(config.strict_mode),
            default_code_language: Some(config.default_code_language),
            warn_on_risky_nodes: config.warn_on_risky_nodes,
        }
    }
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        ConvertOptions {
            preset: config.preset,
            use_headings: Some(config.use_headings),
            max_heading_level: Some(config.max_heading_level),
            preserve_line_breaks: Some(config.preserve_line_breaks),
            strict_mode: Some(config.strict_mode),
            default_code_language: Some(config.default_code_language.clone()),
            warn_on_risky_nodes: config.warn_on_risky_nodes,
        }
    }
}

/// Controls how converted documents are written out.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
    pub show_warnings: bool,
}

/// Controls `adfmark inspect` event dumps.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_spans: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<AdfmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AdfmarkConfig, ConfigError> {
    Loader::new().build()
}
