//! Configuration management for mdextra.
//!
//! Parses `mdextra.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [extra]
//! extensions = ["tables", "fenced_code_gfm"]
//! table_class = "table-striped"
//! highlighter = "prettify"
//! sanitize = true
//!
//! [converter]
//! sanitize = false
//! ```
//!
//! Raw `[extra]` values are resolved into [`ExtraOptions`] at load time.
//! CLI settings can be applied during load via [`CliSettings`].

use std::path::{Path, PathBuf};

use mdextra::{Extensions, ExtraOptions, Highlighter};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override enabled constructs.
    pub extensions: Option<Extensions>,
    /// Override table CSS class.
    pub table_class: Option<String>,
    /// Override highlighter convention.
    pub highlighter: Option<Highlighter>,
    /// Override sanitization of nested conversions.
    pub sanitize_nested: Option<bool>,
    /// Override sanitization of the host converter output.
    pub sanitize_output: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "mdextra.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extension options as written in TOML.
    extra: ExtraConfigRaw,
    /// Host converter configuration.
    pub converter: ConverterConfig,

    /// Resolved extension options (set after loading).
    #[serde(skip)]
    pub extra_resolved: ExtraOptions,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw `[extra]` section with names as strings.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ExtraConfigRaw {
    extensions: Option<Vec<String>>,
    table_class: Option<String>,
    highlighter: Option<String>,
    sanitize: Option<bool>,
}

/// Host converter configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Whether the host converter sanitizes its own output.
    pub sanitize: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a value that can be written into an HTML attribute as a single token.
fn require_attribute_token(value: &str, field: &str) -> Result<(), ConfigError> {
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>'))
    {
        return Err(ConfigError::Validation(format!(
            "{field} must not contain whitespace, quotes or angle brackets"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdextra.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting options are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No configuration file found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(extensions) = &settings.extensions {
            self.extra_resolved.extensions.clone_from(extensions);
        }
        if let Some(table_class) = &settings.table_class {
            self.extra_resolved.table_class = Some(table_class.clone());
        }
        if let Some(highlighter) = settings.highlighter {
            self.extra_resolved.highlighter = highlighter;
        }
        if let Some(sanitize) = settings.sanitize_nested {
            self.extra_resolved.sanitize = sanitize;
        }
        if let Some(sanitize) = settings.sanitize_output {
            self.converter.sanitize = sanitize;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        discover_from(&cwd)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.resolve_extra()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Resolve raw `[extra]` strings into typed options.
    fn resolve_extra(&mut self) -> Result<(), ConfigError> {
        let raw = &self.extra;
        let mut options = ExtraOptions::default();

        if let Some(names) = &raw.extensions {
            options.extensions = Extensions::from_names(names)
                .map_err(|e| ConfigError::Validation(format!("extra.extensions: {e}")))?;
        }
        if let Some(highlighter) = &raw.highlighter {
            options.highlighter = highlighter
                .parse()
                .map_err(|e| ConfigError::Validation(format!("extra.highlighter: {e}")))?;
        }
        options.table_class.clone_from(&raw.table_class);
        if let Some(sanitize) = raw.sanitize {
            options.sanitize = sanitize;
        }

        self.extra_resolved = options;
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI settings
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(class) = &self.extra_resolved.table_class {
            require_non_empty(class, "extra.table_class")?;
            require_attribute_token(class, "extra.table_class")?;
        }
        if matches!(&self.extra_resolved.extensions, Extensions::Only(set) if set.is_empty()) {
            return Err(ConfigError::Validation(
                "extra.extensions must name at least one extension".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Nearest `mdextra.toml` in `start` or one of its ancestors.
fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "Discovered configuration");
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
