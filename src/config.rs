//! Configuration management for the location dialog
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::LocationError;
use crate::options::{LocationOptions, LocationRequiredFields};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDialogConfig {
    /// Bing Maps geospatial API configuration
    #[serde(default)]
    pub bing: BingConfig,
    /// Dialog behaviour
    #[serde(default)]
    pub dialog: DialogConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bing Maps REST API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BingConfig {
    /// Bing Maps key
    pub api_key: Option<String>,
    /// Base URL for the REST API
    #[serde(default = "default_bing_base_url")]
    pub base_url: String,
    /// Culture code sent with every lookup
    #[serde(default = "default_bing_culture")]
    pub culture: String,
    /// Maximum number of candidates for address queries
    #[serde(default = "default_bing_max_results")]
    pub max_results: u32,
    /// Request timeout in seconds
    #[serde(default = "default_bing_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_bing_max_retries")]
    pub max_retries: u32,
}

/// Dialog behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Fill the address of point-only locations via reverse geocoding
    #[serde(default = "default_reverse_geocode")]
    pub reverse_geocode: bool,
    /// Address fields the user must provide (street_address, locality, region, postal_code, country)
    #[serde(default)]
    pub required_fields: Vec<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_bing_base_url() -> String {
    "https://dev.virtualearth.net/REST/v1".to_string()
}

fn default_bing_culture() -> String {
    "en-US".to_string()
}

fn default_bing_max_results() -> u32 {
    5
}

fn default_bing_timeout() -> u32 {
    30
}

fn default_bing_max_retries() -> u32 {
    3
}

fn default_reverse_geocode() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for BingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_bing_base_url(),
            culture: default_bing_culture(),
            max_results: default_bing_max_results(),
            timeout_seconds: default_bing_timeout(),
            max_retries: default_bing_max_retries(),
        }
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            reverse_geocode: default_reverse_geocode(),
            required_fields: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for LocationDialogConfig {
    fn default() -> Self {
        Self {
            bing: BingConfig::default(),
            dialog: DialogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DialogConfig {
    /// Dialog options derived from the configured switches
    #[must_use]
    pub fn options(&self) -> LocationOptions {
        let mut options = LocationOptions::empty();
        if self.reverse_geocode {
            options |= LocationOptions::REVERSE_GEOCODE;
        }
        options
    }

    /// Required address fields parsed from their configured names
    pub fn required_fields(&self) -> crate::Result<LocationRequiredFields> {
        LocationRequiredFields::from_names(&self.required_fields)
    }
}

impl LocationDialogConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as BOTLOCATION_BING__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("BOTLOCATION")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("dialog.required_fields"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: LocationDialogConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bot-location").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.bing.base_url.is_empty() {
            self.bing.base_url = default_bing_base_url();
        }
        if self.bing.culture.is_empty() {
            self.bing.culture = default_bing_culture();
        }
        if self.bing.max_results == 0 {
            self.bing.max_results = default_bing_max_results();
        }
        if self.bing.timeout_seconds == 0 {
            self.bing.timeout_seconds = default_bing_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.dialog.required_fields()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.bing.api_key {
            if api_key.trim().is_empty() {
                return Err(LocationError::config(
                    "Bing Maps key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 16 {
                return Err(LocationError::config(
                    "Bing Maps key appears to be invalid (too short). Please check your key."
                ).into());
            }

            if api_key.len() > 128 {
                return Err(LocationError::config(
                    "Bing Maps key appears to be invalid (too long). Please check your key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.bing.timeout_seconds > 300 {
            return Err(LocationError::config(
                "Bing Maps timeout cannot exceed 300 seconds"
            ).into());
        }

        if self.bing.max_retries > 10 {
            return Err(LocationError::config(
                "Bing Maps max retries cannot exceed 10"
            ).into());
        }

        if self.bing.max_results > 20 {
            return Err(LocationError::config(
                "Bing Maps max results cannot exceed 20"
            ).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(LocationError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(LocationError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if !self.bing.base_url.starts_with("http://") && !self.bing.base_url.starts_with("https://") {
            return Err(LocationError::config(
                "Bing Maps base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // load_from_path reads process-wide BOTLOCATION_ variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = LocationDialogConfig::default();
        assert_eq!(config.bing.base_url, "https://dev.virtualearth.net/REST/v1");
        assert_eq!(config.bing.culture, "en-US");
        assert_eq!(config.bing.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.dialog.reverse_geocode);
        assert!(config.bing.api_key.is_none());
    }

    #[test]
    fn test_dialog_options_from_config() {
        let mut config = LocationDialogConfig::default();
        assert_eq!(config.dialog.options(), LocationOptions::REVERSE_GEOCODE);

        config.dialog.reverse_geocode = false;
        assert!(config.dialog.options().is_empty());

        config.dialog.required_fields = vec!["locality".to_string(), "postal_code".to_string()];
        assert_eq!(
            config.dialog.required_fields().unwrap(),
            LocationRequiredFields::LOCALITY | LocationRequiredFields::POSTAL_CODE
        );
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = LocationDialogConfig::default();
        config.bing.api_key = Some("short".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = LocationDialogConfig::default();
        config.bing.api_key = Some("AqTGBsziZHIJYYxgivLBf0hVdrAk9mWO".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = LocationDialogConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = LocationDialogConfig::default();
        config.bing.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_unknown_required_field() {
        let mut config = LocationDialogConfig::default();
        config.dialog.required_fields = vec!["planet".to_string()];
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown required field"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = LocationDialogConfig::default();
        config.bing.base_url.clear();
        config.bing.max_results = 0;
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.bing.base_url, "https://dev.virtualearth.net/REST/v1");
        assert_eq!(config.bing.max_results, 5);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let path = std::env::temp_dir().join(format!(
            "bot-location-config-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[bing]\nculture = \"de-DE\"\nmax_retries = 1\n\n[dialog]\nreverse_geocode = false\nrequired_fields = [\"country\"]\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = LocationDialogConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.bing.culture, "de-DE");
        assert_eq!(config.bing.max_retries, 1);
        assert_eq!(config.bing.timeout_seconds, 30);
        assert!(!config.dialog.reverse_geocode);
        assert_eq!(
            config.dialog.required_fields().unwrap(),
            LocationRequiredFields::COUNTRY
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = LocationDialogConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("bot-location"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }

    #[test]
    fn test_environment_variable_override() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: test environment, guarded by ENV_LOCK
        unsafe {
            env::set_var("BOTLOCATION_BING__CULTURE", "fr-CH");
            env::set_var("BOTLOCATION_DIALOG__REQUIRED_FIELDS", "locality,country");
        }

        let missing = env::temp_dir().join("bot-location-missing-config.toml");
        let result = LocationDialogConfig::load_from_path(Some(missing));

        // SAFETY: test cleanup, guarded by ENV_LOCK
        unsafe {
            env::remove_var("BOTLOCATION_BING__CULTURE");
            env::remove_var("BOTLOCATION_DIALOG__REQUIRED_FIELDS");
        }

        let config = result.unwrap();
        assert_eq!(config.bing.culture, "fr-CH");
        assert_eq!(
            config.dialog.required_fields().unwrap(),
            LocationRequiredFields::LOCALITY | LocationRequiredFields::COUNTRY
        );
        assert!(config.dialog.reverse_geocode);
    }
}
