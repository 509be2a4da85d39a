//! TOML configuration file parsing and loading
//!
//! Config values only fill in what the command line left unset, so the
//! command line always wins. `[[layouts]]` tables become additional layout
//! profiles.

use crate::core::validation::ValidationError;
use crate::scanner::LayoutProfile;
use std::path::{Path, PathBuf};

use super::args::{is_disabled_log_file, Args, LOG_FORMATS, LOG_LEVELS};

/// Directory under the platform config dir holding the default config file
pub const CONFIG_DIR_NAME: &str = "Runscan";
pub const CONFIG_FILE_NAME: &str = "runscan.toml";

/// Default config file location, whether or not it exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Args {
    /// Load the config file and merge it into `args`.
    ///
    /// An explicitly named file must exist; the default location is used only
    /// when present. Returns the path that was loaded.
    pub fn parse_config_file(
        args: &mut Self,
        config_file: Option<&Path>,
    ) -> Result<Option<PathBuf>, ValidationError> {
        let config_path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ValidationError::new(&format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        log::debug!("Loading configuration from {}", config_path.display());
        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            ValidationError::new(&format!(
                "Error reading configuration file {}: {}",
                config_path.display(),
                e
            ))
        })?;
        let config = toml::from_str::<toml::Table>(&contents).map_err(|e| {
            ValidationError::new(&format!(
                "Error parsing configuration file {}: {}",
                config_path.display(),
                e
            ))
        })?;
        Self::apply_toml_values(args, &config).map_err(|e| {
            ValidationError::new(&format!(
                "Error in configuration file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(Some(config_path))
    }

    /// Apply TOML configuration values to Args
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ValidationError> {
        for key in config.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::warn!("Ignoring unknown configuration key '{}'", key);
            }
        }

        if args.layout.is_none() {
            args.layout = Self::string_value(config, "layout")?;
        }
        if args.format.is_none() {
            args.format = Self::string_value(config, "format")?;
        }
        if args.output.is_none() {
            args.output = Self::string_value(config, "output")?.map(PathBuf::from);
        }
        if !args.verify {
            args.verify = Self::bool_value(config, "verify")?.unwrap_or(false);
        }

        if args.color_choice().is_none() {
            if let Some(no_color) = Self::bool_value(config, "no-color")? {
                args.color = !no_color;
                args.no_color = no_color;
            } else if let Some(color) = Self::bool_value(config, "color")? {
                args.color = color;
                args.no_color = !color;
            }
        }

        if args.log_level.is_none() {
            args.log_level = Self::choice_value(config, "log-level", &LOG_LEVELS)?;
        }
        if args.log_format.is_none() {
            args.log_format = Self::choice_value(config, "log-format", &LOG_FORMATS)?;
        }
        if args.log_file.is_none() {
            args.log_file = Self::string_value(config, "log-file")?
                .map(PathBuf::from)
                .filter(|p| !is_disabled_log_file(p));
        }

        if let Some(layouts) = config.get("layouts") {
            args.layouts = Self::layout_profiles(layouts)?;
        }

        Ok(())
    }

    fn string_value(config: &toml::Table, key: &str) -> Result<Option<String>, ValidationError> {
        match config.get(key) {
            None => Ok(None),
            Some(value) => value.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
                ValidationError::new(&format!("'{}' must be a string", key))
            }),
        }
    }

    fn choice_value(
        config: &toml::Table,
        key: &str,
        allowed: &[&str],
    ) -> Result<Option<String>, ValidationError> {
        match Self::string_value(config, key)? {
            Some(value) if !allowed.contains(&value.as_str()) => Err(ValidationError::new(&format!(
                "'{}' must be one of: {} (got '{}')",
                key,
                allowed.join(", "),
                value
            ))),
            value => Ok(value),
        }
    }

    fn bool_value(config: &toml::Table, key: &str) -> Result<Option<bool>, ValidationError> {
        match config.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| ValidationError::new(&format!("'{}' must be true or false", key))),
        }
    }

    fn layout_profiles(value: &toml::Value) -> Result<Vec<LayoutProfile>, ValidationError> {
        let tables = value
            .as_array()
            .ok_or_else(|| ValidationError::new("'layouts' must be an array of tables ([[layouts]])"))?;
        tables
            .iter()
            .enumerate()
            .map(|(index, table)| {
                table.clone().try_into::<LayoutProfile>().map_err(|e| {
                    ValidationError::new(&format!("Invalid layout profile #{}: {}", index + 1, e))
                })
            })
            .collect()
    }
}

const KNOWN_KEYS: [&str; 10] = [
    "layout",
    "format",
    "output",
    "verify",
    "color",
    "no-color",
    "log-level",
    "log-format",
    "log-file",
    "layouts",
];
