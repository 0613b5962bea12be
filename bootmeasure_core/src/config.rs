//! Measurement settings and their `key=value` file format.

use crate::error::{Error, Result};
use crate::hash::Algorithm;
use crate::reader::DEFAULT_CHUNK_SIZE;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Directory levels `hash_tree` will enter, counting the start directory.
pub const DEFAULT_MAX_DEPTH: usize = 255;

/// Longest volume path, in UTF-16 code units.
pub const DEFAULT_MAX_PATH_LEN: usize = 2048;

/// Settings for one [`Measurer`](crate::Measurer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureConfig {
    pub algorithm: Algorithm,
    /// Bytes per content read.
    pub chunk_size: usize,
    /// Directory levels entered, counting the start directory.
    pub max_depth: usize,
    pub max_path_len: usize,
    /// Sort directory listings by name before hashing.
    pub sort_entries: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            sort_entries: true,
        }
    }
}

impl MeasureConfig {
    /// Load settings from a config file, starting from the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse `key=value` lines. Blank lines and `#` comments are skipped,
    /// unknown keys are ignored, and a `version` line must say `1`.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::invalid_config(format!("Expected key=value: {}", line)));
            };
            let value = value.trim();

            match key.trim() {
                "version" => {
                    if value != "1" {
                        return Err(Error::invalid_config(format!(
                            "Unsupported config version: {}",
                            value
                        )));
                    }
                }
                "algo" | "algorithm" => config.algorithm = Algorithm::parse(value)?,
                "chunk_size" => config.chunk_size = parse_number("chunk_size", value)?,
                "max_depth" => config.max_depth = parse_number("max_depth", value)?,
                "max_path_len" => config.max_path_len = parse_number("max_path_len", value)?,
                "sort_entries" => config.sort_entries = parse_bool("sort_entries", value)?,
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the walker cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::invalid_config("chunk_size must be positive"));
        }
        if self.max_depth == 0 {
            return Err(Error::invalid_config("max_depth must be positive"));
        }
        if self.max_path_len == 0 {
            return Err(Error::invalid_config("max_path_len must be positive"));
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::invalid_config(format!("{} is not a number: {}", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(Error::invalid_config(format!(
            "{} is not a boolean: {}",
            key, value
        ))),
    }
}
