//! Output formatting for CLI commands.
//!
//! Provides abstraction layer for outputting results in text or JSON format.

use anyhow::Result;
use bootmeasure_core::{Digest, MeasureReport, MeasurementStatus};
use serde::Serialize;
use std::io::{self, Write};

/// Result code for a complete measurement or a successful command.
pub const RESULT_OK: u8 = 0;

/// Result code for a command that failed outright.
pub const RESULT_ERROR: u8 = 1;

/// Result code for a measurement that finished with failures.
pub const RESULT_DEGRADED: u8 = 2;

/// Result code for a digest that differs from `--expect`.
pub const RESULT_MISMATCH: u8 = 3;

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            stdout: io::stdout(),
        }
    }

    /// Write output using the configured format.
    ///
    /// The `data` parameter must be a serializable struct that includes
    /// `success: bool` and `result_code: u8` fields.
    ///
    /// The `text_fn` closure is called only in text mode to generate the
    /// human-readable output.
    pub fn write<T: Serialize>(&self, data: &T, text_fn: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(&self.stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(&self.stdout, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error message directly.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    result_code,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

// ============================================================================
// Data Transfer Objects (DTOs) for JSON output
// ============================================================================

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// Output for `hash` command.
#[derive(Debug, Serialize)]
pub struct HashOutput {
    pub success: bool,
    pub result_code: u8,
    pub loader_path: String,
    pub algorithm: String,
    pub digest: Digest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Digest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_expected: Option<bool>,
    pub status: MeasurementStatus,
    pub measured_at: String,
    pub report: MeasureReport,
}

impl HashOutput {
    /// Human-readable rendering of the measurement.
    pub fn to_text(&self, verbose: bool) -> String {
        let mut text = format!("{} {}\n", self.digest, self.loader_path);
        if let (Some(expected), Some(false)) = (self.expected, self.matches_expected) {
            text.push_str(&format!("Mismatch: expected {}\n", expected));
        }
        if verbose {
            text.push_str(&format!("Algorithm: {}\n", self.algorithm));
            text.push_str(&format!("Measured at: {}\n", self.measured_at));
            text.push_str(&format!(
                "Files: {} ({} bytes)\n",
                self.report.files_hashed, self.report.bytes_hashed
            ));
            text.push_str(&format!(
                "Directories: {}\n",
                self.report.directories_visited
            ));
            for missing in &self.report.missing {
                text.push_str(&format!("Missing: {}\n", missing));
            }
        }
        for failure in &self.report.failures {
            text.push_str(&format!(
                "Not measured: {}:{} ({})\n",
                failure.volume, failure.path, failure.message
            ));
        }
        text
    }
}

/// One candidate checked by the `glob` command.
#[derive(Debug, Clone, Serialize)]
pub struct GlobResult {
    pub value: String,
    pub matched: bool,
    pub too_complex: bool,
}

/// Output for `glob` command.
#[derive(Debug, Serialize)]
pub struct GlobOutput {
    pub success: bool,
    pub result_code: u8,
    pub pattern: String,
    pub results: Vec<GlobResult>,
}

impl GlobOutput {
    /// One `<pattern> <value>: <bool>` line per candidate.
    pub fn to_text(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{} {}: {}\n", self.pattern, r.value, r.matched))
            .collect()
    }
}
