//! Log format configuration
//!
//! The analysis log frames machine-readable events as
//! `PLE;<TOKEN>;<field>;...;<field>;END!`. Markers, delimiter, timestamp format
//! and event tokens are collected in [`LogFormat`] so a report can be parsed
//! from producers that deviate from the defaults.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default start marker of a parseable log event.
pub const PLE_START: &str = "PLE";
/// Default field delimiter.
pub const PLE_DELIM: &str = ";";
/// Default end marker of a parseable log event.
pub const PLE_END: &str = "END!";
/// Default timestamp format (chrono syntax, six fractional digits after a comma).
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%6f";

/// Event-type tokens the report depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventTokens {
    /// Evaluation result of one candidate.
    pub evaluation_result: String,
    /// Start of an execution phase.
    pub phase_start: String,
    /// End of an execution phase.
    pub phase_end: String,
}

impl Default for EventTokens {
    fn default() -> Self {
        Self {
            evaluation_result: "EVAL".to_string(),
            phase_start: "PH_START".to_string(),
            phase_end: "PH_END".to_string(),
        }
    }
}

/// Framing and timestamp conventions of an analysis log.
///
/// # Example
///
/// ```rust
/// use gama_report::LogFormat;
///
/// let format = LogFormat::from_json(r#"{"delimiter": "|"}"#)?;
/// assert_eq!(format.delimiter, "|");
/// assert_eq!(format.start_marker, "PLE");
/// # Ok::<(), gama_report::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFormat {
    /// Token opening every parseable event line.
    pub start_marker: String,
    /// Token closing every parseable event line.
    pub end_marker: String,
    /// Field delimiter.
    pub delimiter: String,
    /// chrono format string shared by every timestamp field.
    pub time_format: String,
    /// Event-type tokens.
    pub tokens: EventTokens,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            start_marker: PLE_START.to_string(),
            end_marker: PLE_END.to_string(),
            delimiter: PLE_DELIM.to_string(),
            time_format: TIME_FORMAT.to_string(),
            tokens: EventTokens::default(),
        }
    }
}

impl LogFormat {
    /// Parse a format from JSON. Missing keys fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed or the resulting
    /// format fails [`LogFormat::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let format: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("cannot read log format: {e}")))?;
        format.validate()?;
        Ok(format)
    }

    /// Check that markers, delimiter and tokens are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if any of them is empty.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("start_marker", &self.start_marker),
            ("end_marker", &self.end_marker),
            ("delimiter", &self.delimiter),
            ("time_format", &self.time_format),
            ("tokens.evaluation_result", &self.tokens.evaluation_result),
            ("tokens.phase_start", &self.tokens.phase_start),
            ("tokens.phase_end", &self.tokens.phase_end),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::Config(format!("'{name}' must not be empty")));
            }
        }
        Ok(())
    }

    /// Parse a timestamp field with [`LogFormat::time_format`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the field does not match the format.
    pub fn parse_timestamp(&self, field: &str) -> Result<chrono::NaiveDateTime> {
        chrono::NaiveDateTime::parse_from_str(field.trim(), &self.time_format).map_err(|e| {
            Error::Parse(format!(
                "timestamp '{field}' does not match '{}': {e}",
                self.time_format
            ))
        })
    }
}
