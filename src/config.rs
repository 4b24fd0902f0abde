use crate::error::WriterError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BASENAME: &str = "paperback";
/// Month-day-year plus a 12-hour clock with lowercase am/pm,
/// e.g. `08-23-26-3:07:45-pm`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%m-%d-%y-%-I:%M:%S-%P";
pub const DEFAULT_EXTENSION: &str = "txt";

/// Where `write` calls go.
///
/// The numeric values are part of the configuration surface: a raw `1`,
/// `2` or `3` in a config document maps onto these variants, and anything
/// else is rejected with [`WriterError::UnknownMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mode {
    /// Write to the console and the file.
    Both = 1,
    /// Write to the console only.
    Console = 2,
    /// Write to the file only.
    File = 3,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Console
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        mode as u8
    }
}

impl TryFrom<u8> for Mode {
    type Error = WriterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Mode::Both),
            2 => Ok(Mode::Console),
            3 => Ok(Mode::File),
            other => Err(WriterError::UnknownMode(other.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" | "1" => Ok(Mode::Both),
            "console" | "2" => Ok(Mode::Console),
            "file" | "3" => Ok(Mode::File),
            other => Err(WriterError::UnknownMode(other.to_string())),
        }
    }
}

/// Writer configuration, immutable once a writer is built from it.
///
/// Every field has a serde default, so a partial document (JSON, TOML, ...)
/// deserializes with the remaining fields filled in, the same contract as
/// building one with struct-update syntax over [`WriterConfig::default()`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Directory the file is written to, created recursively on first use.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Base of the derived filename.
    #[serde(default = "default_basename")]
    pub basename: String,

    /// Whether a timestamp is appended to the filename.
    #[serde(default = "default_timestamp")]
    pub timestamp: bool,

    /// strftime pattern for the filename timestamp.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// File extension; `None` leaves the filename bare.
    #[serde(default = "default_extension")]
    pub extension: Option<String>,

    /// Where `write` calls go.
    #[serde(default)]
    pub mode: Mode,

    /// Whether non-string values are rendered structurally.
    #[serde(default = "default_inspect")]
    pub inspect: bool,
}

fn default_basename() -> String {
    DEFAULT_BASENAME.to_string()
}

fn default_timestamp() -> bool {
    true
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_extension() -> Option<String> {
    Some(DEFAULT_EXTENSION.to_string())
}

fn default_inspect() -> bool {
    true
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            directory: None,
            basename: default_basename(),
            timestamp: default_timestamp(),
            timestamp_format: default_timestamp_format(),
            extension: default_extension(),
            mode: Mode::default(),
            inspect: default_inspect(),
        }
    }
}
