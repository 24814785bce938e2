//! Event and storage configuration.
//!
//! Loaded once at startup and passed by reference to whatever renders the
//! event; nothing here is mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA_PATH: &str = "rsvps.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What the event page shows about the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDetails {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

impl Default for EventDetails {
    fn default() -> Self {
        Self {
            title: "AI Community Launch Party".to_string(),
            date: "Friday, July 26".to_string(),
            time: "6:00 – 9:00 PM".to_string(),
            location: "Launchpad Loft, San Francisco".to_string(),
            description: "Join fellow builders for an evening of demos, networking, \
                          and hands-on AI mini-workshops."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing CSV file for accepted RSVPs.
    pub data_path: PathBuf,
    pub event: EventDetails,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            event: EventDetails::default(),
        }
    }
}

impl Config {
    /// Reads a JSON config file, or returns the defaults when `path` is `None`.
    /// Keys missing from the file keep their default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_data_path(mut self, data_path: impl Into<PathBuf>) -> Self {
        self.data_path = data_path.into();
        self
    }
}
