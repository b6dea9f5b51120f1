//! Host configuration file support.
//!
//! Describes one stage for the `switchctl` harness:
//!
//! ```toml
//! element = "Switch"
//! outputs = 3
//! arguments = ["1"]
//! ```
//!
//! Every field is optional and falls back to its default.

use crate::error::{Result, SwitchError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Stage description consumed by the host harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Element class to instantiate.
    #[serde(default = "default_element")]
    pub element: String,

    /// Number of connected outputs.
    #[serde(default = "default_outputs")]
    pub outputs: usize,

    /// Configuration argument vector passed to the element.
    #[serde(default)]
    pub arguments: Vec<String>,
}

fn default_element() -> String {
    "Switch".to_string()
}

fn default_outputs() -> usize {
    2
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            element: default_element(),
            outputs: default_outputs(),
            arguments: Vec::new(),
        }
    }
}

impl HostConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SwitchError::Config(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Overrides the output count.
    pub fn with_outputs(mut self, outputs: usize) -> Self {
        self.outputs = outputs;
        self
    }

    /// Overrides the argument vector.
    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }
}
