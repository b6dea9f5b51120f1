//! Error types for switch element operations.
//!
//! All errors implement `std::error::Error` via `thiserror`. Out-of-range
//! output indices are deliberately absent from this taxonomy: they are
//! normalized to the drop sentinel rather than reported.

use std::io;
use thiserror::Error;

/// Message returned to control callers when a write is not an integer.
pub const CONTROL_VALUE_MESSAGE: &str = "Switch output must be integer";

/// Result type alias for switch element operations.
pub type Result<T> = std::result::Result<T, SwitchError>;

/// Errors that can occur while configuring or controlling an element.
#[derive(Debug, Error)]
pub enum SwitchError {
    /// A configuration argument could not be parsed. Fatal to stage startup.
    #[error("Invalid configuration argument '{argument}': expected {expected}")]
    ConfigParse {
        /// The offending argument text, as supplied by the host.
        argument: String,
        /// Description of the expected value.
        expected: String,
    },

    /// More configuration arguments were supplied than the element accepts.
    #[error("Too many configuration arguments: expected at most {max}, got {got}")]
    TooManyArguments {
        /// Maximum number of accepted arguments.
        max: usize,
        /// Number of arguments supplied.
        got: usize,
    },

    /// A control write carried a malformed value. State is unchanged.
    #[error("{message}")]
    ControlValue {
        /// Message reported to the control caller.
        message: String,
        /// The offending value after comment stripping.
        value: String,
    },

    /// No handler is registered under the requested name.
    #[error("No {kind} handler named '{name}'")]
    UnknownHandler {
        /// "read" or "write".
        kind: &'static str,
        /// The requested handler name.
        name: String,
    },

    /// No element class is registered under the requested name.
    #[error("Unknown element class '{class}'")]
    UnknownElement {
        /// The requested class name.
        class: String,
    },

    /// Host configuration file could not be parsed.
    #[error("Host configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SwitchError {
    /// Creates a configuration parse error for an integer argument.
    pub fn config_parse(argument: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::ConfigParse {
            argument: argument.into(),
            expected: expected.into(),
        }
    }

    /// Creates the control-write error for a non-integer value.
    pub fn control_value(value: impl Into<String>) -> Self {
        Self::ControlValue {
            message: CONTROL_VALUE_MESSAGE.to_string(),
            value: value.into(),
        }
    }

    /// Creates an unknown read handler error.
    pub fn unknown_read_handler(name: impl Into<String>) -> Self {
        Self::UnknownHandler {
            kind: "read",
            name: name.into(),
        }
    }

    /// Creates an unknown write handler error.
    pub fn unknown_write_handler(name: impl Into<String>) -> Self {
        Self::UnknownHandler {
            kind: "write",
            name: name.into(),
        }
    }

    /// Creates an unknown element class error.
    pub fn unknown_element(class: impl Into<String>) -> Self {
        Self::UnknownElement {
            class: class.into(),
        }
    }

    /// Returns true if this error must prevent the stage from running.
    pub fn is_fatal_to_startup(&self) -> bool {
        matches!(
            self,
            SwitchError::ConfigParse { .. }
                | SwitchError::TooManyArguments { .. }
                | SwitchError::UnknownElement { .. }
                | SwitchError::Config(_)
        )
    }
}
