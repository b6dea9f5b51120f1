//! Named control handlers exposed to operators.
//!
//! Elements attach read and write handlers under short names. The host
//! routes control-channel requests through this registry without knowing
//! which element owns a handler.

use crate::error::{Result, SwitchError};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Produces the current text value of a handler.
pub type ReadHandler = Arc<dyn Fn() -> String + Send + Sync>;

/// Applies a text value; returns an error without changing state on failure.
pub type WriteHandler = Arc<dyn Fn(&str) -> Result<()> + Send + Sync>;

/// Table of read and write handlers keyed by name.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    read: BTreeMap<String, ReadHandler>,
    write: BTreeMap<String, WriteHandler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a read handler, replacing any previous one with that name.
    pub fn add_read_handler(&mut self, name: impl Into<String>, handler: ReadHandler) {
        self.read.insert(name.into(), handler);
    }

    /// Registers a write handler, replacing any previous one with that name.
    pub fn add_write_handler(&mut self, name: impl Into<String>, handler: WriteHandler) {
        self.write.insert(name.into(), handler);
    }

    /// Invokes the read handler `name`.
    pub fn read(&self, name: &str) -> Result<String> {
        let handler = self
            .read
            .get(name)
            .ok_or_else(|| SwitchError::unknown_read_handler(name))?;
        Ok(handler())
    }

    /// Invokes the write handler `name` with `value`.
    pub fn write(&self, name: &str, value: &str) -> Result<()> {
        let handler = self
            .write
            .get(name)
            .ok_or_else(|| SwitchError::unknown_write_handler(name))?;
        handler(value)
    }

    /// Returns the registered read handler names in sorted order.
    pub fn read_handlers(&self) -> impl Iterator<Item = &str> {
        self.read.keys().map(String::as_str)
    }

    /// Returns the registered write handler names in sorted order.
    pub fn write_handlers(&self) -> impl Iterator<Item = &str> {
        self.write.keys().map(String::as_str)
    }

    /// Returns the total number of registered handlers.
    pub fn len(&self) -> usize {
        self.read.len() + self.write.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("read", &self.read.keys().collect::<Vec<_>>())
            .field("write", &self.write.keys().collect::<Vec<_>>())
            .finish()
    }
}
