//! Stage contract and element-class registry.
//!
//! A host drives every pipeline stage through [`Element`]:
//!
//! 1. Instantiation: the host looks up the class in an [`ElementRegistry`]
//! 2. Topology: `notify_noutputs()` reports the final fan-out degree
//! 3. Configuration: `configure()` parses the argument vector
//! 4. Control: `add_handlers()` attaches named read/write handlers
//! 5. Data plane: `push()` is called for every incoming packet
//! 6. Teardown: the element is dropped

use crate::error::{Result, SwitchError};
use crate::handler::HandlerRegistry;
use crate::packet::Fanout;
use crate::selector::OutputSelector;
use log::info;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One stage of a push-style packet pipeline.
///
/// Methods take `&self` so the data-plane and control-plane can share one
/// instance across threads; implementations keep their state in atomics or
/// control-path locks.
pub trait Element<P>: Send + Sync {
    /// Returns the element class name used for registration.
    fn class_name(&self) -> &'static str;

    /// Returns a fresh instance of the same class in its default state.
    ///
    /// Run-time state is never carried over to the clone.
    fn clone_element(&self) -> Arc<dyn Element<P>>;

    /// Records the number of connected outputs once topology is final.
    fn notify_noutputs(&self, n: usize);

    /// Parses the configuration argument vector.
    ///
    /// An error is fatal to stage startup.
    fn configure(&self, conf: &[String]) -> Result<()>;

    /// Returns the externally visible configuration string.
    fn configuration(&self) -> String;

    /// Processes one packet arriving on input `port`.
    fn push(&self, port: usize, packet: P, outputs: &Fanout<P>);

    /// Attaches this element's control handlers to `registry`.
    fn add_handlers(self: Arc<Self>, registry: &mut HandlerRegistry);
}

/// Constructor for one element class.
pub type ElementFactory<P> = fn() -> Arc<dyn Element<P>>;

/// Table of element classes keyed by class name.
pub struct ElementRegistry<P> {
    factories: BTreeMap<&'static str, ElementFactory<P>>,
}

impl<P: Send + 'static> ElementRegistry<P> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Creates a registry holding every element class this crate provides.
    pub fn with_standard_elements() -> Self {
        let mut registry = Self::new();
        registry.register(OutputSelector::CLASS_NAME, new_switch::<P>);
        registry
    }

    /// Registers `factory` under `class`, replacing any previous entry.
    pub fn register(&mut self, class: &'static str, factory: ElementFactory<P>) {
        self.factories.insert(class, factory);
    }

    /// Returns true if `class` is registered.
    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Returns the registered class names in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Creates a new instance of `class`.
    pub fn instantiate(&self, class: &str) -> Result<Arc<dyn Element<P>>> {
        let factory = self
            .factories
            .get(class)
            .ok_or_else(|| SwitchError::unknown_element(class))?;
        info!("Instantiating element class {}", class);
        Ok(factory())
    }
}

impl<P: Send + 'static> Default for ElementRegistry<P> {
    fn default() -> Self {
        Self::with_standard_elements()
    }
}

fn new_switch<P: Send + 'static>() -> Arc<dyn Element<P>> {
    Arc::new(OutputSelector::new())
}
