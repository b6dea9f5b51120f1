//! Run-time selectable output switch for push-style packet pipelines.
//!
//! This crate provides the `Switch` element and the seams a pipeline host
//! needs to drive it:
//!
//! - [`OutputSelector`]: the `Switch` element's state and forwarding decision
//! - [`Element`]: stage contract a host drives (notify, configure, push)
//! - [`ElementRegistry`]: element classes keyed by name
//! - [`HandlerRegistry`]: named read/write control handlers
//! - [`Fanout`] / [`PacketSink`]: index-addressable destinations and discard
//!
//! # Example
//!
//! ```
//! use sonic_switch_element::{Discard, Element, ElementRegistry, Fanout, HandlerRegistry};
//! use std::sync::Arc;
//!
//! let registry: ElementRegistry<Vec<u8>> = ElementRegistry::with_standard_elements();
//! let switch = registry.instantiate("Switch").unwrap();
//!
//! let mut fanout: Fanout<Vec<u8>> = Fanout::new();
//! fanout.connect(Arc::new(Discard));
//! fanout.connect(Arc::new(Discard));
//!
//! switch.notify_noutputs(fanout.len());
//! switch.configure(&["1".to_string()]).unwrap();
//!
//! let mut handlers = HandlerRegistry::new();
//! Arc::clone(&switch).add_handlers(&mut handlers);
//! assert_eq!(handlers.read("switch").unwrap(), "1\n");
//!
//! switch.push(0, vec![0u8; 64], &fanout);
//! handlers.write("switch", "5").unwrap();
//! assert_eq!(handlers.read("switch").unwrap(), "-1\n");
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod handler;
pub mod host;
pub mod packet;
pub mod parse;
pub mod selector;

pub use config::HostConfig;
pub use element::{Element, ElementFactory, ElementRegistry};
pub use error::{Result, SwitchError, CONTROL_VALUE_MESSAGE};
pub use handler::{HandlerRegistry, ReadHandler, WriteHandler};
pub use host::{Command, CountingSink, SwitchHost, SyntheticPacket};
pub use packet::{Discard, Fanout, PacketSink};
pub use selector::{OutputSelector, INVALID_OUTPUT, SWITCH_HANDLER};
