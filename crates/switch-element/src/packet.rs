//! Destination capability and the fan-out set a stage pushes into.
//!
//! The host owns the downstream stages. A switch element only needs an
//! index-addressable collection of things that accept a packet, plus a
//! discard sink for packets that have nowhere to go.

use std::fmt;
use std::sync::Arc;

/// A downstream stage that takes ownership of pushed packets.
pub trait PacketSink<P>: Send + Sync {
    /// Accepts `packet`; ownership transfers to the sink.
    fn push(&self, packet: P);
}

/// Discard sink that destroys packets immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl<P> PacketSink<P> for Discard {
    fn push(&self, packet: P) {
        drop(packet);
    }
}

/// Output ports of one pipeline stage.
///
/// Destinations are indexed `0..len()`; the discard sink receives packets
/// that are not forwarded to any destination.
pub struct Fanout<P> {
    destinations: Vec<Arc<dyn PacketSink<P>>>,
    discard: Arc<dyn PacketSink<P>>,
}

impl<P: 'static> Fanout<P> {
    /// Creates an empty fan-out that destroys discarded packets.
    pub fn new() -> Self {
        Self::with_discard(Arc::new(Discard))
    }
}

impl<P: 'static> Default for Fanout<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Fanout<P> {
    /// Creates an empty fan-out with a host-provided discard sink.
    pub fn with_discard(discard: Arc<dyn PacketSink<P>>) -> Self {
        Self {
            destinations: Vec::new(),
            discard,
        }
    }

    /// Appends a destination and returns its port index.
    pub fn connect(&mut self, destination: Arc<dyn PacketSink<P>>) -> usize {
        self.destinations.push(destination);
        self.destinations.len() - 1
    }

    /// Returns the number of connected destinations.
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Returns true if no destination is connected.
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Returns the destination at `port`, if connected.
    pub fn destination(&self, port: usize) -> Option<&dyn PacketSink<P>> {
        self.destinations.get(port).map(|d| d.as_ref())
    }

    /// Returns the discard sink.
    pub fn discard(&self) -> &dyn PacketSink<P> {
        self.discard.as_ref()
    }

    /// Pushes `packet` to destination `port`, or to the discard sink when
    /// `port` is not connected.
    #[inline]
    pub fn push_or_discard(&self, port: usize, packet: P) {
        match self.destinations.get(port) {
            Some(destination) => destination.push(packet),
            None => self.discard.push(packet),
        }
    }
}

impl<P> fmt::Debug for Fanout<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fanout")
            .field("destinations", &self.destinations.len())
            .finish_non_exhaustive()
    }
}
