//! OutputSelector - the `Switch` element.
//!
//! Forwards every packet to exactly one output, chosen by an index that can
//! be set at configuration time and changed at run time through the
//! `switch` control handler. An index outside `[0, noutputs)` is stored as
//! [`INVALID_OUTPUT`] and every packet is then discarded.
//!
//! The index lives in a single `AtomicI32`. `forward()` does one atomic load
//! and never locks, allocates, or logs, so a concurrent control write is
//! observed either entirely or not at all.

use crate::element::Element;
use crate::error::{Result, SwitchError};
use crate::handler::HandlerRegistry;
use crate::packet::Fanout;
use crate::parse::{parse_control_integer, parse_integer, uncomment};
use log::debug;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

/// Sentinel index meaning "no output selected, drop input".
pub const INVALID_OUTPUT: i32 = -1;

/// Name of the read and write control handlers.
pub const SWITCH_HANDLER: &str = "switch";

/// Dispatch state for one `Switch` stage.
pub struct OutputSelector {
    output: AtomicI32,
    noutputs: AtomicUsize,
    notified: AtomicBool,
    /// Live configuration string. Also serializes control-path updates.
    configuration: Mutex<String>,
}

impl OutputSelector {
    /// Element class name.
    pub const CLASS_NAME: &'static str = "Switch";

    /// Creates a selector with output 0 selected and no outputs known.
    pub fn new() -> Self {
        Self {
            output: AtomicI32::new(0),
            noutputs: AtomicUsize::new(0),
            notified: AtomicBool::new(false),
            configuration: Mutex::new(String::new()),
        }
    }

    /// Records the fan-out degree.
    ///
    /// The first notification only records `n`. A later notification with a
    /// smaller value re-validates the current selection.
    pub fn notify_destination_count(&self, n: usize) {
        let previous = self.noutputs.swap(n, Ordering::AcqRel);
        let renotified = self.notified.swap(true, Ordering::AcqRel);
        if renotified && n < previous {
            let _guard = self.configuration.lock();
            let current = self.output.load(Ordering::Acquire);
            let stored = self.store_selection(current);
            if stored != current {
                debug!(
                    "Switch outputs shrank from {} to {}, output {} now invalid",
                    previous, n, current
                );
            }
        }
    }

    /// Returns the recorded fan-out degree.
    pub fn destination_count(&self) -> usize {
        self.noutputs.load(Ordering::Acquire)
    }

    /// Returns the raw selected index, [`INVALID_OUTPUT`] when none.
    pub fn selected_index(&self) -> i32 {
        self.output.load(Ordering::Acquire)
    }

    /// Returns the selected output port, or `None` when packets are dropped.
    pub fn selected(&self) -> Option<usize> {
        usize::try_from(self.selected_index()).ok()
    }

    /// Parses the configuration argument vector `[<integer>]`.
    ///
    /// Empty arguments are ignored. An out-of-range index is stored as
    /// [`INVALID_OUTPUT`]; it is not an error. State is untouched on error.
    pub fn configure(&self, conf: &[String]) -> Result<()> {
        let args: Vec<(&String, String)> = conf
            .iter()
            .map(|raw| (raw, uncomment(raw)))
            .filter(|(_, cleaned)| !cleaned.is_empty())
            .collect();

        let requested = match args.as_slice() {
            [] => 0,
            [(raw, cleaned)] => parse_integer(cleaned).ok_or_else(|| {
                SwitchError::config_parse(raw.as_str(), "integer (active output)")
            })?,
            _ => {
                return Err(SwitchError::TooManyArguments {
                    max: 1,
                    got: args.len(),
                })
            }
        };

        let mut configuration = self.configuration.lock();
        let stored = self.store_selection(requested);
        *configuration = conf.join(", ");
        debug!(
            "Switch configured with output {} (requested {}, {} outputs)",
            stored,
            requested,
            self.destination_count()
        );
        Ok(())
    }

    /// Forwards `packet` to the selected output, or discards it.
    ///
    /// The input port is ignored; the element has one logical input.
    #[inline]
    pub fn forward<P>(&self, _input: usize, packet: P, fanout: &Fanout<P>) {
        match usize::try_from(self.output.load(Ordering::Acquire)) {
            Ok(port) => fanout.push_or_discard(port, packet),
            Err(_) => fanout.discard().push(packet),
        }
    }

    /// Returns the selected index as decimal text with a trailing newline.
    pub fn read_selection(&self) -> String {
        format!("{}\n", self.selected_index())
    }

    /// Sets the selected index from operator text.
    ///
    /// Comments and surrounding whitespace are stripped first. A value that
    /// is not an integer fails with [`SwitchError::ControlValue`] and leaves
    /// the selection unchanged. On success the configuration string becomes
    /// the decimal stored index.
    pub fn write_selection(&self, text: &str) -> Result<()> {
        let requested = parse_control_integer(text).map_err(SwitchError::control_value)?;

        let mut configuration = self.configuration.lock();
        let stored = self.store_selection(requested);
        *configuration = stored.to_string();
        debug!("Switch output set to {} (requested {})", stored, requested);
        Ok(())
    }

    /// Returns the externally visible configuration string.
    pub fn configuration(&self) -> String {
        self.configuration.lock().clone()
    }

    /// Normalizes `requested` against the fan-out degree and stores it.
    ///
    /// Callers hold the configuration lock.
    fn store_selection(&self, requested: i32) -> i32 {
        let valid = usize::try_from(requested)
            .map(|port| port < self.destination_count())
            .unwrap_or(false);
        let stored = if valid { requested } else { INVALID_OUTPUT };
        self.output.store(stored, Ordering::Release);
        stored
    }
}

impl Default for OutputSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutputSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSelector")
            .field("output", &self.selected_index())
            .field("noutputs", &self.destination_count())
            .finish()
    }
}

impl<P: Send + 'static> Element<P> for OutputSelector {
    fn class_name(&self) -> &'static str {
        Self::CLASS_NAME
    }

    fn clone_element(&self) -> Arc<dyn Element<P>> {
        Arc::new(OutputSelector::new())
    }

    fn notify_noutputs(&self, n: usize) {
        self.notify_destination_count(n);
    }

    fn configure(&self, conf: &[String]) -> Result<()> {
        OutputSelector::configure(self, conf)
    }

    fn configuration(&self) -> String {
        OutputSelector::configuration(self)
    }

    fn push(&self, port: usize, packet: P, outputs: &Fanout<P>) {
        self.forward(port, packet, outputs);
    }

    fn add_handlers(self: Arc<Self>, registry: &mut HandlerRegistry) {
        let reader = Arc::clone(&self);
        registry.add_read_handler(SWITCH_HANDLER, Arc::new(move || reader.read_selection()));
        let writer = self;
        registry.add_write_handler(
            SWITCH_HANDLER,
            Arc::new(move |value: &str| writer.write_selection(value)),
        );
    }
}
