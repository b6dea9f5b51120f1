//! Minimal single-stage host used by `switchctl`.
//!
//! Wires one element to counting outputs, attaches its handlers, and
//! executes operator commands against it. Scheduling and multi-stage
//! topologies are out of scope.

use crate::config::HostConfig;
use crate::element::{Element, ElementRegistry};
use crate::error::Result;
use crate::handler::HandlerRegistry;
use crate::packet::{Fanout, PacketSink};
use log::{debug, info};
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Packet generated by the harness.
#[derive(Debug, PartialEq, Eq)]
pub struct SyntheticPacket {
    /// Sequence number.
    pub seq: u64,
}

/// Sink that counts and releases packets.
#[derive(Debug, Default)]
pub struct CountingSink {
    count: AtomicU64,
}

impl CountingSink {
    /// Returns the number of packets received.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl<P> PacketSink<P> for CountingSink {
    fn push(&self, packet: P) {
        self.count.fetch_add(1, Ordering::Relaxed);
        drop(packet);
    }
}

/// One operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `read <handler>`
    Read { handler: String },
    /// `write <handler> <value...>`
    Write { handler: String, value: String },
    /// `push [count]`
    Push { count: u64 },
    /// `stats`
    Stats,
    /// `config`
    Config,
    /// `handlers`
    Handlers,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "read" if !rest.is_empty() => Ok(Command::Read {
                handler: rest.to_string(),
            }),
            "write" => {
                let (handler, value) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                if handler.is_empty() {
                    return Err("usage: write <handler> <value>".to_string());
                }
                Ok(Command::Write {
                    handler: handler.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "push" if rest.is_empty() => Ok(Command::Push { count: 1 }),
            "push" => rest
                .parse()
                .map(|count| Command::Push { count })
                .map_err(|_| format!("invalid packet count '{}'", rest)),
            "stats" => Ok(Command::Stats),
            "config" => Ok(Command::Config),
            "handlers" => Ok(Command::Handlers),
            "read" => Err("usage: read <handler>".to_string()),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

/// A single configured stage with counting outputs.
pub struct SwitchHost {
    element: Arc<dyn Element<SyntheticPacket>>,
    fanout: Fanout<SyntheticPacket>,
    outputs: Vec<Arc<CountingSink>>,
    discarded: Arc<CountingSink>,
    handlers: HandlerRegistry,
    next_seq: u64,
}

impl SwitchHost {
    /// Instantiates, wires, and configures the stage described by `config`.
    ///
    /// Configuration errors are returned unchanged so the caller can report
    /// the offending argument; the stage is not usable in that case.
    pub fn start(
        registry: &ElementRegistry<SyntheticPacket>,
        config: &HostConfig,
    ) -> Result<Self> {
        let element = registry.instantiate(&config.element)?;

        let discarded = Arc::new(CountingSink::default());
        let mut fanout: Fanout<SyntheticPacket> = Fanout::with_discard(discarded.clone());
        let mut outputs = Vec::with_capacity(config.outputs);
        for _ in 0..config.outputs {
            let sink = Arc::new(CountingSink::default());
            fanout.connect(sink.clone());
            outputs.push(sink);
        }

        element.notify_noutputs(fanout.len());
        element.configure(&config.arguments)?;

        let mut handlers = HandlerRegistry::new();
        Arc::clone(&element).add_handlers(&mut handlers);

        info!(
            "Started {}({}) with {} outputs",
            element.class_name(),
            element.configuration(),
            fanout.len()
        );

        Ok(Self {
            element,
            fanout,
            outputs,
            discarded,
            handlers,
            next_seq: 0,
        })
    }

    /// Returns the control handler registry.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Returns packets delivered to each output.
    pub fn output_counts(&self) -> Vec<u64> {
        self.outputs.iter().map(|o| o.count()).collect()
    }

    /// Returns packets discarded by the stage.
    pub fn discarded(&self) -> u64 {
        self.discarded.count()
    }

    /// Pushes `count` synthetic packets through the stage.
    pub fn push(&mut self, count: u64) {
        for _ in 0..count {
            let packet = SyntheticPacket { seq: self.next_seq };
            self.next_seq += 1;
            self.element.push(0, packet, &self.fanout);
        }
        debug!("Pushed {} packets", count);
    }

    /// Executes one command and returns its text output.
    pub fn execute(&mut self, command: &Command) -> Result<String> {
        match command {
            Command::Read { handler } => self.handlers.read(handler),
            Command::Write { handler, value } => {
                self.handlers.write(handler, value)?;
                Ok(String::new())
            }
            Command::Push { count } => {
                self.push(*count);
                Ok(String::new())
            }
            Command::Stats => {
                let mut out = String::new();
                for (port, count) in self.output_counts().iter().enumerate() {
                    let _ = writeln!(out, "output {}: {}", port, count);
                }
                let _ = writeln!(out, "discarded: {}", self.discarded());
                Ok(out)
            }
            Command::Config => Ok(format!("{}\n", self.element.configuration())),
            Command::Handlers => {
                let mut out = String::new();
                for name in self.handlers.read_handlers() {
                    let _ = writeln!(out, "{} (read)", name);
                }
                for name in self.handlers.write_handlers() {
                    let _ = writeln!(out, "{} (write)", name);
                }
                Ok(out)
            }
        }
    }
}
