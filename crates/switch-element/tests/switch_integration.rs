//! Integration tests for the Switch element driven through its host seams.
//!
//! These tests only use the public API: the element registry, the handler
//! registry, and a fan-out of mock destinations.

use pretty_assertions::assert_eq;
use sonic_switch_element::{
    Element, ElementRegistry, Fanout, HandlerRegistry, PacketSink, SwitchError, INVALID_OUTPUT,
    SWITCH_HANDLER,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Packet with an owned payload, so deliveries can be checked for identity.
#[derive(Debug)]
struct MockPacket {
    id: u64,
    payload: Box<[u8; 64]>,
}

impl MockPacket {
    fn new(id: u64) -> Self {
        Self {
            id,
            payload: Box::new([0u8; 64]),
        }
    }

    fn payload_addr(&self) -> usize {
        self.payload.as_ptr() as usize
    }
}

/// Mock destination that records packets it receives.
#[derive(Default)]
struct MockDestination {
    received: Mutex<Vec<MockPacket>>,
    count: AtomicU64,
}

impl MockDestination {
    fn ids(&self) -> Vec<u64> {
        self.received.lock().unwrap().iter().map(|p| p.id).collect()
    }

    fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl PacketSink<MockPacket> for MockDestination {
    fn push(&self, packet: MockPacket) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.received.lock().unwrap().push(packet);
    }
}

/// Mock discard sink that only counts.
#[derive(Default)]
struct MockDiscard {
    count: AtomicU64,
}

impl PacketSink<MockPacket> for MockDiscard {
    fn push(&self, packet: MockPacket) {
        self.count.fetch_add(1, Ordering::Relaxed);
        drop(packet);
    }
}

struct Stage {
    element: Arc<dyn Element<MockPacket>>,
    fanout: Fanout<MockPacket>,
    destinations: Vec<Arc<MockDestination>>,
    discard: Arc<MockDiscard>,
    handlers: HandlerRegistry,
}

impl Stage {
    fn start(outputs: usize, conf: &[&str]) -> Result<Self, SwitchError> {
        let registry = ElementRegistry::with_standard_elements();
        let element = registry.instantiate("Switch")?;

        let discard = Arc::new(MockDiscard::default());
        let mut fanout: Fanout<MockPacket> = Fanout::with_discard(discard.clone());
        let destinations: Vec<Arc<MockDestination>> = (0..outputs)
            .map(|_| Arc::new(MockDestination::default()))
            .collect();
        for destination in &destinations {
            fanout.connect(destination.clone());
        }

        element.notify_noutputs(outputs);
        let conf: Vec<String> = conf.iter().map(|s| s.to_string()).collect();
        element.configure(&conf)?;

        let mut handlers = HandlerRegistry::new();
        Arc::clone(&element).add_handlers(&mut handlers);

        Ok(Self {
            element,
            fanout,
            destinations,
            discard,
            handlers,
        })
    }

    fn push(&self, id: u64) {
        self.element.push(0, MockPacket::new(id), &self.fanout);
    }

    fn read(&self) -> String {
        self.handlers.read(SWITCH_HANDLER).unwrap()
    }

    fn dropped(&self) -> u64 {
        self.discard.count.load(Ordering::Relaxed)
    }
}

#[test]
fn test_scenario_invalid_then_select_then_invalid() {
    let stage = Stage::start(3, &["5"]).unwrap();
    assert_eq!(stage.read(), format!("{}\n", INVALID_OUTPUT));

    for id in 0..4 {
        stage.push(id);
    }
    assert_eq!(stage.dropped(), 4);
    assert!(stage.destinations.iter().all(|d| d.count() == 0));

    stage.handlers.write(SWITCH_HANDLER, "1").unwrap();
    assert_eq!(stage.read(), "1\n");
    stage.push(10);
    stage.push(11);
    assert_eq!(stage.destinations[1].ids(), vec![10, 11]);
    assert_eq!(stage.destinations[0].count(), 0);
    assert_eq!(stage.destinations[2].count(), 0);

    stage.handlers.write(SWITCH_HANDLER, " 7 ").unwrap();
    assert_eq!(stage.read(), "-1\n");
    stage.push(12);
    assert_eq!(stage.dropped(), 5);
    assert_eq!(stage.destinations[1].count(), 2);
}

#[test]
fn test_packet_is_moved_not_copied() {
    let stage = Stage::start(2, &["0"]).unwrap();
    let packet = MockPacket::new(1);
    let addr = packet.payload_addr();

    stage.element.push(0, packet, &stage.fanout);

    let received = stage.destinations[0].received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].payload_addr(), addr);
}

#[test]
fn test_input_port_is_ignored() {
    let stage = Stage::start(2, &["1"]).unwrap();
    for port in 0..4 {
        stage.element.push(port, MockPacket::new(port as u64), &stage.fanout);
    }
    assert_eq!(stage.destinations[1].ids(), vec![0, 1, 2, 3]);
}

#[test]
fn test_bad_configuration_is_fatal_and_names_argument() {
    let err = Stage::start(3, &["one"]).err().unwrap();
    assert!(err.is_fatal_to_startup());
    assert!(err.to_string().contains("'one'"));
}

#[test]
fn test_bad_control_write_keeps_state() {
    let stage = Stage::start(4, &["2"]).unwrap();
    let err = stage.handlers.write(SWITCH_HANDLER, "abc").unwrap_err();
    assert_eq!(err.to_string(), "Switch output must be integer");
    assert_eq!(stage.read(), "2\n");
    assert_eq!(stage.element.configuration(), "2");
}

#[test]
fn test_control_write_updates_configuration_string() {
    let stage = Stage::start(4, &[]).unwrap();
    assert_eq!(stage.element.configuration(), "");
    stage
        .handlers
        .write(SWITCH_HANDLER, "3 // last output")
        .unwrap();
    assert_eq!(stage.element.configuration(), "3");
}

#[test]
fn test_clone_does_not_inherit_live_selection() {
    let stage = Stage::start(3, &["2"]).unwrap();
    stage.handlers.write(SWITCH_HANDLER, "1").unwrap();

    let clone = stage.element.clone_element();
    clone.notify_noutputs(3);
    clone.configure(&[]).unwrap();
    let mut handlers = HandlerRegistry::new();
    clone.add_handlers(&mut handlers);

    assert_eq!(handlers.read(SWITCH_HANDLER).unwrap(), "0\n");
    assert_eq!(stage.read(), "1\n");
}

#[test]
fn test_concurrent_control_writes_and_forwarding() {
    const OUTPUTS: usize = 4;
    const PACKETS: u64 = 50_000;
    let stage = Arc::new(Stage::start(OUTPUTS, &["0"]).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let forwarder = {
        let stage = Arc::clone(&stage);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for id in 0..PACKETS {
                stage.push(id);
            }
            done.store(true, Ordering::Release);
        })
    };

    let reader = {
        let stage = Arc::clone(&stage);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                let text = stage.read();
                let value: i32 = text.trim_end().parse().unwrap();
                assert!(value == INVALID_OUTPUT || (0..OUTPUTS as i32).contains(&value));
            }
        })
    };

    let mut round = 0i32;
    while !done.load(Ordering::Acquire) {
        let value = round % 6 - 1;
        stage
            .handlers
            .write(SWITCH_HANDLER, &value.to_string())
            .unwrap();
        round = round.wrapping_add(1);
    }

    forwarder.join().unwrap();
    reader.join().unwrap();

    let delivered: u64 = stage.destinations.iter().map(|d| d.count()).sum();
    assert_eq!(delivered + stage.dropped(), PACKETS);
}
