use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::os::unix::io::RawFd;

use seq::{Address, RawAddr, RawConnection, SeqError, SeqEvent, SequencerApi, CAN_RECV, CAN_SEND, CLIENT_SYSTEM};

struct FakePort {
    caps: u32,
    types: u32,
    client_name: String,
    port_long_name: String,
}

/// An in-memory double for [`SequencerApi`], driven entirely by explicit
/// calls from test code rather than a real kernel.
///
/// Unlike the live ALSA backend, [`FakeSequencer::connect`]/[`disconnect`]
/// immediately enqueue the corresponding `PORT_SUBSCRIBED`/
/// `PORT_UNSUBSCRIBED` announcement, mirroring how the kernel echoes the
/// daemon's own actions back through the announce port. Tests that want to
/// simulate a connection the daemon did *not* initiate should call
/// [`FakeSequencer::simulate_subscribe`]/[`simulate_unsubscribe`] instead,
/// which skip the `expectedConnects`/`expectedDisconnects` bookkeeping the
/// daemon would otherwise perform.
#[derive(Default)]
pub struct FakeSequencer {
    clients: BTreeMap<i32, String>,
    ports: BTreeMap<(i32, i32), FakePort>,
    connections: BTreeSet<((i32, i32), (i32, i32))>,
    events: VecDeque<SeqEvent>,
}

impl FakeSequencer {
    /// A fresh, empty fake with no clients or ports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client name without emitting any event.
    pub fn add_client(&mut self, client_id: i32, name: &str) {
        self.clients.insert(client_id, name.to_string());
    }

    /// Adds a port and enqueues a `PORT_START` event for it, as the kernel
    /// would on creation.
    pub fn add_port(&mut self, client_id: i32, port_id: i32, caps: u32, types: u32, client_name: &str, port_long_name: &str) {
        self.clients.entry(client_id).or_insert_with(|| client_name.to_string());
        self.ports.insert(
            (client_id, port_id),
            FakePort {
                caps,
                types,
                client_name: client_name.to_string(),
                port_long_name: port_long_name.to_string(),
            },
        );
        self.events.push_back(SeqEvent::PortStart(RawAddr {
            client: client_id,
            port: port_id,
        }));
    }

    /// Removes a port and enqueues a `PORT_EXIT` event for it.
    pub fn remove_port(&mut self, client_id: i32, port_id: i32) {
        self.ports.remove(&(client_id, port_id));
        self.events.push_back(SeqEvent::PortExit(RawAddr {
            client: client_id,
            port: port_id,
        }));
    }

    /// Enqueues a `PORT_SUBSCRIBED` event without the fake's own `connect`
    /// bookkeeping — simulates a subscription made by some other client.
    pub fn simulate_subscribe(&mut self, sender: RawAddr, dest: RawAddr) {
        self.connections.insert((key(sender), key(dest)));
        self.events.push_back(SeqEvent::PortSubscribed(RawConnection { sender, dest }));
    }

    /// Enqueues a `PORT_UNSUBSCRIBED` event without the fake's own
    /// `disconnect` bookkeeping.
    pub fn simulate_unsubscribe(&mut self, sender: RawAddr, dest: RawAddr) {
        self.connections.remove(&(key(sender), key(dest)));
        self.events.push_back(SeqEvent::PortUnsubscribed(RawConnection { sender, dest }));
    }

    /// Whether `(sender, dest)` is currently an active connection in the
    /// fake's graph.
    pub fn is_connected(&self, sender: RawAddr, dest: RawAddr) -> bool {
        self.connections.contains(&(key(sender), key(dest)))
    }
}

const fn key(addr: RawAddr) -> (i32, i32) {
    (addr.client, addr.port)
}

impl SequencerApi for FakeSequencer {
    fn begin(&mut self) -> Result<(), SeqError> {
        Ok(())
    }

    fn end(&mut self) {}

    fn client_name(&mut self, client: i32) -> String {
        self.clients.get(&client).cloned().unwrap_or_default()
    }

    fn client_details(&mut self, client: i32) -> String {
        self.clients
            .get(&client)
            .map_or_else(|| "???".to_string(), |name| format!("fake client: {name}"))
    }

    fn address(&mut self, addr: RawAddr) -> Option<Address> {
        let port = self.ports.get(&(addr.client, addr.port))?;
        if port.caps & (CAN_SEND | CAN_RECV) == 0 {
            return None;
        }
        Some(Address::new(
            addr.client,
            addr.port,
            port.caps,
            port.types,
            port.client_name.clone(),
            port.port_long_name.clone(),
        ))
    }

    fn scan_clients(&mut self) -> Vec<i32> {
        self.clients.keys().filter(|&&id| id != CLIENT_SYSTEM).copied().collect()
    }

    fn scan_ports(&mut self) -> Vec<RawAddr> {
        self.ports.keys().map(|&(client, port)| RawAddr { client, port }).collect()
    }

    fn scan_connections(&mut self) -> Vec<RawConnection> {
        self.connections
            .iter()
            .map(|&((sc, sp), (dc, dp))| RawConnection {
                sender: RawAddr { client: sc, port: sp },
                dest: RawAddr { client: dc, port: dp },
            })
            .collect()
    }

    fn event_input(&mut self) -> Option<SeqEvent> {
        self.events.pop_front()
    }

    fn connect(&mut self, sender: RawAddr, dest: RawAddr) {
        self.connections.insert((key(sender), key(dest)));
        self.events.push_back(SeqEvent::PortSubscribed(RawConnection { sender, dest }));
    }

    fn disconnect(&mut self, conn: RawConnection) {
        self.connections.remove(&(key(conn.sender), key(conn.dest)));
        self.events.push_back(SeqEvent::PortUnsubscribed(conn));
    }

    fn scan_fds(&self) -> Vec<RawFd> {
        Vec::new()
    }
}
