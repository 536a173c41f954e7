//! The real kernel backend, built on the `alsa` crate's `snd_seq` bindings.
//!
//! Behind the `live` feature so that the daemon core, the engine, and the
//! `check`/`status`/`reset` CLI paths can all be exercised without a kernel
//! sequencer device present, per the `SequencerApi` seam.

use std::ffi::CString;
use std::os::unix::io::RawFd;

use alsa::seq::{Addr, Connect, EventType, PortCap, PortInfo, PortSubscribe, PortType, Seq};

use crate::address::{Address, CLIENT_SYSTEM};
use crate::api::{SeqError, SequencerApi};
use crate::event::{RawAddr, RawConnection, SeqEvent};

const CLIENT_NAME: &str = "minderd";
const EVENT_PORT_NAME: &str = "panopticon";

/// The ALSA-backed [`SequencerApi`] implementation used by `bin/minderd`.
pub struct LiveSequencer {
    handle: Option<Seq>,
    event_port: i32,
}

impl Default for LiveSequencer {
    fn default() -> Self {
        Self {
            handle: None,
            event_port: -1,
        }
    }
}

impl LiveSequencer {
    /// A gateway with no open handle yet; call [`SequencerApi::begin`]
    /// before using it.
    pub fn new() -> Self {
        Self::default()
    }

    fn seq(&self) -> Option<&Seq> {
        self.handle.as_ref()
    }

    fn raw_addr(addr: Addr) -> RawAddr {
        RawAddr::new(i32::from(addr.client), i32::from(addr.port))
    }

    fn alsa_addr(addr: RawAddr) -> Addr {
        Addr {
            client: addr.client as u8,
            port: addr.port as u8,
        }
    }
}

impl SequencerApi for LiveSequencer {
    fn begin(&mut self) -> Result<(), SeqError> {
        if self.handle.is_some() {
            return Ok(());
        }

        let seq = Seq::open(None, Some(alsa::Direction::Capture), true).map_err(|_| {
            SeqError::Kernel {
                code: -1,
                operation: "open sequencer",
            }
        })?;

        let name = CString::new(CLIENT_NAME).expect("no interior NUL");
        seq.set_client_name(&name).map_err(|_| SeqError::Kernel {
            code: -1,
            operation: "name sequencer",
        })?;

        let port_name = CString::new(EVENT_PORT_NAME).expect("no interior NUL");
        let event_port = seq
            .create_simple_port(
                &port_name,
                PortCap::WRITE | PortCap::NO_EXPORT,
                PortType::APPLICATION,
            )
            .map_err(|_| SeqError::Kernel {
                code: -1,
                operation: "create event port",
            })?;

        let system_announce = Addr {
            client: 0,
            port: 1,
        };
        let my_addr = Addr {
            client: seq.client_id().unwrap_or(0) as u8,
            port: event_port as u8,
        };
        let subs = PortSubscribe::empty().map_err(|_| SeqError::Kernel {
            code: -1,
            operation: "allocate subscription",
        })?;
        subs.set_sender(system_announce);
        subs.set_dest(my_addr);
        seq.subscribe_port(&subs).map_err(|_| SeqError::Kernel {
            code: -1,
            operation: "connect to system announce port",
        })?;

        self.event_port = event_port;
        self.handle = Some(seq);
        Ok(())
    }

    fn end(&mut self) {
        self.handle = None;
    }

    fn client_name(&mut self, client: i32) -> String {
        if client == CLIENT_SYSTEM {
            return String::new();
        }
        let Some(seq) = self.seq() else {
            return String::new();
        };
        match seq.get_any_client_info(client) {
            Ok(info) => info.get_name().unwrap_or("").to_string(),
            Err(_) => String::new(),
        }
    }

    fn client_details(&mut self, client: i32) -> String {
        let Some(seq) = self.seq() else {
            return "???".to_string();
        };
        match seq.get_any_client_info(client) {
            Ok(info) => format!("{:?}(pid={})", info.get_type(), client),
            Err(_) => "???".to_string(),
        }
    }

    fn address(&mut self, addr: RawAddr) -> Option<Address> {
        if addr.client == CLIENT_SYSTEM {
            return None;
        }
        let seq = self.seq()?;

        let client = seq.get_any_client_info(addr.client).ok()?;
        let port = seq
            .get_any_port_info(Self::alsa_addr(addr))
            .ok()?;

        let caps = port.get_capability().bits();
        if caps & crate::address::NO_EXPORT != 0 {
            return None;
        }
        if caps & (crate::address::CAP_SUBS_READ | crate::address::CAP_SUBS_WRITE) == 0 {
            return None;
        }

        let types = port.get_type().bits();
        let client_name = client.get_name().unwrap_or("").to_string();
        let port_name = port.get_name().unwrap_or("").to_string();

        Some(Address::new(
            addr.client,
            addr.port,
            caps,
            types,
            client_name,
            port_name,
        ))
    }

    fn scan_clients(&mut self) -> Vec<i32> {
        let Some(seq) = self.seq() else {
            return Vec::new();
        };
        seq.client_iter()
            .filter_map(|c| {
                let id = c.get_client();
                (id != CLIENT_SYSTEM).then_some(id)
            })
            .collect()
    }

    fn scan_ports(&mut self) -> Vec<RawAddr> {
        let clients = self.scan_clients();
        let Some(seq) = self.seq() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for client in clients {
            for port in PortInfo::iter_from_client(seq, client) {
                out.push(Self::raw_addr(port.addr()));
            }
        }
        out
    }

    fn scan_connections(&mut self) -> Vec<RawConnection> {
        let ports = self.scan_ports();
        let Some(seq) = self.seq() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for port in ports {
            let root = Self::alsa_addr(port);
            for subscriber in seq.query_subs(root, alsa::seq::QuerySubsType::READ) {
                out.push(RawConnection::new(port, Self::raw_addr(subscriber)));
            }
        }
        out
    }

    fn event_input(&mut self) -> Option<SeqEvent> {
        let seq = self.handle.as_ref()?;
        if seq.event_input_pending(true).unwrap_or(0) == 0 {
            return None;
        }
        let mut input = seq.input();
        let ev = input.event_input().ok()?;
        match ev.get_type() {
            EventType::ClientStart => ev.get_data::<Addr>().map(|a| SeqEvent::ClientStart(i32::from(a.client))),
            EventType::ClientExit => ev.get_data::<Addr>().map(|a| SeqEvent::ClientExit(i32::from(a.client))),
            EventType::ClientChange => ev.get_data::<Addr>().map(|a| SeqEvent::ClientChange(i32::from(a.client))),
            EventType::PortStart => ev.get_data::<Addr>().map(|a| SeqEvent::PortStart(Self::raw_addr(a))),
            EventType::PortExit => ev.get_data::<Addr>().map(|a| SeqEvent::PortExit(Self::raw_addr(a))),
            EventType::PortChange => ev.get_data::<Addr>().map(|a| SeqEvent::PortChange(Self::raw_addr(a))),
            EventType::PortSubscribed => ev.get_data::<Connect>().map(|c| {
                SeqEvent::PortSubscribed(RawConnection::new(
                    Self::raw_addr(c.sender),
                    Self::raw_addr(c.dest),
                ))
            }),
            EventType::PortUnsubscribed => ev.get_data::<Connect>().map(|c| {
                SeqEvent::PortUnsubscribed(RawConnection::new(
                    Self::raw_addr(c.sender),
                    Self::raw_addr(c.dest),
                ))
            }),
            _ => None,
        }
    }

    fn connect(&mut self, sender: RawAddr, dest: RawAddr) {
        let Some(seq) = self.seq() else { return };
        let Ok(subs) = PortSubscribe::empty() else {
            return;
        };
        subs.set_sender(Self::alsa_addr(sender));
        subs.set_dest(Self::alsa_addr(dest));
        subs.set_queue(0);
        subs.set_exclusive(false);
        subs.set_time_update(false);
        subs.set_time_real(false);
        if let Err(e) = seq.subscribe_port(&subs) {
            if e.errno() != libc::EBUSY {
                tracing::warn!(code = e.errno(), "subscribe failed");
            }
        }
    }

    fn disconnect(&mut self, conn: RawConnection) {
        let Some(seq) = self.seq() else { return };
        let sender = Self::alsa_addr(conn.sender);
        let dest = Self::alsa_addr(conn.dest);
        if let Err(e) = seq.unsubscribe_port(sender, dest) {
            if e.errno() != libc::ENOENT {
                tracing::warn!(code = e.errno(), "unsubscribe failed");
            }
        }
    }

    fn scan_fds(&self) -> Vec<RawFd> {
        let Some(seq) = self.seq() else {
            return Vec::new();
        };
        seq.get()
            .map(|pollfds: Vec<libc::pollfd>| pollfds.into_iter().map(|p| p.fd).collect())
            .unwrap_or_default()
    }
}
