use rule::MatchAddress;
use seq::{RawAddr, SequencerApi};

use crate::state::{raw_key, Core};

impl<S: SequencerApi> Core<S> {
    /// Idempotently admits a newly-seen port: resolves it, records its
    /// primary-port flags (via [`seq::PortMap::insert`]), runs the rule
    /// engine against the profile then observed rule lists, and connects
    /// every resulting candidate not already active.
    ///
    /// `from_reset` only affects the log record — the algorithm is the
    /// same whether the port arrived via a kernel event or a reset-time
    /// enumeration.
    pub fn add_port(&mut self, raw: RawAddr, from_reset: bool) {
        if self.active_ports.contains(raw_key(raw)) {
            return;
        }
        let Some(addr) = self.seq.address(raw) else {
            return;
        };
        tracing::debug!(client = raw.client, port = raw.port, name = %addr, from_reset, "port added");
        self.active_ports.insert(addr);

        let arrival = self.active_ports.get(raw_key(raw)).expect("just inserted");
        let ports: Vec<&dyn MatchAddress> = self.active_ports.iter().map(|p| p as &dyn MatchAddress).collect();
        let candidates = engine::run(arrival, &ports, &self.profile_rules, &self.observed_rules);

        let to_connect: Vec<_> = candidates
            .iter()
            .filter(|c| !self.active_connections.contains(&c.key()))
            .map(|c| (c.key(), c.provenance))
            .collect();

        for ((sender, dest), provenance) in to_connect {
            tracing::info!(?provenance, ?sender, ?dest, "connecting");
            self.seq.connect(
                RawAddr {
                    client: sender.0,
                    port: sender.1,
                },
                RawAddr {
                    client: dest.0,
                    port: dest.1,
                },
            );
            self.expected_connects.insert((sender, dest));
            self.active_connections.insert((sender, dest));
        }
    }

    /// Drops a port that disappeared: removes every active connection
    /// touching it, then the port itself. Connections are dropped without
    /// calling `disconnect` — the kernel already reports the teardown via
    /// its own `UNSUBSCRIBED` events.
    pub fn del_port(&mut self, raw: RawAddr) {
        let key = raw_key(raw);
        if self.active_ports.get(key).is_none() {
            return;
        }
        self.active_connections.retain(|&(sender, dest)| sender != key && dest != key);
        self.active_ports.remove(key);
    }
}
