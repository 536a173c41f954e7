use std::collections::BTreeSet;

use rule::{ConnectionRule, MatchAddress};
use seq::{PortMap, RawAddr, RawConnection, SequencerApi};
use store::Paths;

use crate::error::DaemonError;

pub(crate) type PortKey = (i32, i32);
pub(crate) type ConnectionKey = (PortKey, PortKey);

pub(crate) const fn raw_key(addr: RawAddr) -> PortKey {
    (addr.client, addr.port)
}

pub(crate) const fn conn_key(conn: RawConnection) -> ConnectionKey {
    (raw_key(conn.sender), raw_key(conn.dest))
}

pub(crate) fn rules_to_text(rules: &[ConnectionRule]) -> String {
    let mut text = String::new();
    for rule in rules {
        text.push_str(&rule.to_string());
        text.push('\n');
    }
    text
}

fn parse_rules_or_fail(text: &str, path: &std::path::Path) -> Result<Vec<ConnectionRule>, DaemonError> {
    let outcome = rule::parse_rules(text);
    if outcome.is_ok() {
        Ok(outcome.rules)
    } else {
        Err(DaemonError::RuleFile {
            path: path.to_path_buf(),
            errors: outcome.errors,
        })
    }
}

/// The supervisor's in-memory state: the two rule lists, the live port
/// map, the active connection set, and the expected-event filters that
/// keep the daemon from reacting to its own actions.
///
/// Generic over [`SequencerApi`] so tests drive it against
/// `test_support::FakeSequencer` instead of a live ALSA handle.
pub struct Core<S: SequencerApi> {
    pub(crate) seq: S,
    pub(crate) paths: Paths,
    pub(crate) profile_rules: Vec<ConnectionRule>,
    pub(crate) observed_rules: Vec<ConnectionRule>,
    pub(crate) active_ports: PortMap,
    pub(crate) active_connections: BTreeSet<ConnectionKey>,
    pub(crate) expected_connects: BTreeSet<ConnectionKey>,
    pub(crate) expected_disconnects: BTreeSet<ConnectionKey>,
}

impl<S: SequencerApi> Core<S> {
    /// Opens the sequencer, loads both rule files (a missing file is
    /// empty, not an error; a malformed file aborts startup), and performs
    /// a hard reset to bring `activePorts`/`activeConnections` in sync
    /// with whatever the kernel already reports.
    pub fn start(mut seq: S, paths: Paths) -> Result<Self, DaemonError> {
        seq.begin()?;

        let profile_text = store::read_file_or_empty(&paths.profile_path())?;
        let observed_text = store::read_file_or_empty(&paths.observed_path())?;
        let profile_rules = parse_rules_or_fail(&profile_text, &paths.profile_path())?;
        let observed_rules = parse_rules_or_fail(&observed_text, &paths.observed_path())?;

        let mut core = Self {
            seq,
            paths,
            profile_rules,
            observed_rules,
            active_ports: PortMap::new(),
            active_connections: BTreeSet::new(),
            expected_connects: BTreeSet::new(),
            expected_disconnects: BTreeSet::new(),
        };
        core.hard_reset();
        Ok(core)
    }

    /// Number of currently known ports, for `status`.
    pub fn active_port_count(&self) -> usize {
        self.active_ports.len()
    }

    /// Number of currently active connections, for `status`.
    pub fn active_connection_count(&self) -> usize {
        self.active_connections.len()
    }

    /// Current profile rule list, for `status`/`save`.
    pub fn profile_rules(&self) -> &[ConnectionRule] {
        &self.profile_rules
    }

    /// Current observed rule list, for `status`/`save`.
    pub fn observed_rules(&self) -> &[ConnectionRule] {
        &self.observed_rules
    }

    /// File descriptors the event loop must poll: the sequencer's, in
    /// that order. The control socket's listener fd is added by the
    /// caller, which owns the [`ipc::Server`].
    pub fn sequencer_fds(&self) -> Vec<std::os::unix::io::RawFd> {
        self.seq.scan_fds()
    }

    pub(crate) fn save_observed(&mut self) {
        let text = rules_to_text(&self.observed_rules);
        if let Err(err) = store::write_file(&self.paths.observed_path(), &text) {
            tracing::error!(%err, "failed to persist observed rules");
        }
    }

    /// Clears all in-memory graph state and rebuilds it from a full
    /// kernel enumeration: disconnects every subscription between two
    /// resolvable ports, then re-adds every port in ascending order,
    /// re-running the rule engine for each.
    pub fn hard_reset(&mut self) {
        tracing::info!("performing hard reset");
        self.active_connections.clear();

        for conn in self.seq.scan_connections() {
            let sender_known = self.seq.address(conn.sender).is_some();
            let dest_known = self.seq.address(conn.dest).is_some();
            if sender_known && dest_known {
                self.expected_disconnects.insert(conn_key(conn));
                self.seq.disconnect(conn);
            }
        }

        self.active_ports.clear();
        for raw in self.seq.scan_ports() {
            self.add_port(raw, true);
        }
    }

    /// Disconnects every active connection, clears the port map, then
    /// re-adds each remembered port (re-resolving it and re-running the
    /// engine), without touching the rule lists.
    pub fn soft_reset(&mut self) {
        tracing::info!("performing soft reset");
        let active: Vec<ConnectionKey> = self.active_connections.iter().copied().collect();
        for (sender, dest) in active {
            self.expected_disconnects.insert((sender, dest));
            self.seq.disconnect(RawConnection {
                sender: RawAddr {
                    client: sender.0,
                    port: sender.1,
                },
                dest: RawAddr {
                    client: dest.0,
                    port: dest.1,
                },
            });
        }
        self.active_connections.clear();

        let remembered: Vec<RawAddr> = self
            .active_ports
            .iter()
            .map(|addr| RawAddr {
                client: addr.key().0,
                port: addr.key().1,
            })
            .collect();
        self.active_ports.clear();
        for raw in remembered {
            self.add_port(raw, false);
        }
    }
}
