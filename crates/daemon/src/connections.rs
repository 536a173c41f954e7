use rule::ConnectionRule;
use seq::{RawConnection, SequencerApi};

use crate::state::{conn_key, Core};

#[derive(Clone, Copy, Eq, PartialEq)]
enum Lookup {
    None,
    Connect,
    Disallow,
}

/// The index of the rule `find_rule` would return (reverse scan, first
/// match wins), so callers can both classify it and remove exactly that
/// element without a second scan.
fn lookup_index(rules: &[ConnectionRule], sender: &dyn rule::MatchAddress, dest: &dyn rule::MatchAddress) -> Option<usize> {
    rules.iter().rposition(|r| r.matches(sender, dest))
}

fn classify(rules: &[ConnectionRule], idx: Option<usize>) -> Lookup {
    match idx {
        None => Lookup::None,
        Some(i) if rules[i].blocking => Lookup::Disallow,
        Some(_) => Lookup::Connect,
    }
}

impl<S: SequencerApi> Core<S> {
    /// Records an externally-made subscription (one the daemon did not
    /// itself initiate) by updating `observedRules` per the truth table in
    /// the Minder Core's connection design, then persists the observed
    /// file if it changed.
    pub fn add_connection(&mut self, conn: RawConnection) {
        let pair = conn_key(conn);
        if self.active_connections.contains(&pair) {
            return;
        }
        let (Some(sender_addr), Some(dest_addr)) = (self.active_ports.get(pair.0), self.active_ports.get(pair.1)) else {
            return;
        };

        let observed_idx = lookup_index(&self.observed_rules, sender_addr, dest_addr);
        let profile_idx = lookup_index(&self.profile_rules, sender_addr, dest_addr);
        let observed = classify(&self.observed_rules, observed_idx);
        let profile = classify(&self.profile_rules, profile_idx);
        let new_rule = ConnectionRule::exact(sender_addr, dest_addr);

        self.active_connections.insert(pair);

        let changed = match (observed, profile) {
            (Lookup::None, Lookup::Connect) => false,
            (Lookup::None, Lookup::None | Lookup::Disallow) => {
                self.observed_rules.push(new_rule);
                true
            }
            (Lookup::Connect, Lookup::Connect) => {
                self.observed_rules.remove(observed_idx.expect("observed lookup found a rule"));
                true
            }
            (Lookup::Connect, Lookup::None | Lookup::Disallow) => false,
            (Lookup::Disallow, Lookup::None | Lookup::Disallow) => {
                self.observed_rules.remove(observed_idx.expect("observed lookup found a rule"));
                self.observed_rules.push(new_rule);
                true
            }
            (Lookup::Disallow, Lookup::Connect) => {
                self.observed_rules.remove(observed_idx.expect("observed lookup found a rule"));
                true
            }
        };

        if changed {
            self.save_observed();
        }
    }

    /// Records an externally-made unsubscription by updating
    /// `observedRules` per the teardown truth table, then persists the
    /// observed file if it changed.
    ///
    /// The `ConnectRule`/`DisallowRule` combination is not specified by
    /// the design's truth table (an active connection recorded as an
    /// observed connect while the profile simultaneously disallows it
    /// should not normally arise); this implementation treats it as a
    /// no-op, the same as every other unspecified combination would be if
    /// one existed.
    pub fn del_connection(&mut self, conn: RawConnection) {
        let pair = conn_key(conn);
        if !self.active_connections.remove(&pair) {
            return;
        }
        let (Some(sender_addr), Some(dest_addr)) = (self.active_ports.get(pair.0), self.active_ports.get(pair.1)) else {
            return;
        };

        let observed_idx = lookup_index(&self.observed_rules, sender_addr, dest_addr);
        let profile_idx = lookup_index(&self.profile_rules, sender_addr, dest_addr);
        let observed = classify(&self.observed_rules, observed_idx);
        let profile = classify(&self.profile_rules, profile_idx);
        let block_rule = ConnectionRule::exact_block(sender_addr, dest_addr);

        let changed = match (observed, profile) {
            (Lookup::None, Lookup::None | Lookup::Disallow) => false,
            (Lookup::None, Lookup::Connect) => {
                self.observed_rules.push(block_rule);
                true
            }
            (Lookup::Connect, Lookup::None) => {
                self.observed_rules.remove(observed_idx.expect("observed lookup found a rule"));
                true
            }
            (Lookup::Connect, Lookup::Connect) => {
                self.observed_rules.remove(observed_idx.expect("observed lookup found a rule"));
                self.observed_rules.push(block_rule);
                true
            }
            (Lookup::Connect, Lookup::Disallow) => false,
            (Lookup::Disallow, Lookup::None | Lookup::Disallow) => {
                self.observed_rules.remove(observed_idx.expect("observed lookup found a rule"));
                true
            }
            (Lookup::Disallow, Lookup::Connect) => false,
        };

        if changed {
            self.save_observed();
        }
    }
}
