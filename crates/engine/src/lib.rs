#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` turns a single port arrival, the set of currently known
//! ports, and an ordered rule list into a set of candidate
//! `(sender, dest)` subscriptions. It holds no state of its own — the
//! daemon core owns the port map and the two rule lists and calls into
//! this crate once per arrival.
//!
//! # Design
//!
//! [`run`] scans the profile rules first, then continues scanning the
//! observed rules against the same growing candidate list, so a blocking
//! observed rule can veto a candidate a profile rule proposed (and vice
//! versa). [`Candidate`] borrows its sender/dest addresses and the rule
//! that produced it rather than owning copies; it is only meant to live
//! for the duration of a single [`run`] call, after which the daemon
//! core extracts the numeric keys it needs before the port map is
//! touched again.
//!
//! # Invariants
//!
//! - Rule order is significant within a list: later non-blocking rules
//!   add candidates, later blocking rules remove them, and both effects
//!   apply within and across the profile/observed boundary.
//! - Calling [`run`] with an empty `ports` slice or empty rule lists
//!   always yields an empty candidate list; it never panics.
//!
//! # See also
//!
//! - `rule` for the matching primitives ([`rule::AddressSpec`],
//!   [`rule::ConnectionRule`]) this crate composes.
//! - `daemon` for how candidates become real kernel subscriptions.

mod candidate;
mod matching;

pub use candidate::{Candidate, Provenance};
pub use matching::extend_candidates;

use rule::{ConnectionRule, MatchAddress};

/// Runs the rule engine for a single port arrival against both rule
/// lists, in the required `profile, observed` order, returning the
/// resulting candidate list.
pub fn run<'p, 'r>(
    arrival: &'p dyn MatchAddress,
    ports: &[&'p dyn MatchAddress],
    profile_rules: &'r [ConnectionRule],
    observed_rules: &'r [ConnectionRule],
) -> Vec<Candidate<'p, 'r>> {
    let mut candidates = Vec::new();
    extend_candidates(arrival, ports, profile_rules, Provenance::Profile, &mut candidates);
    extend_candidates(arrival, ports, observed_rules, Provenance::Observed, &mut candidates);
    candidates
}

#[cfg(test)]
mod tests {
    use rule::{AddressSpec, ClientSpec, ConnectionRule, PortSpec};
    use seq::{Address, PortMap, CAN_RECV, CAN_SEND};

    use super::*;

    fn controller_port() -> Address {
        Address::new(150, 0, CAN_SEND | CAN_RECV, 0, "Controller", "out")
    }

    fn synth_port() -> Address {
        Address::new(200, 0, CAN_SEND | CAN_RECV, 0, "Synthesizer", "in")
    }

    fn wildcard(blocking: bool) -> ConnectionRule {
        ConnectionRule::new(
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            blocking,
        )
    }

    #[test]
    fn single_matching_rule_yields_one_candidate() {
        let mut map = PortMap::new();
        map.insert(synth_port());
        let synth = map.get((200, 0)).unwrap();

        let arrival = controller_port();
        let ports: Vec<&dyn MatchAddress> = vec![synth];
        let profile = vec![wildcard(false)];
        let observed: Vec<ConnectionRule> = Vec::new();

        let candidates = run(&arrival, &ports, &profile, &observed);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key(), ((150, 0), (200, 0)));
        assert_eq!(candidates[0].provenance, Provenance::Profile);
    }

    #[test]
    fn later_blocking_rule_suppresses_earlier_candidate() {
        let mut map = PortMap::new();
        map.insert(synth_port());
        let synth = map.get((200, 0)).unwrap();

        let arrival = controller_port();
        let ports: Vec<&dyn MatchAddress> = vec![synth];
        let profile = vec![wildcard(false), wildcard(true)];
        let observed: Vec<ConnectionRule> = Vec::new();

        let candidates = run(&arrival, &ports, &profile, &observed);
        assert!(candidates.is_empty());
    }

    #[test]
    fn observed_blocking_rule_suppresses_profile_candidate() {
        let mut map = PortMap::new();
        map.insert(synth_port());
        let synth = map.get((200, 0)).unwrap();

        let arrival = controller_port();
        let ports: Vec<&dyn MatchAddress> = vec![synth];
        let profile = vec![wildcard(false)];
        let observed = vec![wildcard(true)];

        let candidates = run(&arrival, &ports, &profile, &observed);
        assert!(candidates.is_empty(), "a later observed block must veto an earlier profile candidate");
    }

    #[test]
    fn arrival_as_destination_matches_existing_senders() {
        let mut map = PortMap::new();
        map.insert(controller_port());
        let controller = map.get((150, 0)).unwrap();

        let arrival = synth_port();
        let ports: Vec<&dyn MatchAddress> = vec![controller];
        let profile = vec![wildcard(false)];
        let observed: Vec<ConnectionRule> = Vec::new();

        let candidates = run(&arrival, &ports, &profile, &observed);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key(), ((150, 0), (200, 0)));
    }

    #[test]
    fn non_matching_rule_yields_no_candidates() {
        let mut map = PortMap::new();
        map.insert(synth_port());
        let synth = map.get((200, 0)).unwrap();

        let arrival = controller_port();
        let ports: Vec<&dyn MatchAddress> = vec![synth];
        let profile = vec![ConnectionRule::new(
            AddressSpec::new(ClientSpec::Exact("Nope".into()), PortSpec::Wildcard),
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            false,
        )];
        let observed: Vec<ConnectionRule> = Vec::new();

        assert!(run(&arrival, &ports, &profile, &observed).is_empty());
    }
}
