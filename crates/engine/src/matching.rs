use rule::{ConnectionRule, MatchAddress};

use crate::candidate::{Candidate, Provenance};

/// Scans `rules` in order against `arrival` and the known `ports`,
/// appending matches to `candidates`.
///
/// For each rule, in order:
/// 1. If `arrival` can be a sender and matches the rule's sender side,
///    every port in `ports` that can be a destination and matches the
///    rule's destination side becomes a candidate with `arrival` as
///    sender.
/// 2. Symmetrically, if `arrival` can be a destination and matches the
///    rule's destination side, every port in `ports` that can be a
///    sender and matches the rule's sender side becomes a candidate with
///    `arrival` as destination.
///
/// A non-blocking match is appended to `candidates`. A blocking match
/// instead filters `candidates` in place, dropping any existing
/// candidate whose `(sender, dest)` pair the blocking rule also matches
/// — including candidates appended by earlier rules in `rules`, and (when
/// called a second time for a second list) candidates appended by an
/// earlier call. This is what lets a later rule veto an earlier one and
/// what lets the daemon core run this function once for the profile
/// rules and again for the observed rules against the same `candidates`
/// vector.
pub fn extend_candidates<'p, 'r>(
    arrival: &'p dyn MatchAddress,
    ports: &[&'p dyn MatchAddress],
    rules: &'r [ConnectionRule],
    provenance: Provenance,
    candidates: &mut Vec<Candidate<'p, 'r>>,
) {
    for rule in rules {
        if arrival.can_be_sender() && rule.sender.matches_as_sender(arrival) {
            for &b in ports {
                if b.can_be_dest() && rule.dest.matches_as_dest(b) {
                    consider(candidates, arrival, b, rule, provenance);
                }
            }
        }
        if arrival.can_be_dest() && rule.dest.matches_as_dest(arrival) {
            for &b in ports {
                if b.can_be_sender() && rule.sender.matches_as_sender(b) {
                    consider(candidates, b, arrival, rule, provenance);
                }
            }
        }
    }
}

fn consider<'p, 'r>(
    candidates: &mut Vec<Candidate<'p, 'r>>,
    sender: &'p dyn MatchAddress,
    dest: &'p dyn MatchAddress,
    rule: &'r ConnectionRule,
    provenance: Provenance,
) {
    if rule.blocking {
        candidates.retain(|c| !rule.matches(c.sender, c.dest));
    } else {
        candidates.push(Candidate {
            sender,
            dest,
            rule,
            provenance,
        });
    }
}
