use std::fmt;

use crate::{ClientSpec, MatchAddress, PortSpec};

/// A client/port matcher pair, used as the sender or destination side of a
/// [`ConnectionRule`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddressSpec {
    /// The client-matching half.
    pub client: ClientSpec,
    /// The port-matching half.
    pub port: PortSpec,
}

impl AddressSpec {
    /// Builds a new spec from its two halves.
    pub const fn new(client: ClientSpec, port: PortSpec) -> Self {
        Self { client, port }
    }

    /// An exact spec naming `addr`'s current client and port.
    pub fn exact(addr: &dyn MatchAddress) -> Self {
        Self::new(
            ClientSpec::Exact(addr.client_name().to_string()),
            PortSpec::Exact(addr.port_name().to_string()),
        )
    }

    /// Returns `true` when `addr` can be a sender matching this spec.
    pub fn matches_as_sender(&self, addr: &dyn MatchAddress) -> bool {
        self.client.matches(addr) && self.port.matches_as_sender(addr)
    }

    /// Returns `true` when `addr` can be a destination matching this spec.
    pub fn matches_as_dest(&self, addr: &dyn MatchAddress) -> bool {
        self.client.matches(addr) && self.port.matches_as_dest(addr)
    }

    /// Whether either half of this spec is a wildcard.
    pub const fn is_wildcard(&self) -> bool {
        self.client.is_wildcard() || self.port.is_wildcard()
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.client.is_wildcard() && self.port.is_type() {
            write!(f, "{}", self.port)
        } else if self.port.is_defaulted() {
            write!(f, "{}", self.client)
        } else {
            write!(f, "{}:{}", self.client, self.port)
        }
    }
}

/// A single directed matching rule: connect (or block) senders matching
/// `sender` to destinations matching `dest`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectionRule {
    /// Sender-side matcher.
    pub sender: AddressSpec,
    /// Destination-side matcher.
    pub dest: AddressSpec,
    /// When `true`, this rule removes matching candidates instead of
    /// proposing them (a negative override).
    pub blocking: bool,
}

impl ConnectionRule {
    /// Builds a rule from its parts.
    pub const fn new(sender: AddressSpec, dest: AddressSpec, blocking: bool) -> Self {
        Self {
            sender,
            dest,
            blocking,
        }
    }

    /// A non-blocking exact rule recording that `sender` is connected to
    /// `dest`, used to append an observed rule.
    pub fn exact(sender: &dyn MatchAddress, dest: &dyn MatchAddress) -> Self {
        Self::new(AddressSpec::exact(sender), AddressSpec::exact(dest), false)
    }

    /// A blocking exact rule recording that `sender` must not be connected
    /// to `dest`, used to append an observed disallow rule.
    pub fn exact_block(sender: &dyn MatchAddress, dest: &dyn MatchAddress) -> Self {
        Self::new(AddressSpec::exact(sender), AddressSpec::exact(dest), true)
    }

    /// Returns `true` when `(sender, dest)` satisfies both halves of this
    /// rule.
    pub fn matches(&self, sender: &dyn MatchAddress, dest: &dyn MatchAddress) -> bool {
        self.sender.matches_as_sender(sender) && self.dest.matches_as_dest(dest)
    }
}

impl fmt::Display for ConnectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.blocking { "-x->" } else { "-->" };
        write!(f, "{} {} {}", self.sender, arrow, self.dest)
    }
}

/// The classification [`find_rule`] assigns to a `(sender, dest)` pair
/// against a rule list.
#[derive(Debug)]
pub enum RuleLookup<'a> {
    /// No rule in the list matches this pair.
    NoRule,
    /// The latest matching rule is a (non-blocking) connect rule.
    ConnectRule(&'a ConnectionRule),
    /// The latest matching rule is a blocking (disallow) rule.
    DisallowRule(&'a ConnectionRule),
}

impl RuleLookup<'_> {
    /// Whether this lookup found a connect rule.
    pub const fn is_connect(&self) -> bool {
        matches!(self, Self::ConnectRule(_))
    }

    /// Whether this lookup found a disallow rule.
    pub const fn is_disallow(&self) -> bool {
        matches!(self, Self::DisallowRule(_))
    }

    /// Whether no rule matched.
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::NoRule)
    }
}

/// Scans `rules` in reverse order and returns the classification of the
/// first rule matching `(sender, dest)`. Reverse order implements "later
/// rules win".
pub fn find_rule<'a>(
    rules: &'a [ConnectionRule],
    sender: &dyn MatchAddress,
    dest: &dyn MatchAddress,
) -> RuleLookup<'a> {
    for rule in rules.iter().rev() {
        if rule.matches(sender, dest) {
            return if rule.blocking {
                RuleLookup::DisallowRule(rule)
            } else {
                RuleLookup::ConnectRule(rule)
            };
        }
    }
    RuleLookup::NoRule
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        client: &'static str,
        client_id: i32,
        port: &'static str,
        port_id: i32,
        can_send: bool,
        can_recv: bool,
        primary_sender: bool,
        primary_dest: bool,
    }

    impl MatchAddress for Stub {
        fn client_id(&self) -> i32 {
            self.client_id
        }
        fn port_id(&self) -> i32 {
            self.port_id
        }
        fn client_name(&self) -> &str {
            self.client
        }
        fn port_name(&self) -> &str {
            self.port
        }
        fn port_long_name(&self) -> &str {
            self.port
        }
        fn can_be_sender(&self) -> bool {
            self.can_send
        }
        fn can_be_dest(&self) -> bool {
            self.can_recv
        }
        fn is_primary_sender(&self) -> bool {
            self.primary_sender
        }
        fn is_primary_dest(&self) -> bool {
            self.primary_dest
        }
        fn type_bits(&self) -> u32 {
            0
        }
    }

    fn controller() -> Stub {
        Stub {
            client: "Controller",
            client_id: 150,
            port: "out",
            port_id: 0,
            can_send: true,
            can_recv: true,
            primary_sender: true,
            primary_dest: false,
        }
    }

    fn synth() -> Stub {
        Stub {
            client: "Synthesizer",
            client_id: 200,
            port: "in",
            port_id: 0,
            can_send: true,
            can_recv: true,
            primary_sender: false,
            primary_dest: true,
        }
    }

    #[test]
    fn find_rule_reverse_order_later_wins() {
        let a = controller();
        let b = synth();
        let r1 = ConnectionRule::new(
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            false,
        );
        let r2 = ConnectionRule::new(
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            true,
        );
        let rules = vec![r1, r2.clone()];
        match find_rule(&rules, &a, &b) {
            RuleLookup::DisallowRule(r) => assert_eq!(*r, r2),
            other => panic!("expected disallow rule, got {other:?}"),
        }
    }

    #[test]
    fn find_rule_none_when_nothing_matches() {
        let a = controller();
        let b = synth();
        let rules = vec![ConnectionRule::new(
            AddressSpec::new(ClientSpec::Exact("nope".into()), PortSpec::Wildcard),
            AddressSpec::new(ClientSpec::Wildcard, PortSpec::Wildcard),
            false,
        )];
        assert!(find_rule(&rules, &a, &b).is_none());
    }

    #[test]
    fn exact_rule_round_trips_display() {
        let a = controller();
        let b = synth();
        let r = ConnectionRule::exact(&a, &b);
        assert_eq!(r.to_string(), "\"Controller\":\"out\" --> \"Synthesizer\":\"in\"");
    }

    #[test]
    fn address_spec_hides_defaulted_port() {
        let spec = AddressSpec::new(ClientSpec::Partial("Controller".into()), PortSpec::Defaulted);
        assert_eq!(spec.to_string(), "Controller");
    }

    #[test]
    fn address_spec_renders_type_with_wildcard_client() {
        let spec = AddressSpec::new(ClientSpec::Wildcard, PortSpec::Type(crate::TYPE_HARDWARE));
        assert_eq!(spec.to_string(), ".hw");
    }
}
