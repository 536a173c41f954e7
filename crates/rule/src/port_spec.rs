use std::fmt;

use crate::MatchAddress;

/// `SND_SEQ_PORT_TYPE_HARDWARE`: the port belongs to a hardware device.
pub const TYPE_HARDWARE: u32 = 1 << 16;
/// `SND_SEQ_PORT_TYPE_APPLICATION`: the port belongs to an application.
pub const TYPE_APPLICATION: u32 = 1 << 20;
/// `SND_SEQ_PORT_TYPE_MIDI_GENERIC`: the port handles generic MIDI events.
pub const TYPE_MIDI_GENERIC: u32 = 1 << 1;

/// Matches the port half of an address.
///
/// `Defaulted` means "the primary port of the client, in whichever
/// direction the address is being matched as" and only matches when the
/// candidate carries the relevant `primarySender`/`primaryDest` flag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PortSpec {
    /// Matches any port.
    Wildcard,
    /// Substring match against the trimmed or long port name.
    Partial(String),
    /// Exact match against the trimmed or long port name.
    Exact(String),
    /// Match against a specific numeric port id.
    Numeric(i32),
    /// Match ports whose type bitmask intersects `bits`.
    Type(u32),
    /// Matches only the primary port of the client, in context.
    Defaulted,
}

impl PortSpec {
    /// Returns `true` when `addr` can act as a sender and its port matches
    /// this spec, using `addr.is_primary_sender()` for [`Self::Defaulted`].
    pub fn matches_as_sender(&self, addr: &dyn MatchAddress) -> bool {
        addr.can_be_sender() && self.matches_common(addr, addr.is_primary_sender())
    }

    /// Returns `true` when `addr` can act as a destination and its port
    /// matches this spec, using `addr.is_primary_dest()` for
    /// [`Self::Defaulted`].
    pub fn matches_as_dest(&self, addr: &dyn MatchAddress) -> bool {
        addr.can_be_dest() && self.matches_common(addr, addr.is_primary_dest())
    }

    fn matches_common(&self, addr: &dyn MatchAddress, primary_flag: bool) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Defaulted => primary_flag,
            Self::Partial(s) => {
                addr.port_name().contains(s.as_str()) || addr.port_long_name() == s.as_str()
            }
            Self::Exact(s) => addr.port_name() == s || addr.port_long_name() == s,
            Self::Numeric(n) => addr.port_id() == *n,
            Self::Type(bits) => addr.type_bits() & bits != 0,
        }
    }

    /// Whether this spec is the wildcard variant.
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Whether this spec is the defaulted (primary-port) variant.
    pub const fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted)
    }

    /// Whether this spec is a port-type match.
    pub const fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaulted => Ok(()),
            Self::Wildcard => write!(f, "*"),
            Self::Partial(s) => write!(f, "{s}"),
            Self::Exact(s) => write!(f, "\"{s}\""),
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Type(bits) => match *bits {
                TYPE_HARDWARE => write!(f, ".hw"),
                TYPE_APPLICATION => write!(f, ".app"),
                other => write!(f, ".{other:x}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        port: &'static str,
        port_long: &'static str,
        port_id: i32,
        can_send: bool,
        can_recv: bool,
        primary_sender: bool,
        primary_dest: bool,
        types: u32,
    }

    impl MatchAddress for Stub {
        fn client_id(&self) -> i32 {
            0
        }
        fn port_id(&self) -> i32 {
            self.port_id
        }
        fn client_name(&self) -> &str {
            ""
        }
        fn port_name(&self) -> &str {
            self.port
        }
        fn port_long_name(&self) -> &str {
            self.port_long
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
            self.types
        }
    }

    fn stub() -> Stub {
        Stub {
            port: "out",
            port_long: "Controller:out",
            port_id: 0,
            can_send: true,
            can_recv: false,
            primary_sender: true,
            primary_dest: false,
            types: TYPE_HARDWARE,
        }
    }

    #[test]
    fn defaulted_requires_primary_flag() {
        let mut a = stub();
        assert!(PortSpec::Defaulted.matches_as_sender(&a));
        a.primary_sender = false;
        assert!(!PortSpec::Defaulted.matches_as_sender(&a));
    }

    #[test]
    fn defaulted_never_matches_wrong_direction() {
        let a = stub();
        assert!(!PortSpec::Defaulted.matches_as_dest(&a));
    }

    #[test]
    fn partial_checks_long_name_too() {
        let a = stub();
        assert!(PortSpec::Partial("Controller:".into()).matches_as_sender(&a));
    }

    #[test]
    fn type_matches_bitmask_intersection() {
        let a = stub();
        assert!(PortSpec::Type(TYPE_HARDWARE).matches_as_sender(&a));
        assert!(!PortSpec::Type(TYPE_APPLICATION).matches_as_sender(&a));
    }

    #[test]
    fn direction_capability_gate() {
        let a = stub();
        assert!(!PortSpec::Wildcard.matches_as_dest(&a));
    }

    #[test]
    fn display_matches_grammar() {
        assert_eq!(PortSpec::Defaulted.to_string(), "");
        assert_eq!(PortSpec::Wildcard.to_string(), "*");
        assert_eq!(PortSpec::Numeric(2).to_string(), "2");
        assert_eq!(PortSpec::Type(TYPE_HARDWARE).to_string(), ".hw");
        assert_eq!(PortSpec::Type(TYPE_APPLICATION).to_string(), ".app");
    }
}
