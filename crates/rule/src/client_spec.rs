use std::fmt;

use crate::MatchAddress;

/// Matches the client half of an address.
///
/// `Partial` performs a substring search on the client name; `Exact`
/// requires an exact match; `Numeric` matches a specific client id; and
/// `Wildcard` matches any client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientSpec {
    /// Matches any client.
    Wildcard,
    /// Substring match against the client name.
    Partial(String),
    /// Exact match against the client name.
    Exact(String),
    /// Match against a specific numeric client id.
    Numeric(i32),
}

impl ClientSpec {
    /// Returns `true` when `addr`'s client satisfies this spec.
    pub fn matches(&self, addr: &dyn MatchAddress) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Partial(s) => addr.client_name().contains(s.as_str()),
            Self::Exact(s) => addr.client_name() == s,
            Self::Numeric(id) => addr.client_id() == *id,
        }
    }

    /// Whether this spec is the wildcard variant.
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl fmt::Display for ClientSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => write!(f, "*"),
            Self::Partial(s) => write!(f, "{s}"),
            Self::Exact(s) => write!(f, "\"{s}\""),
            Self::Numeric(id) => write!(f, "{id}"),
        }
    }
}
