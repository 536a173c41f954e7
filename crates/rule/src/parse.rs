//! Regex-based parser for the connection-rule grammar.
//!
//! ```text
//! endpoint connect endpoint
//!
//! connect ::= "<->" | "->" | "<-" | "<-x->" | "-x->" | "<-x-"
//!             (one or more dashes are accepted in any form)
//!
//! endpoint ::= client               -- default to the primary port
//!            | client ":" port      -- a named port on a given client
//!            | "." ("hw" | "app")   -- ports with a given type, any client
//!
//! client ::= words | '"' words '"' | "*"
//! port   ::= words | '"' words '"' | "=" number | "*"
//! ```

use std::sync::OnceLock;

use thiserror::Error;

use crate::{AddressSpec, ClientSpec, ConnectionRule, PortSpec, TYPE_APPLICATION, TYPE_HARDWARE};

/// An error produced while parsing a single rule or address expression.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RuleParseError {
    /// The client half of an address did not match the client grammar.
    #[error("malformed client '{0}'")]
    MalformedClient(String),
    /// The port half of an address did not match the port grammar.
    #[error("malformed port '{0}'")]
    MalformedPort(String),
    /// A bare `client-id:port-id` address was used where ids are not
    /// accepted.
    #[error("client-id:port-id matches not allowed here")]
    IdsNotAllowed,
    /// A `.name` port-type expression named an unrecognized type.
    #[error("invalid port type '{0}'")]
    InvalidPortType(String),
    /// An endpoint expression did not match the address grammar.
    #[error("malformed address '{0}'")]
    MalformedAddress(String),
    /// A full rule line did not match `endpoint connect endpoint`.
    #[error("malformed rule '{0}'")]
    MalformedRule(String),
    /// A line marked with a `# FAIL` comment parsed successfully.
    #[error("rule was not expected to parse")]
    UnexpectedSuccess,
}

/// One parse failure, tagged with its 1-based line number.
#[derive(Debug, Eq, PartialEq)]
pub struct LineError {
    /// 1-based line number within the parsed text.
    pub line: usize,
    /// The underlying parse error.
    pub error: RuleParseError,
}

/// The result of parsing a whole rule file or buffer.
///
/// Mirrors the original parser's behavior of continuing past a malformed
/// line rather than aborting: every line that does parse contributes its
/// rules to [`ParseOutcome::rules`], while every line that doesn't is
/// recorded in [`ParseOutcome::errors`].
#[derive(Debug, Default, Eq, PartialEq)]
pub struct ParseOutcome {
    /// Rules accumulated from every line that parsed successfully.
    pub rules: Vec<ConnectionRule>,
    /// One entry per line that failed to parse.
    pub errors: Vec<LineError>,
}

impl ParseOutcome {
    /// Whether every line parsed without error.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn client_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r#"^(?:(\*)|"([^"]+)"|'([^']+)'|([^*"'=.].*))$"#).unwrap()
    })
}

fn port_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r#"^(?:(\*)|"([^"]+)"|'([^']+)'|=(\d+)|([^*"'=.].*))$"#).unwrap()
    })
}

fn ids_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^(\d+):(\d+)$").unwrap())
}

fn port_type_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^\.\w+$").unwrap())
}

fn address_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(
            r#"^([^"':][^:]*|"[^"]+"|'[^']+')(?::([^"':][^:]*|"[^"]+"|'[^']+'))?$"#,
        )
        .unwrap()
    })
}

fn rule_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^(.*?)\s+(-+(?:x-+)?>|<-+(?:x-+)?>?)\s+(.*)$").unwrap()
    })
}

fn decomment_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^([^#]*)#(.*)$").unwrap())
}

fn parse_client_spec(s: &str) -> Result<ClientSpec, RuleParseError> {
    let caps = client_re()
        .captures(s)
        .ok_or_else(|| RuleParseError::MalformedClient(s.to_string()))?;
    if caps.get(1).is_some() {
        Ok(ClientSpec::Wildcard)
    } else if let Some(m) = caps.get(2).or_else(|| caps.get(3)) {
        Ok(ClientSpec::Exact(m.as_str().to_string()))
    } else if let Some(m) = caps.get(4) {
        Ok(ClientSpec::Partial(m.as_str().to_string()))
    } else {
        Err(RuleParseError::MalformedClient(s.to_string()))
    }
}

fn parse_port_spec(s: &str) -> Result<PortSpec, RuleParseError> {
    let caps = port_re()
        .captures(s)
        .ok_or_else(|| RuleParseError::MalformedPort(s.to_string()))?;
    if caps.get(1).is_some() {
        Ok(PortSpec::Wildcard)
    } else if let Some(m) = caps.get(2).or_else(|| caps.get(3)) {
        Ok(PortSpec::Exact(m.as_str().to_string()))
    } else if let Some(m) = caps.get(4) {
        let n: i32 = m
            .as_str()
            .parse()
            .map_err(|_| RuleParseError::MalformedPort(s.to_string()))?;
        Ok(PortSpec::Numeric(n))
    } else if let Some(m) = caps.get(5) {
        Ok(PortSpec::Partial(m.as_str().to_string()))
    } else {
        Err(RuleParseError::MalformedPort(s.to_string()))
    }
}

/// Parses a single endpoint expression (the `client[:port]` / `.type` /
/// `client-id:port-id` grammar).
///
/// `allow_ids` gates the numeric `client-id:port-id` form, which is only
/// accepted where the caller has a concrete address in mind (not in
/// persisted profile rules).
pub fn parse_address_spec(s: &str, allow_ids: bool) -> Result<AddressSpec, RuleParseError> {
    if let Some(caps) = ids_re().captures(s) {
        if !allow_ids {
            return Err(RuleParseError::IdsNotAllowed);
        }
        let client: i32 = caps[1].parse().unwrap();
        let port: i32 = caps[2].parse().unwrap();
        return Ok(AddressSpec::new(
            ClientSpec::Numeric(client),
            PortSpec::Numeric(port),
        ));
    }

    if port_type_re().is_match(s) {
        let bits = match s {
            ".hw" => TYPE_HARDWARE,
            ".app" => TYPE_APPLICATION,
            _ => return Err(RuleParseError::InvalidPortType(s.to_string())),
        };
        return Ok(AddressSpec::new(ClientSpec::Wildcard, PortSpec::Type(bits)));
    }

    let caps = address_re()
        .captures(s)
        .ok_or_else(|| RuleParseError::MalformedAddress(s.to_string()))?;
    let client_spec = parse_client_spec(&caps[1])?;
    let port_spec = match caps.get(2) {
        None => {
            if client_spec.is_wildcard() {
                PortSpec::Wildcard
            } else {
                PortSpec::Defaulted
            }
        }
        Some(port_text) => parse_port_spec(port_text.as_str())?,
    };

    Ok(AddressSpec::new(client_spec, port_spec))
}

fn parse_connection_rule(s: &str) -> Result<Vec<ConnectionRule>, RuleParseError> {
    let caps = rule_re()
        .captures(s)
        .ok_or_else(|| RuleParseError::MalformedRule(s.to_string()))?;

    let left = parse_address_spec(caps[1].trim(), false)?;
    let right = parse_address_spec(caps[3].trim(), false)?;
    let arrow = &caps[2];

    let blocking = arrow.contains('x');
    let mut rules = Vec::with_capacity(2);
    if arrow.ends_with('>') {
        rules.push(ConnectionRule::new(left.clone(), right.clone(), blocking));
    }
    if arrow.starts_with('<') {
        rules.push(ConnectionRule::new(right, left, blocking));
    }
    Ok(rules)
}

/// Parses one line of rule text, honoring `#` comments and `# FAIL`
/// negative-test markers the way the rule-file format does.
///
/// A line that is empty (after stripping its comment and surrounding
/// whitespace) yields no rules and no error. A comment containing `FAIL`
/// inverts the expected outcome: the line must fail to parse, or this
/// function returns [`RuleParseError::UnexpectedSuccess`].
pub fn parse_line(line: &str) -> Result<Vec<ConnectionRule>, RuleParseError> {
    let (body, expect_failure) = match decomment_re().captures(line) {
        Some(caps) => (caps[1].to_string(), caps[2].contains("FAIL")),
        None => (line.to_string(), false),
    };

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    match parse_connection_rule(trimmed) {
        Ok(rules) => {
            if expect_failure {
                Err(RuleParseError::UnexpectedSuccess)
            } else {
                Ok(rules)
            }
        }
        Err(e) => {
            if expect_failure {
                Ok(Vec::new())
            } else {
                Err(e)
            }
        }
    }
}

/// Parses a whole rule-file buffer, one rule per line.
///
/// Continues past malformed lines instead of stopping at the first one;
/// inspect [`ParseOutcome::is_ok`] to see whether every line parsed.
pub fn parse_rules(input: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    for (idx, line) in input.lines().enumerate() {
        match parse_line(line) {
            Ok(mut rules) => outcome.rules.append(&mut rules),
            Err(error) => outcome.errors.push(LineError {
                line: idx + 1,
                error,
            }),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wildcard_to_wildcard() {
        let outcome = parse_rules("* --> *\n");
        assert!(outcome.is_ok());
        assert_eq!(outcome.rules.len(), 1);
        assert!(!outcome.rules[0].blocking);
    }

    #[test]
    fn bidirectional_arrow_expands_to_two_rules() {
        let outcome = parse_rules("\"A\" <--> \"B\"\n");
        assert!(outcome.is_ok());
        assert_eq!(outcome.rules.len(), 2);
    }

    #[test]
    fn blocking_arrow_sets_flag() {
        let outcome = parse_rules("\"A\" -x-> \"B\"\n");
        assert!(outcome.is_ok());
        assert!(outcome.rules[0].blocking);
    }

    #[test]
    fn reverse_arrow_swaps_sender_and_dest() {
        let outcome = parse_rules("\"A\" <-- \"B\"\n");
        assert!(outcome.is_ok());
        assert_eq!(outcome.rules[0].sender.client, ClientSpec::Exact("B".into()));
        assert_eq!(outcome.rules[0].dest.client, ClientSpec::Exact("A".into()));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let outcome = parse_rules("# just a comment\n\n   \n\"A\" --> \"B\"\n");
        assert!(outcome.is_ok());
        assert_eq!(outcome.rules.len(), 1);
    }

    #[test]
    fn fail_marker_requires_malformed_line() {
        let outcome = parse_rules("this is not a rule # FAIL\n");
        assert!(outcome.is_ok());
        assert!(outcome.rules.is_empty());
    }

    #[test]
    fn fail_marker_on_valid_line_is_an_error() {
        let outcome = parse_rules("\"A\" --> \"B\" # FAIL\n");
        assert!(!outcome.is_ok());
        assert_eq!(outcome.errors[0].error, RuleParseError::UnexpectedSuccess);
    }

    #[test]
    fn malformed_line_is_reported_with_line_number() {
        let outcome = parse_rules("\"A\" --> \"B\"\nnot a rule at all\n");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].line, 2);
    }

    #[test]
    fn port_type_endpoint_parses() {
        let spec = parse_address_spec(".hw", false).unwrap();
        assert_eq!(spec.port, PortSpec::Type(TYPE_HARDWARE));
        assert!(spec.client.is_wildcard());
    }

    #[test]
    fn numeric_ids_rejected_unless_allowed() {
        assert_eq!(
            parse_address_spec("128:0", false),
            Err(RuleParseError::IdsNotAllowed)
        );
        assert!(parse_address_spec("128:0", true).is_ok());
    }

    #[test]
    fn defaulted_port_when_omitted_on_named_client() {
        let spec = parse_address_spec("Controller", false).unwrap();
        assert_eq!(spec.port, PortSpec::Defaulted);
    }

    #[test]
    fn hyphenated_client_name_survives_arrow_disambiguation() {
        let outcome = parse_rules("Akai-MPK --> \"Synth\"\n");
        assert!(outcome.is_ok());
        assert_eq!(
            outcome.rules[0].sender.client,
            ClientSpec::Partial("Akai-MPK".into())
        );
    }

    #[test]
    fn render_parse_round_trip() {
        let original = ConnectionRule::new(
            crate::AddressSpec::new(ClientSpec::Exact("A".into()), PortSpec::Exact("out".into())),
            crate::AddressSpec::new(ClientSpec::Exact("B".into()), PortSpec::Exact("in".into())),
            true,
        );
        let rendered = original.to_string();
        let outcome = parse_rules(&rendered);
        assert!(outcome.is_ok(), "{rendered:?} failed: {:?}", outcome.errors);
        assert_eq!(outcome.rules, vec![original]);
    }
}
