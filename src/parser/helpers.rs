//! Small predicates and string utilities shared by the decoders.

use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{ParseError, Result};
use crate::proxy::ProxyType;

// ============================================================================
// Predicates
// ============================================================================

/// Strict IPv4 literal check
pub fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// Strict IPv6 literal check (no brackets, no zone)
pub fn is_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

pub fn is_ip(s: &str) -> bool {
    is_ipv4(s) || is_ipv6(s)
}

/// Non-empty after trimming
pub fn is_not_blank(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Returns the value when it is not blank
pub fn get_if_not_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| is_not_blank(v)).map(str::to_string)
}

/// First value of an ordered fallback chain that is present
pub fn first_present<'a, const N: usize>(chain: [Option<&'a str>; N]) -> Option<&'a str> {
    chain.into_iter().flatten().next()
}

/// Loose boolean used by link query strings: any `true` (any case) or `1`.
pub fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.contains('1') || v.to_ascii_lowercase().contains("true"))
}

/// Strict-prefix flag: the value starts with `1` or `true` (any case).
pub fn is_flag_on(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.starts_with('1') || v.to_ascii_lowercase().starts_with("true"))
}

// ============================================================================
// Decoding
// ============================================================================

/// Percent-decodes a segment, keeping it verbatim if the result is not UTF-8
pub fn percent_decode(s: &str) -> String {
    urlencoding::decode(s)
        .unwrap_or_else(|_| s.into())
        .into_owned()
}

/// Percent-decodes a segment, failing if the result is not UTF-8
pub fn try_percent_decode(s: &str) -> Result<String> {
    urlencoding::decode(s)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ParseError::malformed("percent-encoding", e.to_string()))
}

/// Parses an `a=1&b=2` query string.
///
/// Values are percent-decoded once; keys are kept as written. A key without
/// `=` maps to an empty value and later duplicates win.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), percent_decode(value)),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Splits `rest` into the part before `?`, the query and the fragment.
///
/// Returns `(body, query, fragment)`; `query` and `fragment` are raw.
pub fn split_link(rest: &str) -> (&str, Option<&str>, Option<&str>) {
    let (before_fragment, fragment) = match rest.split_once('#') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    };
    let (body, query) = match before_fragment.split_once('?') {
        Some((head, tail)) => (head, Some(tail)),
        None => (before_fragment, None),
    };
    (body.strip_suffix('/').unwrap_or(body), query, fragment)
}

// ============================================================================
// Addresses
// ============================================================================

/// Parses host:port string, handling IPv6 addresses in brackets
pub fn parse_host_port(format: &'static str, hostport: &str) -> Result<(String, u16)> {
    if hostport.starts_with('[') {
        let bracket_end = hostport
            .find(']')
            .ok_or_else(|| ParseError::malformed(format, "IPv6 address missing closing bracket"))?;

        let host = hostport[1..bracket_end].to_string();
        let port_str = hostport
            .get(bracket_end + 2..)
            .ok_or_else(|| ParseError::malformed(format, "missing port after IPv6 address"))?;

        let port = parse_port(format, port_str)?;
        return Ok((host, port));
    }

    let colon_pos = hostport
        .rfind(':')
        .ok_or_else(|| ParseError::malformed(format, "missing port"))?;

    let host = hostport[..colon_pos].to_string();
    if host.is_empty() {
        return Err(ParseError::malformed(format, "missing server"));
    }
    let port = parse_port(format, &hostport[colon_pos + 1..])?;
    Ok((host, port))
}

/// Splits an optional port off `host[:port]`, for schemes with a default port.
pub fn split_optional_port(hostport: &str) -> (&str, Option<u16>) {
    if let Some(rest) = hostport.strip_prefix('[')
        && let Some((host, tail)) = rest.split_once(']')
    {
        let port = tail.strip_prefix(':').and_then(|p| p.parse().ok());
        return (host, port);
    }
    match hostport.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            (host, port.parse().ok())
        }
        _ => (hostport, None),
    }
}

/// Parses a decimal port number
pub fn parse_port(format: &'static str, s: &str) -> Result<u16> {
    s.trim()
        .parse()
        .map_err(|_| ParseError::malformed(format, format!("invalid port number: {:?}", s)))
}

/// Fallback display name: `"<Label> <server>:<port>"`
pub fn default_name(kind: ProxyType, server: &str, port: u16) -> String {
    format!("{} {}:{}", kind.label(), server, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_predicates() {
        assert!(is_ipv4("1.2.3.4"));
        assert!(!is_ipv4("1.2.3"));
        assert!(!is_ipv4("::1"));
        assert!(is_ipv6("2001:db8::1"));
        assert!(!is_ipv6("[::1]"));
        assert!(is_ip("::1"));
        assert!(!is_ip("example.com"));
    }

    #[test]
    fn test_blank_helpers() {
        assert!(is_not_blank(" a "));
        assert!(!is_not_blank("   "));
        assert_eq!(get_if_not_blank(Some("x")), Some("x".to_string()));
        assert_eq!(get_if_not_blank(Some("")), None);
        assert_eq!(get_if_not_blank(None), None);
    }

    #[test]
    fn test_first_present_order() {
        assert_eq!(first_present([None, Some("b"), Some("c")]), Some("b"));
        assert_eq!(first_present::<2>([None, None]), None);
    }

    #[test]
    fn test_truthy_and_flag() {
        assert!(is_truthy(Some("1")));
        assert!(is_truthy(Some("TRUE")));
        assert!(is_truthy(Some("True")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("false")));
        assert!(!is_truthy(None));

        assert!(is_flag_on(Some("1")));
        assert!(is_flag_on(Some("TRUE")));
        assert!(!is_flag_on(Some("0")));
        assert!(!is_flag_on(Some("yes")));
    }

    #[test]
    fn test_parse_query() {
        let params = parse_query("sni=a.example.com&path=%2Fws&pbk=abc%3D&flag&a=1&a=2");
        assert_eq!(params["sni"], "a.example.com");
        assert_eq!(params["path"], "/ws");
        assert_eq!(params["pbk"], "abc=");
        assert_eq!(params["flag"], "");
        assert_eq!(params["a"], "2");
    }

    #[test]
    fn test_split_link() {
        assert_eq!(
            split_link("u@h:1/?a=b#name"),
            ("u@h:1", Some("a=b"), Some("name"))
        );
        assert_eq!(split_link("u@h:1"), ("u@h:1", None, None));
        assert_eq!(split_link("u@h:1#n?x"), ("u@h:1", None, Some("n?x")));
    }

    #[test]
    fn test_parse_host_port() {
        assert_eq!(
            parse_host_port("t", "example.com:8080").unwrap(),
            ("example.com".to_string(), 8080)
        );
        assert_eq!(
            parse_host_port("t", "[2001:db8::1]:443").unwrap(),
            ("2001:db8::1".to_string(), 443)
        );
        assert!(parse_host_port("t", "example.com").is_err());
        assert!(parse_host_port("t", "example.com:http").is_err());
        assert!(parse_host_port("t", "[::1:8080").is_err());
        assert!(parse_host_port("t", ":8080").is_err());
    }

    #[test]
    fn test_split_optional_port() {
        assert_eq!(split_optional_port("example.com"), ("example.com", None));
        assert_eq!(split_optional_port("example.com:8443"), ("example.com", Some(8443)));
        assert_eq!(split_optional_port("[::1]:443"), ("::1", Some(443)));
        assert_eq!(split_optional_port("[::1]"), ("::1", None));
        assert_eq!(split_optional_port("example.com:99999"), ("example.com", None));
    }

    #[test]
    fn test_default_name() {
        assert_eq!(
            default_name(ProxyType::Hysteria2, "host", 443),
            "Hysteria2 host:443"
        );
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("%F0%9F%87%BA%F0%9F%87%B8%20US"), "🇺🇸 US");
        assert_eq!(percent_decode("plain"), "plain");
        assert!(try_percent_decode("%FF").is_err());
    }
}
