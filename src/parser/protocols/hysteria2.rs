//! Hysteria2 protocol parser
//!
//! This module provides parsing for Hysteria2 (hysteria2:// or hy2://) URIs.
//! Format: hysteria2://auth@host[:port]?params#tag

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::helpers::{
    default_name, get_if_not_blank, is_truthy, parse_query, percent_decode, split_link,
    split_optional_port,
};
use crate::proxy::{Hysteria2Proxy, Proxy, ProxyType, TlsFields};

use super::{split_list, strip_scheme};

const FORMAT: &str = "hysteria2";

// ============================================================================
// Hysteria2 Parser
// ============================================================================

/// Parser for Hysteria2 (hysteria2:// or hy2://) URIs
///
/// The port defaults to 443 when absent.
pub struct Hysteria2Parser;

impl ProxyParser for Hysteria2Parser {
    fn name(&self) -> &str {
        "URI Hysteria2 Parser"
    }

    fn test(&self, line: &str) -> bool {
        line.starts_with("hysteria2://") || line.starts_with("hy2://")
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        trace!("Parsing Hysteria2 URI");
        let rest = strip_scheme(line.trim(), &["hysteria2", "hy2"])
            .ok_or_else(|| ParseError::malformed(FORMAT, "missing hysteria2:// prefix"))?;

        let (body, query, fragment) = split_link(rest);
        let (password, hostport) = body
            .split_once('@')
            .ok_or_else(|| ParseError::malformed(FORMAT, "missing password"))?;
        let (server, port) = split_optional_port(hostport);
        if server.is_empty() {
            return Err(ParseError::malformed(FORMAT, "missing server"));
        }
        let port = port.unwrap_or(443);

        let params = query.map(parse_query).unwrap_or_default();
        let get = |key: &str| params.get(key).map(String::as_str);

        let name = fragment
            .map(percent_decode)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name(ProxyType::Hysteria2, server, port));

        let tls = TlsFields {
            sni: get_if_not_blank(get("sni")).or_else(|| get_if_not_blank(get("peer"))),
            alpn: get("alpn").map(split_list).unwrap_or_default(),
            skip_cert_verify: Some(is_truthy(get("insecure"))),
            tls_fingerprint: get_if_not_blank(get("pinSHA256")),
            ..Default::default()
        };

        let mut proxy = Hysteria2Proxy {
            name,
            server: server.to_string(),
            port,
            password: percent_decode(password),
            ports: get_if_not_blank(get("mport")),
            obfs: get_if_not_blank(get("obfs")).filter(|o| o != "none"),
            obfs_password: get_if_not_blank(get("obfs-password")),
            up: get_if_not_blank(get("up")),
            down: get_if_not_blank(get("down")),
            tls,
            ..Default::default()
        };
        proxy.common.tfo = Some(is_truthy(get("fastopen")));

        Ok(Proxy::Hysteria2(proxy))
    }
}
