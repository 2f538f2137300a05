//! Hysteria (v1) protocol parser
//!
//! Format: hysteria://host[:port]?protocol=udp&auth=...&peer=...&upmbps=100#tag

use std::collections::HashMap;

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::helpers::{
    default_name, get_if_not_blank, is_truthy, parse_query, percent_decode, split_link,
    split_optional_port,
};
use crate::proxy::{HysteriaProxy, Proxy, ProxyType, TlsFields};

use super::{kebab_key, split_list, strip_scheme};

const FORMAT: &str = "hysteria";

/// Query keys read by the parser, after `_` → `-` normalization
const KNOWN_KEYS: &[&str] = &[
    "alpn",
    "insecure",
    "auth",
    "auth-str",
    "mport",
    "ports",
    "obfsParam",
    "upmbps",
    "up",
    "downmbps",
    "down",
    "obfs",
    "fast-open",
    "fastopen",
    "peer",
    "sni",
    "protocol",
    "recv-window-conn",
    "recv-window",
    "ca",
    "ca-str",
    "disable-mtu-discovery",
    "hop-interval",
];

/// Parser for Hysteria (hysteria:// or hy://) URIs
pub struct HysteriaParser;

impl ProxyParser for HysteriaParser {
    fn name(&self) -> &str {
        "URI Hysteria Parser"
    }

    fn test(&self, line: &str) -> bool {
        line.starts_with("hysteria://") || line.starts_with("hy://")
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        trace!("Parsing Hysteria URI");
        let rest = strip_scheme(line.trim(), &["hysteria", "hy"])
            .ok_or_else(|| ParseError::malformed(FORMAT, "missing hysteria:// prefix"))?;

        let (body, query, fragment) = split_link(rest);
        let (server, port) = split_optional_port(body);
        if server.is_empty() {
            return Err(ParseError::malformed(FORMAT, "missing server"));
        }
        let port = port.unwrap_or(443);

        let params: HashMap<String, String> = query
            .map(parse_query)
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (kebab_key(&key), value))
            .collect();
        for key in params.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            trace!("Ignoring Hysteria parameter: {}", key);
        }
        let get = |key: &str| params.get(key).map(String::as_str);
        let either = |a: &str, b: &str| get_if_not_blank(get(a)).or_else(|| get_if_not_blank(get(b)));

        let name = fragment
            .map(percent_decode)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name(ProxyType::Hysteria, server, port));

        let tls = TlsFields {
            sni: either("sni", "peer"),
            alpn: get("alpn").map(split_list).unwrap_or_default(),
            skip_cert_verify: get("insecure").map(|v| is_truthy(Some(v))),
            ..Default::default()
        };

        Ok(Proxy::Hysteria(HysteriaProxy {
            name,
            server: server.to_string(),
            port,
            auth_str: either("auth", "auth-str"),
            ports: either("mport", "ports"),
            protocol: get_if_not_blank(get("protocol")).or_else(|| Some("udp".to_string())),
            obfs: get_if_not_blank(get("obfsParam")),
            obfs_mode: get_if_not_blank(get("obfs")),
            up: either("upmbps", "up"),
            down: either("downmbps", "down"),
            fast_open: get("fast-open")
                .or_else(|| get("fastopen"))
                .map(|v| is_truthy(Some(v))),
            recv_window_conn: get("recv-window-conn").and_then(|v| v.parse().ok()),
            recv_window: get("recv-window").and_then(|v| v.parse().ok()),
            ca: get_if_not_blank(get("ca")),
            ca_str: get_if_not_blank(get("ca-str")),
            disable_mtu_discovery: get("disable-mtu-discovery").map(|v| is_truthy(Some(v))),
            hop_interval: get_if_not_blank(get("hop-interval")),
            tls,
            ..Default::default()
        }))
    }
}
