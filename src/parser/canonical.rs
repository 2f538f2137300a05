//! Canonicalization shared by several decoders
//!
//! - transport option construction (ws / http / h2 / grpc)
//! - SNI inference from the transport `Host` header
//! - Shadowsocks SIP003 plugin translation

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::proxy::{
    GrpcOpts, H2Opts, HttpOpts, ObfsPluginOpts, SsPlugin, TlsFields, Transport, V2rayPluginOpts,
    WsOpts,
};

use super::helpers::get_if_not_blank;

// ============================================================================
// Transport
// ============================================================================

/// Raw transport settings collected from a link, before they are laid out
/// per network
#[derive(Debug, Default)]
pub struct TransportParts {
    pub headers: BTreeMap<String, String>,
    pub path: Option<String>,
    pub service_name: Option<String>,
    pub grpc_type: Option<String>,
}

impl TransportParts {
    pub fn with_host(mut self, host: Option<String>) -> Self {
        if let Some(host) = host.filter(|h| !h.is_empty()) {
            self.headers.insert("Host".to_string(), host);
        }
        self
    }
}

/// Maps the aliases used by link generators onto a canonical network name
pub fn normalize_network(network: &str) -> &str {
    match network {
        "websocket" => "ws",
        other => other,
    }
}

/// Lays out transport options for `network`
pub fn build_transport(network: &str, parts: TransportParts) -> Result<Transport> {
    trace!("Building {} transport from {:?}", network, parts);
    let TransportParts {
        mut headers,
        path,
        service_name,
        grpc_type,
    } = parts;

    match normalize_network(network) {
        "tcp" => Ok(Transport::Tcp),
        "ws" => Ok(Transport::Ws(WsOpts {
            path,
            headers,
            ..Default::default()
        })),
        "http" => Ok(Transport::Http(HttpOpts {
            method: None,
            path: path.into_iter().collect(),
            headers: headers
                .into_iter()
                .map(|(name, value)| (name, vec![value]))
                .collect(),
        })),
        "h2" => Ok(Transport::H2(H2Opts {
            host: headers.remove("Host").into_iter().collect(),
            path,
        })),
        "grpc" => Ok(Transport::Grpc(GrpcOpts {
            service_name,
            grpc_type,
        })),
        other => Err(ParseError::unsupported_option("network", other)),
    }
}

/// Reads a header block that may be a JSON object or a bare host name.
///
/// Non-string JSON values are dropped.
pub fn parse_headers(raw: &str) -> BTreeMap<String, String> {
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw) {
        Ok(object) => object
            .into_iter()
            .filter_map(|(name, value)| match value {
                serde_json::Value::String(s) => Some((name, s)),
                _ => None,
            })
            .collect(),
        Err(_) => BTreeMap::from([("Host".to_string(), raw.to_string())]),
    }
}

// ============================================================================
// SNI
// ============================================================================

/// Fills in `sni` from the transport `Host` header when TLS is on and no
/// explicit server name was given.
pub fn infer_sni(tls: &mut TlsFields, transport: &Transport) {
    if tls.tls
        && tls.sni.is_none()
        && let Some(host) = transport.host_header()
    {
        trace!("Inferring SNI from transport host: {}", host);
        tls.sni = Some(host.to_string());
    }
}

// ============================================================================
// Shadowsocks Plugins
// ============================================================================

/// Translates a SIP003 plugin string (`name;key=value;flag`) into a plugin
/// record.
pub fn translate_plugin(spec: &str) -> Result<SsPlugin> {
    let mut name = "";
    let mut options: BTreeMap<&str, Option<&str>> = BTreeMap::new();
    for (index, item) in spec.split(';').enumerate() {
        let (key, value) = match item.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (item, None),
        };
        if index == 0 {
            name = if key == "plugin" { value.unwrap_or_default() } else { key };
            continue;
        }
        if !key.is_empty() {
            options.insert(key, value);
        }
    }
    trace!("SIP003 plugin {:?} with options {:?}", name, options);

    let option = |key: &str| options.get(key).copied().flatten();

    match name {
        "obfs-local" | "simple-obfs" => Ok(SsPlugin::Obfs(ObfsPluginOpts {
            mode: get_if_not_blank(option("obfs")),
            host: get_if_not_blank(option("obfs-host")),
        })),
        "v2ray-plugin" => Ok(SsPlugin::V2ray(V2rayPluginOpts {
            mode: Some("websocket".to_string()),
            host: get_if_not_blank(option("obfs-host")).or_else(|| get_if_not_blank(option("host"))),
            path: get_if_not_blank(option("path")),
            // a bare `tls` flag means enabled
            tls: options.get("tls").copied().map(|v| v.is_none_or(|v| v != "false")),
            mux: options.get("mux").copied().map(|v| v.is_none_or(|v| v != "false")),
            skip_cert_verify: None,
        })),
        other => Err(ParseError::UnsupportedPlugin(other.to_string())),
    }
}
