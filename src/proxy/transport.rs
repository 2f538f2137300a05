//! Transport (network) selection for V2Ray-family proxies.
//!
//! On the wire a transport is a `network` key plus an optional
//! `<network>-opts` sub-record. [`Transport`] keeps the two together so a
//! record can never carry options for a network it does not use.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::util::{deserialize_option_u32, string_or_vec};
use crate::error::ParseError;

// ============================================================================
// Transport Enum
// ============================================================================

/// Active transport of a proxy and its options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "TransportRepr", into = "TransportRepr")]
pub enum Transport {
    /// No `network` key at all
    #[default]
    None,
    /// Plain TCP
    Tcp,
    /// WebSocket
    Ws(WsOpts),
    /// HTTP/1.1 obfuscation
    Http(HttpOpts),
    /// HTTP/2
    H2(H2Opts),
    /// gRPC
    Grpc(GrpcOpts),
    /// A network with no typed options; its `<network>-opts` record, if any,
    /// stays among the proxy's extra keys
    Other(String),
}

impl Transport {
    /// The `network` value, if any
    pub fn network(&self) -> Option<&str> {
        match self {
            Transport::None => None,
            Transport::Tcp => Some("tcp"),
            Transport::Ws(_) => Some("ws"),
            Transport::Http(_) => Some("http"),
            Transport::H2(_) => Some("h2"),
            Transport::Grpc(_) => Some("grpc"),
            Transport::Other(network) => Some(network.as_str()),
        }
    }

    /// The `Host` header carried by the transport.
    ///
    /// Only ws and http transports carry one; http keeps a list and the first
    /// entry wins. gRPC service names are never treated as a host.
    pub fn host_header(&self) -> Option<&str> {
        match self {
            Transport::Ws(ws) => ws.headers.get("Host").map(String::as_str),
            Transport::Http(http) => http
                .headers
                .get("Host")
                .and_then(|hosts| hosts.first())
                .map(String::as_str),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Transport::None)
    }
}

// ============================================================================
// Option Records
// ============================================================================

/// WebSocket transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct WsOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub max_early_data: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_data_header_name: Option<String>,
}

/// HTTP/1.1 transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct HttpOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub path: Vec<String>,

    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "header_lists"
    )]
    pub headers: BTreeMap<String, Vec<String>>,
}

/// HTTP/2 transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct H2Opts {
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub host: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// gRPC transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GrpcOpts {
    #[serde(
        default,
        rename = "grpc-service-name",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_name: Option<String>,

    /// Internal transport sub-kind (`gun`, `multi`, ...)
    #[serde(default, rename = "_grpc-type", skip_serializing_if = "Option::is_none")]
    pub grpc_type: Option<String>,
}

fn header_lists<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let raw = BTreeMap::<String, OneOrMany>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| match value {
            OneOrMany::One(v) => (name, vec![v]),
            OneOrMany::Many(v) => (name, v),
        })
        .collect())
}

// ============================================================================
// Wire Representation
// ============================================================================

#[derive(Serialize, Deserialize, Default)]
struct TransportRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    network: Option<String>,

    #[serde(default, rename = "ws-opts", skip_serializing_if = "Option::is_none")]
    ws_opts: Option<WsOpts>,

    #[serde(default, rename = "http-opts", skip_serializing_if = "Option::is_none")]
    http_opts: Option<HttpOpts>,

    #[serde(default, rename = "h2-opts", skip_serializing_if = "Option::is_none")]
    h2_opts: Option<H2Opts>,

    #[serde(default, rename = "grpc-opts", skip_serializing_if = "Option::is_none")]
    grpc_opts: Option<GrpcOpts>,
}

impl TryFrom<TransportRepr> for Transport {
    type Error = ParseError;

    fn try_from(repr: TransportRepr) -> Result<Self, Self::Error> {
        let Some(network) = repr.network else {
            return Ok(Transport::None);
        };
        match network.as_str() {
            "tcp" => Ok(Transport::Tcp),
            "ws" => Ok(Transport::Ws(repr.ws_opts.unwrap_or_default())),
            "http" => Ok(Transport::Http(repr.http_opts.unwrap_or_default())),
            "h2" => Ok(Transport::H2(repr.h2_opts.unwrap_or_default())),
            "grpc" => Ok(Transport::Grpc(repr.grpc_opts.unwrap_or_default())),
            _ => Ok(Transport::Other(network)),
        }
    }
}

fn non_default<T: Default + PartialEq>(value: T) -> Option<T> {
    (value != T::default()).then_some(value)
}

impl From<Transport> for TransportRepr {
    fn from(transport: Transport) -> Self {
        let network = transport.network().map(str::to_string);
        let mut repr = TransportRepr {
            network,
            ..Default::default()
        };
        match transport {
            Transport::None | Transport::Tcp | Transport::Other(_) => {}
            Transport::Ws(opts) => repr.ws_opts = non_default(opts),
            Transport::Http(opts) => repr.http_opts = non_default(opts),
            Transport::H2(opts) => repr.h2_opts = non_default(opts),
            Transport::Grpc(opts) => repr.grpc_opts = non_default(opts),
        }
        repr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Holder {
        name: String,
        #[serde(flatten)]
        transport: Transport,
    }

    #[test]
    fn test_ws_round_trip_shape() {
        let mut headers = BTreeMap::new();
        headers.insert("Host".to_string(), "cdn.example.com".to_string());
        let holder = Holder {
            name: "n".to_string(),
            transport: Transport::Ws(WsOpts {
                path: Some("/ray".to_string()),
                headers,
                ..Default::default()
            }),
        };
        let value = serde_json::to_value(&holder).unwrap();
        assert_eq!(
            value,
            json!({"name": "n", "network": "ws", "ws-opts": {"path": "/ray", "headers": {"Host": "cdn.example.com"}}})
        );
    }

    #[test]
    fn test_empty_opts_are_omitted() {
        let holder = Holder {
            name: "n".to_string(),
            transport: Transport::Grpc(GrpcOpts::default()),
        };
        let value = serde_json::to_value(&holder).unwrap();
        assert_eq!(value, json!({"name": "n", "network": "grpc"}));
    }

    #[test]
    fn test_no_network_no_keys() {
        let holder = Holder {
            name: "n".to_string(),
            transport: Transport::None,
        };
        assert_eq!(serde_json::to_value(&holder).unwrap(), json!({"name": "n"}));
    }

    #[test]
    fn test_foreign_opts_are_dropped() {
        let holder: Holder = serde_json::from_value(json!({
            "name": "n",
            "network": "grpc",
            "ws-opts": {"path": "/stale"},
            "grpc-opts": {"grpc-service-name": "svc"}
        }))
        .unwrap();
        assert_eq!(
            holder.transport,
            Transport::Grpc(GrpcOpts {
                service_name: Some("svc".to_string()),
                grpc_type: None,
            })
        );
    }

    #[test]
    fn test_http_opts_accept_scalar_headers() {
        let holder: Holder = serde_json::from_value(json!({
            "name": "n",
            "network": "http",
            "http-opts": {"path": "/", "headers": {"Host": "a.example.com"}}
        }))
        .unwrap();
        assert_eq!(holder.transport.host_header(), Some("a.example.com"));
    }

    #[test]
    fn test_unknown_network_kept() {
        let holder: Holder =
            serde_json::from_value(json!({"name": "n", "network": "xhttp"})).unwrap();
        assert_eq!(holder.transport, Transport::Other("xhttp".to_string()));
        assert_eq!(holder.transport.host_header(), None);
        assert_eq!(
            serde_json::to_value(&holder).unwrap(),
            json!({"name": "n", "network": "xhttp"})
        );
    }

    #[test]
    fn test_grpc_has_no_host_header() {
        let transport = Transport::Grpc(GrpcOpts {
            service_name: Some("svc.example.com".to_string()),
            grpc_type: Some("gun".to_string()),
        });
        assert_eq!(transport.host_header(), None);
    }
}
