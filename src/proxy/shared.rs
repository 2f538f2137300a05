//! Field groups shared across several proxy variants.
//!
//! Each group is flattened into the variants that need it, the same way the
//! record types keep one definition of the TLS and bookkeeping knobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::util::{deserialize_option_u32, is_false, string_or_vec};

/// Keys a record carries that no typed field models, kept as written.
///
/// Flattened last into a record so the typed fields and groups before it
/// claim their keys first.
pub type Extra = BTreeMap<String, serde_json::Value>;

// ============================================================================
// Common Fields
// ============================================================================

/// Fields every proxy record may carry regardless of protocol
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CommonFields {
    /// Relay UDP through the proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp: Option<bool>,

    /// TCP fast open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfo: Option<bool>,

    /// Health-check URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_url: Option<String>,

    /// Health-check timeout in milliseconds
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub test_timeout: Option<u32>,
}

// ============================================================================
// TLS Fields
// ============================================================================

/// TLS knobs for protocols that run over (or may run over) TLS
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct TlsFields {
    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,

    /// Server name indication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,

    /// ALPN protocols, in preference order
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "string_or_vec"
    )]
    pub alpn: Vec<String>,

    /// uTLS client hello fingerprint (chrome, firefox, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_cert_verify: Option<bool>,

    /// Pinned certificate fingerprint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_fingerprint: Option<String>,
}

// ============================================================================
// Protocol Sub-records
// ============================================================================

/// Reality options for VLESS
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RealityOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl RealityOpts {
    pub fn is_empty(&self) -> bool {
        self.public_key.is_none() && self.short_id.is_none() && self.extra.is_empty()
    }
}

/// WireGuard reserved bytes, either as raw numbers or an encoded string
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reserved {
    Bytes(Vec<u8>),
    Encoded(String),
}

/// A single WireGuard peer
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct WireGuardPeer {
    pub server: String,

    #[serde(deserialize_with = "super::util::deserialize_port")]
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_shared_key: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_ips: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<Reserved>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Snell obfuscation options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SnellObfsOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}
