//! Canonical proxy record
//!
//! Every decoder, whatever notation it reads, converges on [`Proxy`]: a closed
//! tagged enum with one variant per protocol. Its serde form is the flat,
//! kebab-case object used by Clash-family clients, with `type` as the
//! discriminant.

pub mod plugin;
pub mod shared;
pub mod transport;
pub mod util;

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub use plugin::{ObfsPluginOpts, ShadowTlsPluginOpts, SsPlugin, V2rayPluginOpts};
pub use shared::{
    CommonFields, Extra, RealityOpts, Reserved, SnellObfsOpts, TlsFields, WireGuardPeer,
};
pub use transport::{GrpcOpts, H2Opts, HttpOpts, Transport, WsOpts};

use util::{deserialize_option_u32, deserialize_port, is_false};

// ============================================================================
// Proxy Enum
// ============================================================================

/// A proxy definition in canonical form
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Proxy {
    #[serde(rename = "ss")]
    Ss(SsProxy),
    #[serde(rename = "ssr")]
    Ssr(SsrProxy),
    #[serde(rename = "vmess")]
    Vmess(VmessProxy),
    #[serde(rename = "vless")]
    Vless(VlessProxy),
    #[serde(rename = "trojan")]
    Trojan(TrojanProxy),
    #[serde(rename = "hysteria")]
    Hysteria(HysteriaProxy),
    #[serde(rename = "hysteria2")]
    Hysteria2(Hysteria2Proxy),
    #[serde(rename = "tuic")]
    Tuic(TuicProxy),
    #[serde(rename = "wireguard")]
    WireGuard(WireGuardProxy),
    #[serde(rename = "external")]
    External(ExternalProxy),
    #[serde(rename = "socks5")]
    Socks5(Socks5Proxy),
    #[serde(rename = "http")]
    Http(HttpProxy),
    #[serde(rename = "snell")]
    Snell(SnellProxy),
    #[serde(rename = "ssh")]
    Ssh(SshProxy),
}

macro_rules! each_variant {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Proxy::Ss($inner) => $body,
            Proxy::Ssr($inner) => $body,
            Proxy::Vmess($inner) => $body,
            Proxy::Vless($inner) => $body,
            Proxy::Trojan($inner) => $body,
            Proxy::Hysteria($inner) => $body,
            Proxy::Hysteria2($inner) => $body,
            Proxy::Tuic($inner) => $body,
            Proxy::WireGuard($inner) => $body,
            Proxy::External($inner) => $body,
            Proxy::Socks5($inner) => $body,
            Proxy::Http($inner) => $body,
            Proxy::Snell($inner) => $body,
            Proxy::Ssh($inner) => $body,
        }
    };
}

impl Proxy {
    /// The protocol discriminant
    pub fn kind(&self) -> ProxyType {
        match self {
            Proxy::Ss(_) => ProxyType::Ss,
            Proxy::Ssr(_) => ProxyType::Ssr,
            Proxy::Vmess(_) => ProxyType::Vmess,
            Proxy::Vless(_) => ProxyType::Vless,
            Proxy::Trojan(_) => ProxyType::Trojan,
            Proxy::Hysteria(_) => ProxyType::Hysteria,
            Proxy::Hysteria2(_) => ProxyType::Hysteria2,
            Proxy::Tuic(_) => ProxyType::Tuic,
            Proxy::WireGuard(_) => ProxyType::WireGuard,
            Proxy::External(_) => ProxyType::External,
            Proxy::Socks5(_) => ProxyType::Socks5,
            Proxy::Http(_) => ProxyType::Http,
            Proxy::Snell(_) => ProxyType::Snell,
            Proxy::Ssh(_) => ProxyType::Ssh,
        }
    }

    pub fn name(&self) -> &str {
        each_variant!(self, p => p.name.as_str())
    }

    pub fn set_name(&mut self, name: String) {
        each_variant!(self, p => p.name = name)
    }

    pub fn common(&self) -> &CommonFields {
        each_variant!(self, p => &p.common)
    }

    pub fn common_mut(&mut self) -> &mut CommonFields {
        each_variant!(self, p => &mut p.common)
    }

    /// Server address; external proxies have none
    pub fn server(&self) -> Option<&str> {
        match self {
            Proxy::External(_) => None,
            Proxy::Ss(p) => Some(&p.server),
            Proxy::Ssr(p) => Some(&p.server),
            Proxy::Vmess(p) => Some(&p.server),
            Proxy::Vless(p) => Some(&p.server),
            Proxy::Trojan(p) => Some(&p.server),
            Proxy::Hysteria(p) => Some(&p.server),
            Proxy::Hysteria2(p) => Some(&p.server),
            Proxy::Tuic(p) => Some(&p.server),
            Proxy::WireGuard(p) => Some(&p.server),
            Proxy::Socks5(p) => Some(&p.server),
            Proxy::Http(p) => Some(&p.server),
            Proxy::Snell(p) => Some(&p.server),
            Proxy::Ssh(p) => Some(&p.server),
        }
    }

    /// Server port; external proxies have none
    pub fn port(&self) -> Option<u16> {
        match self {
            Proxy::External(_) => None,
            Proxy::Ss(p) => Some(p.port),
            Proxy::Ssr(p) => Some(p.port),
            Proxy::Vmess(p) => Some(p.port),
            Proxy::Vless(p) => Some(p.port),
            Proxy::Trojan(p) => Some(p.port),
            Proxy::Hysteria(p) => Some(p.port),
            Proxy::Hysteria2(p) => Some(p.port),
            Proxy::Tuic(p) => Some(p.port),
            Proxy::WireGuard(p) => Some(p.port),
            Proxy::Socks5(p) => Some(p.port),
            Proxy::Http(p) => Some(p.port),
            Proxy::Snell(p) => Some(p.port),
            Proxy::Ssh(p) => Some(p.port),
        }
    }

    /// TLS fields, for protocols that have them
    pub fn tls(&self) -> Option<&TlsFields> {
        match self {
            Proxy::Vmess(p) => Some(&p.tls),
            Proxy::Vless(p) => Some(&p.tls),
            Proxy::Trojan(p) => Some(&p.tls),
            Proxy::Hysteria(p) => Some(&p.tls),
            Proxy::Hysteria2(p) => Some(&p.tls),
            Proxy::Tuic(p) => Some(&p.tls),
            Proxy::Socks5(p) => Some(&p.tls),
            Proxy::Http(p) => Some(&p.tls),
            _ => None,
        }
    }

    pub fn tls_mut(&mut self) -> Option<&mut TlsFields> {
        match self {
            Proxy::Vmess(p) => Some(&mut p.tls),
            Proxy::Vless(p) => Some(&mut p.tls),
            Proxy::Trojan(p) => Some(&mut p.tls),
            Proxy::Hysteria(p) => Some(&mut p.tls),
            Proxy::Hysteria2(p) => Some(&mut p.tls),
            Proxy::Tuic(p) => Some(&mut p.tls),
            Proxy::Socks5(p) => Some(&mut p.tls),
            Proxy::Http(p) => Some(&mut p.tls),
            _ => None,
        }
    }

    /// Transport, for protocols that have one
    pub fn transport(&self) -> Option<&Transport> {
        match self {
            Proxy::Vmess(p) => Some(&p.transport),
            Proxy::Vless(p) => Some(&p.transport),
            Proxy::Trojan(p) => Some(&p.transport),
            _ => None,
        }
    }
}

// ============================================================================
// Proxy Type
// ============================================================================

/// Protocol discriminant of a [`Proxy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    Ss,
    Ssr,
    Vmess,
    Vless,
    Trojan,
    Hysteria,
    Hysteria2,
    Tuic,
    WireGuard,
    External,
    Socks5,
    Http,
    Snell,
    Ssh,
}

impl ProxyType {
    pub const ALL: [ProxyType; 14] = [
        ProxyType::Ss,
        ProxyType::Ssr,
        ProxyType::Vmess,
        ProxyType::Vless,
        ProxyType::Trojan,
        ProxyType::Hysteria,
        ProxyType::Hysteria2,
        ProxyType::Tuic,
        ProxyType::WireGuard,
        ProxyType::External,
        ProxyType::Socks5,
        ProxyType::Http,
        ProxyType::Snell,
        ProxyType::Ssh,
    ];

    /// The `type` discriminant string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyType::Ss => "ss",
            ProxyType::Ssr => "ssr",
            ProxyType::Vmess => "vmess",
            ProxyType::Vless => "vless",
            ProxyType::Trojan => "trojan",
            ProxyType::Hysteria => "hysteria",
            ProxyType::Hysteria2 => "hysteria2",
            ProxyType::Tuic => "tuic",
            ProxyType::WireGuard => "wireguard",
            ProxyType::External => "external",
            ProxyType::Socks5 => "socks5",
            ProxyType::Http => "http",
            ProxyType::Snell => "snell",
            ProxyType::Ssh => "ssh",
        }
    }

    /// Human label used when a record has to make up its own name
    pub fn label(&self) -> &'static str {
        match self {
            ProxyType::Ss => "SS",
            ProxyType::Ssr => "SSR",
            ProxyType::Vmess => "VMess",
            ProxyType::Vless => "VLESS",
            ProxyType::Trojan => "Trojan",
            ProxyType::Hysteria => "Hysteria",
            ProxyType::Hysteria2 => "Hysteria2",
            ProxyType::Tuic => "TUIC",
            ProxyType::WireGuard => "WireGuard",
            ProxyType::External => "External",
            ProxyType::Socks5 => "SOCKS5",
            ProxyType::Http => "HTTP",
            ProxyType::Snell => "Snell",
            ProxyType::Ssh => "SSH",
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProxyType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError::UnsupportedType(s.to_string()))
    }
}

// ============================================================================
// Protocol Records
// ============================================================================

/// Shadowsocks
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SsProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub cipher: String,
    #[serde(default)]
    pub password: String,
    #[serde(flatten)]
    pub plugin: SsPlugin,
    #[serde(default, skip_serializing_if = "is_false")]
    pub udp_over_tcp: bool,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// ShadowsocksR
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SsrProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub cipher: String,
    #[serde(default)]
    pub password: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_param: Option<String>,
    pub obfs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs_param: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// VMess
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct VmessProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub uuid: String,
    #[serde(default = "default_vmess_cipher")]
    pub cipher: String,
    #[serde(
        default,
        rename = "alterId",
        deserialize_with = "deserialize_option_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub alter_id: Option<u32>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub transport: Transport,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

fn default_vmess_cipher() -> String {
    "auto".to_string()
}

/// VLESS
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct VlessProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality_opts: Option<RealityOpts>,
    #[serde(flatten)]
    pub transport: Transport,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Trojan
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TrojanProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub password: String,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub transport: Transport,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Hysteria (v1)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct HysteriaProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_str: Option<String>,
    /// Port hopping range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    /// `udp`, `wechat-video` or `faketcp`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Obfuscation password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,
    /// Obfuscation mode (empty or `xplus`)
    #[serde(default, rename = "_obfs", skip_serializing_if = "Option::is_none")]
    pub obfs_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_open: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub recv_window_conn: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub recv_window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_mtu_discovery: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_interval: Option<String>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Hysteria2
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Hysteria2Proxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// TUIC (v4 token or v5 uuid/password)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TuicProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(
        default,
        alias = "congestion-control",
        skip_serializing_if = "Option::is_none"
    )]
    pub congestion_controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_relay_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_sni: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce_rtt: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub heartbeat_interval: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub request_timeout: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub max_udp_relay_packet_size: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub version: Option<u32>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// WireGuard
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WireGuardProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preshared_key: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub mtu: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub keepalive: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<Reserved>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_ips: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub remote_dns_resolve: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<WireGuardPeer>,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Surge external proxy program
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ExternalProxy {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_port: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<IpAddr>,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// SOCKS5
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Socks5Proxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// HTTP(S) CONNECT
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct HttpProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Snell
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SnellProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    pub psk: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_u32"
    )]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs_opts: Option<SnellObfsOpts>,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// SSH
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SshProxy {
    #[serde(default)]
    pub name: String,
    pub server: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_passphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_key: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_key_algorithms: Vec<String>,
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub extra: Extra,
}
