//! Surge, Loon and Quantumult X config lines
//!
//! Most line types are detected here and decoded by the injected grammar of
//! their client family. Loon WireGuard and Surge External lines have small
//! local decoders.
//!
//! Detection reads the type token (`name = type, ...`) for Surge and Loon and
//! the leading key (`type=host:port, ...`) for Quantumult X. Types shared by
//! Surge and Loon are told apart by markers so that no well-formed line is
//! claimed by two parsers.

mod delegated;
mod external;
mod wireguard;

pub use delegated::DelegatedParser;
pub use external::SurgeExternalParser;
pub use wireguard::LoonWireGuardParser;

use std::sync::Arc;

use crate::error::ClientFormat;

use super::ProxyParser;
use super::fields::{key_value, split_fields, type_token};
use super::grammar::GrammarSet;

type Detector = fn(&str) -> bool;

fn delegated(
    name: &'static str,
    format: ClientFormat,
    detector: Detector,
    grammars: &GrammarSet,
) -> Arc<dyn ProxyParser> {
    let grammar = match format {
        ClientFormat::Surge => grammars.surge.clone(),
        ClientFormat::Loon => grammars.loon.clone(),
        ClientFormat::QuantumultX => grammars.qx.clone(),
        ClientFormat::TrojanUri => Some(grammars.trojan.clone()),
    };
    Arc::new(DelegatedParser::new(name, format, detector, grammar))
}

/// Surge parsers in dispatch order
pub fn surge_parsers(grammars: &GrammarSet) -> Vec<Arc<dyn ProxyParser>> {
    let surge = |name: &'static str, detector: Detector| {
        delegated(name, ClientFormat::Surge, detector, grammars)
    };
    vec![
        surge("Surge SSH Parser", detect::surge_ssh),
        surge("Surge SS Parser", detect::surge_ss),
        surge("Surge VMess Parser", detect::surge_vmess),
        surge("Surge Trojan Parser", detect::surge_trojan),
        surge("Surge HTTP Parser", detect::surge_http),
        surge("Surge Snell Parser", detect::surge_snell),
        surge("Surge TUIC Parser", detect::surge_tuic),
        surge("Surge WireGuard Parser", detect::surge_wireguard),
        surge("Surge Hysteria2 Parser", detect::surge_hysteria2),
        surge("Surge SOCKS5 Parser", detect::surge_socks5),
        Arc::new(SurgeExternalParser),
    ]
}

/// Loon parsers in dispatch order
pub fn loon_parsers(grammars: &GrammarSet) -> Vec<Arc<dyn ProxyParser>> {
    let loon = |name: &'static str, detector: Detector| {
        delegated(name, ClientFormat::Loon, detector, grammars)
    };
    vec![
        loon("Loon SS Parser", detect::loon_ss),
        loon("Loon SSR Parser", detect::loon_ssr),
        loon("Loon VMess Parser", detect::loon_vmess),
        loon("Loon VLESS Parser", detect::loon_vless),
        loon("Loon Hysteria2 Parser", detect::loon_hysteria2),
        loon("Loon Trojan Parser", detect::loon_trojan),
        loon("Loon HTTP Parser", detect::loon_http),
        Arc::new(LoonWireGuardParser),
    ]
}

/// Quantumult X parsers in dispatch order
pub fn qx_parsers(grammars: &GrammarSet) -> Vec<Arc<dyn ProxyParser>> {
    let qx = |name: &'static str, detector: Detector| {
        delegated(name, ClientFormat::QuantumultX, detector, grammars)
    };
    vec![
        qx("QX SS Parser", detect::qx_ss),
        qx("QX SSR Parser", detect::qx_ssr),
        qx("QX VMess Parser", detect::qx_vmess),
        qx("QX VLESS Parser", detect::qx_vless),
        qx("QX Trojan Parser", detect::qx_trojan),
        qx("QX HTTP Parser", detect::qx_http),
        qx("QX SOCKS5 Parser", detect::qx_socks5),
    ]
}

// ============================================================================
// Detectors
// ============================================================================

pub(crate) mod detect {
    use super::*;

    fn kind(line: &str) -> Option<String> {
        type_token(line.trim()).map(|(_, kind)| kind)
    }

    fn is_kind(line: &str, kinds: &[&str]) -> bool {
        kind(line).is_some_and(|k| kinds.contains(&k.as_str()))
    }

    fn has_key(line: &str, key: &str) -> bool {
        split_fields(line)
            .iter()
            .skip(1)
            .filter_map(|field| key_value(field))
            .any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    /// Loon writes passwords as a quoted positional field after the port
    fn is_loon_style(line: &str) -> bool {
        split_fields(line)
            .iter()
            .skip(3)
            .any(|field| field.starts_with('"'))
    }

    pub fn surge_ssh(line: &str) -> bool {
        is_kind(line, &["ssh"])
    }

    pub fn surge_ss(line: &str) -> bool {
        is_kind(line, &["ss"])
    }

    pub fn surge_vmess(line: &str) -> bool {
        is_kind(line, &["vmess"]) && has_key(line, "username")
    }

    pub fn surge_trojan(line: &str) -> bool {
        is_kind(line, &["trojan"]) && !is_loon_style(line)
    }

    pub fn surge_http(line: &str) -> bool {
        is_kind(line, &["http", "https"]) && !is_loon_style(line)
    }

    pub fn surge_snell(line: &str) -> bool {
        is_kind(line, &["snell"])
    }

    pub fn surge_tuic(line: &str) -> bool {
        is_kind(line, &["tuic", "tuic-v5"])
    }

    pub fn surge_wireguard(line: &str) -> bool {
        is_kind(line, &["wireguard"]) && has_key(line, "section-name")
    }

    pub fn surge_hysteria2(line: &str) -> bool {
        is_kind(line, &["hysteria2"]) && !is_loon_style(line)
    }

    pub fn surge_socks5(line: &str) -> bool {
        is_kind(line, &["socks5", "socks5-tls"])
    }

    pub fn surge_external(line: &str) -> bool {
        is_kind(line, &["external"])
    }

    pub fn loon_ss(line: &str) -> bool {
        is_kind(line, &["shadowsocks"])
    }

    pub fn loon_ssr(line: &str) -> bool {
        is_kind(line, &["shadowsocksr"])
    }

    pub fn loon_vmess(line: &str) -> bool {
        is_kind(line, &["vmess"]) && !has_key(line, "username")
    }

    pub fn loon_vless(line: &str) -> bool {
        is_kind(line, &["vless"])
    }

    pub fn loon_hysteria2(line: &str) -> bool {
        is_kind(line, &["hysteria2"]) && is_loon_style(line)
    }

    pub fn loon_trojan(line: &str) -> bool {
        is_kind(line, &["trojan"]) && is_loon_style(line)
    }

    pub fn loon_http(line: &str) -> bool {
        is_kind(line, &["http", "https"]) && is_loon_style(line)
    }

    pub fn loon_wireguard(line: &str) -> bool {
        is_kind(line, &["wireguard"]) && has_key(line, "peers") && !has_key(line, "section-name")
    }

    /// `type=host:port, ...`; the value always carries a port, which tells it
    /// apart from a Surge/Loon proxy that happens to be named after a type
    fn qx_key(line: &str) -> Option<&str> {
        let first = line.trim().split(',').next()?;
        let (key, value) = key_value(first)?;
        value.contains(':').then_some(key)
    }

    pub fn qx_ss(line: &str) -> bool {
        qx_key(line) == Some("shadowsocks") && !has_key(line, "ssr-protocol")
    }

    pub fn qx_ssr(line: &str) -> bool {
        qx_key(line) == Some("shadowsocks") && has_key(line, "ssr-protocol")
    }

    pub fn qx_vmess(line: &str) -> bool {
        qx_key(line) == Some("vmess")
    }

    pub fn qx_vless(line: &str) -> bool {
        qx_key(line) == Some("vless")
    }

    pub fn qx_trojan(line: &str) -> bool {
        qx_key(line) == Some("trojan")
    }

    pub fn qx_http(line: &str) -> bool {
        qx_key(line) == Some("http")
    }

    pub fn qx_socks5(line: &str) -> bool {
        qx_key(line) == Some("socks5")
    }
}
