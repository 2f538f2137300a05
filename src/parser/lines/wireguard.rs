//! Loon WireGuard lines
//!
//! ```text
//! WG = wireguard, interface-ip=10.0.0.2, interface-ipv6=fd00::2, private-key="k=",
//!      mtu=1280, dns=1.1.1.1, dnsv6=2606:4700:4700::1111, keepalive=45,
//!      peers=[{public-key="p=", allowed-ips="0.0.0.0/0,::/0", endpoint=1.2.3.4:51820,
//!              preshared-key="s=", reserved=[1,2,3]}]
//! ```

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::fields::{find_value, split_fields, strip_delimiters, type_token};
use crate::parser::helpers::{get_if_not_blank, parse_host_port};
use crate::proxy::{Proxy, Reserved, WireGuardPeer, WireGuardProxy};

use super::detect;

const FORMAT: &str = "wireguard";

/// Parser for Loon WireGuard lines (single peer)
pub struct LoonWireGuardParser;

impl ProxyParser for LoonWireGuardParser {
    fn name(&self) -> &str {
        "Loon WireGuard Parser"
    }

    fn test(&self, line: &str) -> bool {
        detect::loon_wireguard(line)
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        trace!("Parsing Loon WireGuard line");
        let line = line.trim();
        let (name, kind) =
            type_token(line).ok_or_else(|| ParseError::malformed(FORMAT, "missing name"))?;
        if kind != "wireguard" {
            return Err(ParseError::malformed(FORMAT, format!("unexpected type {:?}", kind)));
        }

        let fields = split_fields(line);
        let fields = &fields[1..];
        let value = |key: &str| get_if_not_blank(find_value(fields, key));

        let peer_block = find_value(fields, "peers")
            .and_then(|peers| strip_delimiters(peers, '[', ']'))
            .and_then(|peers| split_fields(peers).into_iter().next())
            .and_then(|peer| strip_delimiters(peer, '{', '}'))
            .ok_or_else(|| ParseError::malformed(FORMAT, "missing peers block"))?;
        let peer_fields = split_fields(peer_block);
        let peer_value = |key: &str| get_if_not_blank(find_value(&peer_fields, key));

        let endpoint =
            peer_value("endpoint").ok_or_else(|| ParseError::malformed(FORMAT, "missing endpoint"))?;
        let (server, port) = parse_host_port(FORMAT, &endpoint)?;

        let allowed_ips: Vec<String> = peer_value("allowed-ips")
            .map(|ips| {
                ips.split(',')
                    .map(str::trim)
                    .filter(|ip| !ip.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let reserved = peer_value("reserved")
            .map(|raw| {
                serde_json::from_str::<Vec<u8>>(&raw)
                    .map(Reserved::Bytes)
                    .map_err(|e| ParseError::malformed(FORMAT, format!("invalid reserved: {}", e)))
            })
            .transpose()?;

        let ip = value("interface-ip");
        let ipv6 = value("interface-ipv6");
        let public_key = peer_value("public-key");
        let preshared_key = peer_value("preshared-key");
        let dns: Vec<String> = [value("dns"), value("dnsv6")].into_iter().flatten().collect();

        let peer = WireGuardPeer {
            server: server.clone(),
            port,
            ip: ip.clone(),
            ipv6: ipv6.clone(),
            public_key: public_key.clone(),
            pre_shared_key: preshared_key.clone(),
            allowed_ips: allowed_ips.clone(),
            reserved: reserved.clone(),
            ..Default::default()
        };

        let mut proxy = WireGuardProxy {
            name: name.to_string(),
            server,
            port,
            ip,
            ipv6,
            private_key: value("private-key"),
            public_key,
            preshared_key,
            mtu: value("mtu").and_then(|v| v.parse().ok()),
            keepalive: value("keepalive").and_then(|v| v.parse().ok()),
            reserved,
            allowed_ips,
            remote_dns_resolve: !dns.is_empty(),
            dns,
            peers: vec![peer],
            ..Default::default()
        };
        proxy.common.udp = Some(true);

        Ok(Proxy::WireGuard(proxy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"WG Node = wireguard, interface-ip=10.0.0.2, interface-ipv6=fd00::2, private-key="cHJpdmF0ZQ==", mtu=1280, dns=1.1.1.1, dnsv6=2606:4700:4700::1111, keepalive=45, peers=[{public-key="cHVibGlj", allowed-ips="0.0.0.0/0, ::/0", endpoint=engage.example.com:2408, preshared-key="cHNr", reserved=[1,2,3]}]"#;

    fn parse_wg(line: &str) -> WireGuardProxy {
        match LoonWireGuardParser.decode(line).unwrap() {
            Proxy::WireGuard(wg) => wg,
            other => panic!("Expected WireGuard proxy, got {:?}", other),
        }
    }

    #[test]
    fn test_loon_wireguard_fields() {
        let wg = parse_wg(LINE);
        assert_eq!(wg.name, "WG Node");
        assert_eq!(wg.server, "engage.example.com");
        assert_eq!(wg.port, 2408);
        assert_eq!(wg.ip.as_deref(), Some("10.0.0.2"));
        assert_eq!(wg.ipv6.as_deref(), Some("fd00::2"));
        assert_eq!(wg.private_key.as_deref(), Some("cHJpdmF0ZQ=="));
        assert_eq!(wg.public_key.as_deref(), Some("cHVibGlj"));
        assert_eq!(wg.preshared_key.as_deref(), Some("cHNr"));
        assert_eq!(wg.mtu, Some(1280));
        assert_eq!(wg.keepalive, Some(45));
        assert_eq!(wg.allowed_ips, vec!["0.0.0.0/0", "::/0"]);
        assert_eq!(wg.reserved, Some(Reserved::Bytes(vec![1, 2, 3])));
        assert_eq!(wg.dns, vec!["1.1.1.1", "2606:4700:4700::1111"]);
        assert!(wg.remote_dns_resolve);
        assert_eq!(wg.common.udp, Some(true));
    }

    #[test]
    fn test_loon_wireguard_single_peer_mirrors_fields() {
        let wg = parse_wg(LINE);
        assert_eq!(wg.peers.len(), 1);
        let peer = &wg.peers[0];
        assert_eq!(peer.server, wg.server);
        assert_eq!(peer.port, wg.port);
        assert_eq!(peer.ip, wg.ip);
        assert_eq!(peer.ipv6, wg.ipv6);
        assert_eq!(peer.public_key, wg.public_key);
        assert_eq!(peer.pre_shared_key, wg.preshared_key);
        assert_eq!(peer.allowed_ips, wg.allowed_ips);
        assert_eq!(peer.reserved, wg.reserved);
    }

    #[test]
    fn test_loon_wireguard_ipv6_endpoint_without_dns() {
        let wg = parse_wg(
            r#"v6 = wireguard, private-key="k", peers=[{endpoint=[2001:db8::1]:51820, public-key="p"}]"#,
        );
        assert_eq!(wg.server, "2001:db8::1");
        assert_eq!(wg.port, 51820);
        assert!(wg.dns.is_empty());
        assert!(!wg.remote_dns_resolve);
    }

    #[test]
    fn test_loon_wireguard_missing_endpoint() {
        let err = LoonWireGuardParser
            .decode(r#"wg = wireguard, private-key="k", peers=[{public-key="p"}]"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { format: "wireguard", .. }));
    }

    #[test]
    fn test_loon_wireguard_bad_reserved() {
        let err = LoonWireGuardParser
            .decode(r#"wg = wireguard, peers=[{endpoint=1.2.3.4:1, reserved=[1,2,999]}]"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { .. }));
    }
}
