//! ShadowsocksR protocol parser
//!
//! Format: ssr://BASE64(server:port:protocol:cipher:obfs:BASE64(password)/?params)

use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::base64::decode_base64_str;
use crate::parser::helpers::{default_name, parse_port};
use crate::proxy::{Proxy, ProxyType, SsrProxy};

use super::strip_scheme;

const FORMAT: &str = "ssr";

/// Parser for ShadowsocksR (ssr://) URIs
pub struct ShadowsocksRParser;

impl ProxyParser for ShadowsocksRParser {
    fn name(&self) -> &str {
        "URI SSR Parser"
    }

    fn test(&self, line: &str) -> bool {
        line.starts_with("ssr://")
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        trace!("Parsing ShadowsocksR URI");
        let encoded = strip_scheme(line.trim(), &["ssr"])
            .ok_or_else(|| ParseError::malformed(FORMAT, "missing ssr:// prefix"))?;
        let decoded = decode_base64_str(encoded)?;

        // The server may be an IPv6 literal, so split on the protocol marker
        // rather than on the first colon.
        let split_idx = decoded
            .find(":origin")
            .or_else(|| decoded.find(":auth_"))
            .ok_or_else(|| ParseError::malformed(FORMAT, "unrecognized protocol"))?;

        let server_and_port = &decoded[..split_idx];
        let (server, port) = server_and_port
            .rsplit_once(':')
            .ok_or_else(|| ParseError::malformed(FORMAT, "missing port"))?;
        let port = parse_port(FORMAT, port)?;
        let server = server.to_string();

        let rest = &decoded[split_idx + 1..];
        let (params_part, query) = match rest.split_once("/?") {
            Some((params, query)) => (params, Some(query)),
            None => (rest.trim_end_matches('/'), None),
        };

        let params: Vec<&str> = params_part.split(':').collect();
        let [protocol, cipher, obfs, password] = params.as_slice() else {
            return Err(ParseError::malformed(
                FORMAT,
                format!("expected protocol:cipher:obfs:password, got {} fields", params.len()),
            ));
        };
        let password = decode_base64_str(password)?;

        let mut proxy = SsrProxy {
            server,
            port,
            cipher: cipher.to_string(),
            password,
            protocol: protocol.to_string(),
            obfs: obfs.to_string(),
            ..Default::default()
        };

        let mut remarks = None;
        for pair in query.unwrap_or_default().split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "remarks" => remarks = Some(decode_base64_str(value)?),
                "protoparam" => proxy.protocol_param = decode_param(value)?,
                "obfsparam" => proxy.obfs_param = decode_param(value)?,
                other => trace!("Ignoring SSR parameter: {}", other),
            }
        }

        proxy.name = remarks
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| default_name(ProxyType::Ssr, &proxy.server, proxy.port));

        Ok(Proxy::Ssr(proxy))
    }
}

/// Base64-decodes a parameter and strips whitespace; blank results are absent
fn decode_param(value: &str) -> Result<Option<String>> {
    let decoded: String = decode_base64_str(value)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    Ok(Some(decoded).filter(|d| !d.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn encode(s: &str) -> String {
        URL_SAFE_NO_PAD.encode(s)
    }

    fn parse_ssr(uri: &str) -> SsrProxy {
        match ShadowsocksRParser.decode(uri).unwrap() {
            Proxy::Ssr(ssr) => ssr,
            other => panic!("Expected ShadowsocksR proxy, got {:?}", other),
        }
    }

    #[test]
    fn test_ssr_basic() {
        let body = format!(
            "1.2.3.4:8388:auth_aes128_md5:aes-256-cfb:tls1.2_ticket_auth:{}/?remarks={}&protoparam={}&obfsparam={}",
            encode("secret"),
            encode("My SSR"),
            encode("100:abc"),
            encode(" cdn.example.com "),
        );
        let ssr = parse_ssr(&format!("ssr://{}", encode(&body)));
        assert_eq!(ssr.name, "My SSR");
        assert_eq!(ssr.server, "1.2.3.4");
        assert_eq!(ssr.port, 8388);
        assert_eq!(ssr.protocol, "auth_aes128_md5");
        assert_eq!(ssr.cipher, "aes-256-cfb");
        assert_eq!(ssr.obfs, "tls1.2_ticket_auth");
        assert_eq!(ssr.password, "secret");
        assert_eq!(ssr.protocol_param.as_deref(), Some("100:abc"));
        assert_eq!(ssr.obfs_param.as_deref(), Some("cdn.example.com"));
    }

    #[test]
    fn test_ssr_ipv6_and_origin() {
        let body = format!("2001:db8::1:443:origin:chacha20:plain:{}", encode("pwd"));
        let ssr = parse_ssr(&format!("ssr://{}", encode(&body)));
        assert_eq!(ssr.server, "2001:db8::1");
        assert_eq!(ssr.port, 443);
        assert_eq!(ssr.protocol, "origin");
        assert_eq!(ssr.name, "SSR 2001:db8::1:443");
        assert!(ssr.protocol_param.is_none());
    }

    #[test]
    fn test_ssr_blank_params_absent() {
        let body = format!(
            "example.com:443:origin:none:plain:{}/?obfsparam={}&protoparam=",
            encode("pwd"),
            encode("   "),
        );
        let ssr = parse_ssr(&format!("ssr://{}", encode(&body)));
        assert!(ssr.obfs_param.is_none());
        assert!(ssr.protocol_param.is_none());
    }

    #[test]
    fn test_ssr_unknown_protocol() {
        let body = format!("example.com:443:foo:none:plain:{}", encode("pwd"));
        let err = ShadowsocksRParser
            .decode(&format!("ssr://{}", encode(&body)))
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { format: "ssr", .. }));
    }
}
