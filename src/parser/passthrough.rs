//! Records that are already in canonical JSON form
//!
//! A line holding a JSON object is accepted as-is after its `type` is checked
//! and a few legacy field spellings are moved onto their current names. Keys
//! the record model has no field for are carried through untouched.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::canonical::infer_sni;
use crate::parser::helpers::default_name;
use crate::proxy::{Proxy, ProxyType};

/// Parser for single-line JSON proxy records
pub struct PassthroughParser;

impl PassthroughParser {
    fn object(line: &str) -> Option<Map<String, Value>> {
        let line = line.trim();
        if !line.starts_with('{') {
            return None;
        }
        match serde_json::from_str(line) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Moves `from` onto `to` when `from` holds a value. The old key is always removed.
fn rename(record: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = record.remove(from) {
        if is_set(&value) {
            record.insert(to.to_string(), value);
        }
    }
}

fn migrate_legacy_keys(kind: ProxyType, record: &mut Map<String, Value>) {
    if matches!(kind, ProxyType::Vmess | ProxyType::Vless) {
        rename(record, "servername", "sni");
    }
    rename(record, "fingerprint", "tls-fingerprint");
    rename(record, "benchmark-url", "test-url");
    rename(record, "benchmark-timeout", "test-timeout");
}

impl ProxyParser for PassthroughParser {
    fn name(&self) -> &str {
        "Passthrough Parser"
    }

    fn test(&self, line: &str) -> bool {
        Self::object(line).is_some()
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        let mut record = Self::object(line)
            .ok_or_else(|| ParseError::malformed("passthrough", "not a JSON object"))?;

        let kind = match record.get("type") {
            Some(Value::String(kind)) => ProxyType::from_str(kind)?,
            Some(other) => return Err(ParseError::UnsupportedType(other.to_string())),
            None => return Err(ParseError::malformed("passthrough", "missing type")),
        };
        trace!("Passthrough record of type {}", kind);
        migrate_legacy_keys(kind, &mut record);

        let mut proxy: Proxy = serde_json::from_value(Value::Object(record))
            .map_err(|e| ParseError::malformed("passthrough", e.to_string()))?;

        match &mut proxy {
            Proxy::Vmess(p) => infer_sni(&mut p.tls, &p.transport),
            Proxy::Vless(p) => infer_sni(&mut p.tls, &p.transport),
            _ => {}
        }

        if proxy.name().is_empty() {
            let name = match (proxy.server(), proxy.port()) {
                (Some(server), Some(port)) => default_name(kind, server, port),
                _ => kind.label().to_string(),
            };
            proxy.set_name(name);
        }

        Ok(proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detects_json_objects_only() {
        assert!(PassthroughParser.test(r#"{"type":"ss"}"#));
        assert!(PassthroughParser.test(r#"  {"type":"ss"}  "#));
        assert!(!PassthroughParser.test(r#"["ss"]"#));
        assert!(!PassthroughParser.test("{not json"));
        assert!(!PassthroughParser.test("ss://abc"));
    }

    #[test]
    fn test_unknown_type() {
        let err = PassthroughParser
            .decode(r#"{"type":"unknown-protocol","name":"x","server":"a","port":1}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedType(t) if t == "unknown-protocol"));
    }

    #[test]
    fn test_plain_ss_is_unchanged() {
        let record = json!({
            "type": "ss",
            "name": "MyNode",
            "server": "1.2.3.4",
            "port": 8388,
            "cipher": "aes-128-gcm",
            "password": "password",
            "udp": true
        });
        let proxy = PassthroughParser.decode(&record.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&proxy).unwrap(), record);
    }

    #[test]
    fn test_legacy_fields_migrated() {
        let line = json!({
            "type": "vmess",
            "name": "v",
            "server": "example.com",
            "port": 443,
            "uuid": "id",
            "cipher": "auto",
            "tls": true,
            "servername": "sni.example.com",
            "fingerprint": "AA:BB",
            "benchmark-url": "http://www.gstatic.com/generate_204",
            "benchmark-timeout": 5000
        })
        .to_string();
        let proxy = PassthroughParser.decode(&line).unwrap();
        let Proxy::Vmess(vmess) = &proxy else {
            panic!("Expected vmess proxy");
        };
        assert_eq!(vmess.tls.sni.as_deref(), Some("sni.example.com"));
        assert_eq!(vmess.tls.tls_fingerprint.as_deref(), Some("AA:BB"));
        assert_eq!(
            vmess.common.test_url.as_deref(),
            Some("http://www.gstatic.com/generate_204")
        );
        assert_eq!(vmess.common.test_timeout, Some(5000));

        let value = serde_json::to_value(&proxy).unwrap();
        for legacy in ["servername", "fingerprint", "benchmark-url", "benchmark-timeout"] {
            assert!(value.get(legacy).is_none(), "{} still present", legacy);
        }
    }

    #[test]
    fn test_fingerprint_renamed_for_any_type() {
        let line = json!({
            "type": "ss",
            "name": "s",
            "server": "1.2.3.4",
            "port": 8388,
            "cipher": "aes-128-gcm",
            "password": "pwd",
            "fingerprint": "chrome",
            "servername": "kept.example.com"
        })
        .to_string();
        let value = serde_json::to_value(PassthroughParser.decode(&line).unwrap()).unwrap();
        assert_eq!(value["tls-fingerprint"], "chrome");
        assert!(value.get("fingerprint").is_none());
        // servername is only a vmess/vless alias
        assert_eq!(value["servername"], "kept.example.com");
        assert!(value.get("sni").is_none());
    }

    #[test]
    fn test_unmodeled_keys_are_kept() {
        let record = json!({
            "type": "vless",
            "name": "l",
            "server": "example.com",
            "port": 443,
            "uuid": "id",
            "tls": true,
            "sni": "example.com",
            "packet-encoding": "xudp",
            "dialer-proxy": "relay",
            "ip-version": "ipv4-prefer",
            "smux": {"enabled": true, "protocol": "h2mux", "max-connections": 4}
        });
        let proxy = PassthroughParser.decode(&record.to_string()).unwrap();
        let Proxy::Vless(vless) = &proxy else {
            panic!("Expected vless proxy");
        };
        assert_eq!(vless.extra["packet-encoding"], "xudp");
        assert_eq!(serde_json::to_value(&proxy).unwrap(), record);
    }

    #[test]
    fn test_unknown_network_and_opts_pass_through() {
        let record = json!({
            "type": "vless",
            "name": "x",
            "server": "example.com",
            "port": 443,
            "uuid": "id",
            "tls": true,
            "sni": "example.com",
            "network": "xhttp",
            "xhttp-opts": {"path": "/up", "mode": "auto"}
        });
        let proxy = PassthroughParser.decode(&record.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&proxy).unwrap(), record);
    }

    #[test]
    fn test_unknown_plugin_passes_through() {
        let record = json!({
            "type": "ss",
            "name": "k",
            "server": "1.2.3.4",
            "port": 8388,
            "cipher": "aes-128-gcm",
            "password": "pwd",
            "plugin": "kcptun",
            "plugin-opts": {"mode": "fast", "key": "secret"}
        });
        let proxy = PassthroughParser.decode(&record.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&proxy).unwrap(), record);
    }

    #[test]
    fn test_vless_sni_inferred_from_ws_host() {
        let line = json!({
            "type": "vless",
            "name": "l",
            "server": "1.2.3.4",
            "port": 443,
            "uuid": "id",
            "tls": true,
            "network": "ws",
            "ws-opts": {"path": "/", "headers": {"Host": "cdn.example.com"}}
        })
        .to_string();
        let proxy = PassthroughParser.decode(&line).unwrap();
        assert_eq!(proxy.tls().unwrap().sni.as_deref(), Some("cdn.example.com"));
    }

    #[test]
    fn test_missing_name_gets_default() {
        let proxy = PassthroughParser
            .decode(r#"{"type":"socks5","server":"10.0.0.1","port":1080}"#)
            .unwrap();
        assert_eq!(proxy.name(), "SOCKS5 10.0.0.1:1080");
    }

    #[test]
    fn test_bad_record_is_malformed() {
        let err = PassthroughParser
            .decode(r#"{"type":"ss","server":"a"}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { format: "passthrough", .. }));
    }
}
