//! Protocol URI parsers
//!
//! Each parser recognizes its scheme strictly by prefix and decodes the link
//! into a canonical [`Proxy`](crate::proxy::Proxy) record.

mod hysteria;
mod hysteria2;
mod shadowsocks;
mod shadowsocksr;
mod trojan;
mod tuic;
mod vless;
mod vmess;

pub use hysteria::HysteriaParser;
pub use hysteria2::Hysteria2Parser;
pub use shadowsocks::ShadowsocksParser;
pub use shadowsocksr::ShadowsocksRParser;
pub use trojan::TrojanParser;
pub use tuic::TuicParser;
pub use vless::VLessParser;
pub use vmess::VMessParser;

use std::sync::Arc;

use super::ProxyParser;
use super::grammar::GrammarSet;

/// URI parsers in dispatch order
pub fn uri_parsers(grammars: &GrammarSet) -> Vec<Arc<dyn ProxyParser>> {
    vec![
        Arc::new(ShadowsocksParser),
        Arc::new(ShadowsocksRParser),
        Arc::new(VMessParser),
        Arc::new(VLessParser),
        Arc::new(TuicParser),
        Arc::new(HysteriaParser),
        Arc::new(Hysteria2Parser),
        Arc::new(TrojanParser::new(grammars.trojan.clone())),
    ]
}

/// Strips the first matching `scheme://` prefix
pub(crate) fn strip_scheme<'a>(line: &'a str, schemes: &[&str]) -> Option<&'a str> {
    schemes.iter().find_map(|scheme| {
        line.strip_prefix(scheme)
            .and_then(|rest| rest.strip_prefix("://"))
    })
}

/// Normalizes `snake_case` query keys to `kebab-case`
pub(crate) fn kebab_key(key: &str) -> String {
    key.replace('_', "-")
}

/// Splits a comma separated list, dropping empty items
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("hy2://abc", &["hysteria2", "hy2"]), Some("abc"));
        assert_eq!(strip_scheme("hysteria2://abc", &["hysteria2", "hy2"]), Some("abc"));
        assert_eq!(strip_scheme("hysteria2://abc", &["hysteria", "hy"]), None);
        assert_eq!(strip_scheme("ss:/abc", &["ss"]), None);
    }

    #[test]
    fn test_kebab_key() {
        assert_eq!(kebab_key("udp_relay_mode"), "udp-relay-mode");
        assert_eq!(kebab_key("sni"), "sni");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("h3, h2,,"), vec!["h3", "h2"]);
        assert!(split_list("").is_empty());
    }
}
