//! Proxy line classification and decoding
//!
//! This module provides:
//! - The [`ProxyParser`] descriptor trait (detector + decoder for one format)
//! - [`ProxyRegistry`], an ordered list of descriptors where the first
//!   positive detector wins
//! - Decoders for proxy URIs (ss://, ssr://, vmess://, vless://, trojan://,
//!   hysteria://, hysteria2://, tuic://), Surge / Loon / Quantumult X config
//!   lines and pass-through JSON records

pub mod base64;
pub mod canonical;
pub mod fields;
pub mod grammar;
pub mod helpers;
pub mod lines;
pub mod passthrough;
pub mod protocols;

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::{ParseError, Result};
use crate::proxy::Proxy;

pub use grammar::{GrammarSet, LineGrammar, TrojanUriGrammar};

// ============================================================================
// Parser Descriptor Trait
// ============================================================================

/// One input format: a cheap detector plus its decoder
pub trait ProxyParser: Send + Sync {
    /// Human-readable parser name (e.g. "URI SS Parser")
    fn name(&self) -> &str;

    /// Checks if this parser recognizes the line
    fn test(&self, line: &str) -> bool;

    /// Decodes the line into a canonical proxy record
    fn decode(&self, line: &str) -> Result<Proxy>;
}

// ============================================================================
// Proxy Registry
// ============================================================================

/// Ordered registry of proxy parsers
///
/// Detectors are tried in registration order; the first match decodes the
/// line. There is no fallback to later parsers when decoding fails.
#[derive(Default, Clone)]
pub struct ProxyRegistry {
    parsers: Vec<Arc<dyn ProxyParser>>,
}

impl ProxyRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Creates a registry with every built-in parser and the default grammars
    /// (trojan URI only; Surge / Loon / QX lines fail with
    /// [`ParseError::GrammarUnavailable`]).
    pub fn with_builtin_parsers() -> Self {
        Self::with_grammars(GrammarSet::default())
    }

    /// Creates a registry with every built-in parser, delegating client
    /// config lines to the given grammars
    pub fn with_grammars(grammars: GrammarSet) -> Self {
        let mut registry = Self::new();
        for parser in protocols::uri_parsers(&grammars) {
            registry.register(parser);
        }
        registry.register(Arc::new(passthrough::PassthroughParser));
        for parser in lines::surge_parsers(&grammars) {
            registry.register(parser);
        }
        for parser in lines::loon_parsers(&grammars) {
            registry.register(parser);
        }
        for parser in lines::qx_parsers(&grammars) {
            registry.register(parser);
        }
        registry
    }

    /// Appends a parser; it is tried after every parser registered before it
    pub fn register(&mut self, parser: Arc<dyn ProxyParser>) {
        self.parsers.push(parser);
    }

    /// Names of the registered parsers, in dispatch order
    pub fn names(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Returns the first parser whose detector accepts the line
    pub fn classify(&self, line: &str) -> Option<&dyn ProxyParser> {
        self.parsers
            .iter()
            .find(|p| p.test(line))
            .map(|p| p.as_ref())
    }

    /// Classifies a line and decodes it with the first matching parser
    pub fn parse_line(&self, line: &str) -> Result<Proxy> {
        let parser = self.classify(line).ok_or(ParseError::NoMatchingFormat)?;
        debug!("Parsing line with {}", parser.name());

        let result = parser.decode(line);
        match &result {
            Ok(proxy) => {
                debug!(
                    "Successfully parsed {} line -> {} proxy '{}'",
                    parser.name(),
                    proxy.kind(),
                    proxy.name()
                );
            }
            Err(e) => {
                debug!("Failed to parse line with {}: {}", parser.name(), e);
            }
        }
        result
    }

    /// Parses multiple lines (one proxy per line)
    ///
    /// Blank lines and `#` comments are skipped; every other line yields one
    /// result, in input order.
    pub fn parse_lines(&self, content: &str) -> Vec<Result<Proxy>> {
        let lines: Vec<&str> = content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        debug!("Parsing {} proxy lines from content", lines.len());

        lines.into_iter().map(|line| self.parse_line(line)).collect()
    }

    /// Parses multiple lines, collecting only successful results
    pub fn parse_lines_lossy(&self, content: &str) -> Vec<Proxy> {
        let results = self.parse_lines(content);
        let total = results.len();

        let proxies: Vec<Proxy> = results
            .into_iter()
            .filter_map(|r| match r {
                Ok(proxy) => Some(proxy),
                Err(e) => {
                    warn!("Failed to parse proxy line: {}", e);
                    None
                }
            })
            .collect();

        let success = proxies.len();
        trace!("Lossy parse kept {} of {} lines", success, total);
        debug!(
            "Proxy list parsing complete: {} total, {} successful, {} failed",
            total,
            success,
            total - success
        );

        proxies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::{ProxyType, SsProxy};

    struct Always(&'static str);

    impl ProxyParser for Always {
        fn name(&self) -> &str {
            self.0
        }

        fn test(&self, _line: &str) -> bool {
            true
        }

        fn decode(&self, _line: &str) -> Result<Proxy> {
            Ok(Proxy::Ss(SsProxy {
                name: self.0.to_string(),
                server: "1.1.1.1".to_string(),
                port: 1,
                cipher: "none".to_string(),
                ..Default::default()
            }))
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = ProxyRegistry::new();
        assert!(registry.names().is_empty());
        assert!(matches!(
            registry.parse_line("ss://abc"),
            Err(ParseError::NoMatchingFormat)
        ));
    }

    #[test]
    fn test_first_registered_wins() {
        let mut registry = ProxyRegistry::new();
        registry.register(Arc::new(Always("first")));
        registry.register(Arc::new(Always("second")));
        let proxy = registry.parse_line("anything").unwrap();
        assert_eq!(proxy.name(), "first");
        assert_eq!(registry.classify("anything").unwrap().name(), "first");
    }

    #[test]
    fn test_builtin_order() {
        let registry = ProxyRegistry::with_builtin_parsers();
        let names = registry.names();
        assert_eq!(names.len(), 35);
        assert_eq!(names[0], "URI SS Parser");
        assert_eq!(names[7], "URI Trojan Parser");
        assert_eq!(names[8], "Passthrough Parser");
        assert_eq!(names[9], "Surge SSH Parser");
        assert_eq!(names[34], "QX SOCKS5 Parser");
    }

    #[test]
    fn test_parse_lines_skips_blank_and_comments() {
        let registry = ProxyRegistry::new();
        let results = registry.parse_lines("\n\n# comment\n  \n");
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_lines_lossy_drops_failures() {
        let registry = ProxyRegistry::with_builtin_parsers();
        let content = "ss://YWVzLTEyOC1nY206cGFzc3dvcmQ@1.2.3.4:8388#A\nnot a proxy\nhysteria2://pwd@host#B";
        let results = registry.parse_lines(content);
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());

        let proxies = registry.parse_lines_lossy(content);
        assert_eq!(proxies.len(), 2);
        assert_eq!(proxies[0].kind(), ProxyType::Ss);
        assert_eq!(proxies[1].kind(), ProxyType::Hysteria2);
    }
}
