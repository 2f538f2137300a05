//! Trojan protocol parser
//!
//! This module detects Trojan (trojan://) URIs and hands the link body to
//! the configured trojan grammar.
//! Format: trojan://password@host:port?params#tag

use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::{ClientFormat, ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::grammar::LineGrammar;
use crate::parser::helpers::try_percent_decode;
use crate::proxy::Proxy;

// ============================================================================
// Trojan Parser
// ============================================================================

/// Parser for Trojan (trojan://) URIs
///
/// The tag after `#` is decoded here; the rest of the link goes to the
/// grammar.
pub struct TrojanParser {
    grammar: Arc<dyn LineGrammar>,
}

impl TrojanParser {
    pub fn new(grammar: Arc<dyn LineGrammar>) -> Self {
        Self { grammar }
    }
}

impl ProxyParser for TrojanParser {
    fn name(&self) -> &str {
        "URI Trojan Parser"
    }

    fn test(&self, line: &str) -> bool {
        line.starts_with("trojan://")
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        let line = line.trim();
        let (link, tag) = match line.split_once('#') {
            Some((link, tag)) if !tag.is_empty() => (link, Some(tag)),
            Some((link, _)) => (link, None),
            None => (line, None),
        };
        trace!("Decoding Trojan link with grammar");

        let mut proxy = self
            .grammar
            .decode(link)
            .map_err(|source| ParseError::Grammar {
                format: ClientFormat::TrojanUri,
                source,
            })?;

        if let Some(tag) = tag {
            match try_percent_decode(tag) {
                Ok(name) if !name.is_empty() => proxy.set_name(name),
                Ok(_) => {}
                Err(e) => warn!("Keeping Trojan name, failed to decode tag {:?}: {}", tag, e),
            }
        }

        Ok(proxy)
    }
}
