//! Line grammars supplied from outside the registry
//!
//! Surge, Loon and Quantumult X lines (and the body of trojan links) are
//! decoded by full grammars. The registry only detects those lines and hands
//! them to the grammar registered for their client family.

use std::sync::Arc;

use tracing::trace;
use url::{Host, Url};

use crate::error::{GrammarError, ParseError, Result};
use crate::proxy::{Proxy, ProxyType, TlsFields, Transport, TrojanProxy};

use super::canonical::{TransportParts, build_transport, infer_sni};
use super::helpers::{default_name, get_if_not_blank, is_truthy, percent_decode};
use super::protocols::split_list;

// ============================================================================
// Grammar Trait
// ============================================================================

/// Decodes a whole config line into a proxy record
pub trait LineGrammar: Send + Sync {
    fn decode(&self, line: &str) -> std::result::Result<Proxy, GrammarError>;
}

impl<F> LineGrammar for F
where
    F: Fn(&str) -> std::result::Result<Proxy, GrammarError> + Send + Sync,
{
    fn decode(&self, line: &str) -> std::result::Result<Proxy, GrammarError> {
        self(line)
    }
}

// ============================================================================
// Grammar Set
// ============================================================================

/// Grammars injected into [`ProxyRegistry`](super::ProxyRegistry) at construction
///
/// A client family without a grammar still has its lines detected; decoding
/// them fails with [`ParseError::GrammarUnavailable`].
#[derive(Clone)]
pub struct GrammarSet {
    pub surge: Option<Arc<dyn LineGrammar>>,
    pub loon: Option<Arc<dyn LineGrammar>>,
    pub qx: Option<Arc<dyn LineGrammar>>,
    pub trojan: Arc<dyn LineGrammar>,
}

impl Default for GrammarSet {
    fn default() -> Self {
        Self {
            surge: None,
            loon: None,
            qx: None,
            trojan: Arc::new(TrojanUriGrammar),
        }
    }
}

impl GrammarSet {
    pub fn with_surge(mut self, grammar: Arc<dyn LineGrammar>) -> Self {
        self.surge = Some(grammar);
        self
    }

    pub fn with_loon(mut self, grammar: Arc<dyn LineGrammar>) -> Self {
        self.loon = Some(grammar);
        self
    }

    pub fn with_qx(mut self, grammar: Arc<dyn LineGrammar>) -> Self {
        self.qx = Some(grammar);
        self
    }

    pub fn with_trojan(mut self, grammar: Arc<dyn LineGrammar>) -> Self {
        self.trojan = grammar;
        self
    }
}

// ============================================================================
// Trojan URI Grammar
// ============================================================================

const TROJAN: &str = "trojan";

/// Default grammar for `trojan://password@host:port?params#tag`
pub struct TrojanUriGrammar;

impl TrojanUriGrammar {
    pub fn parse(&self, line: &str) -> Result<Proxy> {
        trace!("Parsing Trojan URI");
        let url = Url::parse(line.trim())
            .map_err(|e| ParseError::malformed(TROJAN, format!("failed to parse URI: {}", e)))?;
        if url.scheme() != TROJAN {
            return Err(ParseError::malformed(TROJAN, "missing trojan:// prefix"));
        }

        // the whole userinfo is the password, colons included
        let userinfo = match url.password() {
            Some(rest) => format!("{}:{}", url.username(), rest),
            None => url.username().to_string(),
        };
        let password = percent_decode(&userinfo);
        if password.is_empty() {
            return Err(ParseError::malformed(TROJAN, "missing password"));
        }

        let server = match url.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => return Err(ParseError::malformed(TROJAN, "missing host")),
        };
        let port = url
            .port()
            .ok_or_else(|| ParseError::malformed(TROJAN, "missing port"))?;

        let params: std::collections::HashMap<String, String> =
            url.query_pairs().into_owned().collect();
        let get = |key: &str| params.get(key).map(String::as_str);

        let name = url
            .fragment()
            .map(percent_decode)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name(ProxyType::Trojan, &server, port));

        let mut tls = TlsFields {
            tls: true,
            sni: get_if_not_blank(get("sni")).or_else(|| get_if_not_blank(get("peer"))),
            alpn: get("alpn").map(split_list).unwrap_or_default(),
            client_fingerprint: get_if_not_blank(get("fp")),
            skip_cert_verify: get("allowInsecure").map(|v| is_truthy(Some(v))),
            ..Default::default()
        };

        let transport = match get("type").filter(|t| !t.is_empty()) {
            None | Some("tcp") => Transport::None,
            Some(network) => build_transport(
                network,
                TransportParts {
                    path: get_if_not_blank(get("path")),
                    service_name: get_if_not_blank(get("serviceName")),
                    ..Default::default()
                }
                .with_host(get_if_not_blank(get("host"))),
            )?,
        };
        infer_sni(&mut tls, &transport);

        Ok(Proxy::Trojan(TrojanProxy {
            name,
            server,
            port,
            password,
            tls,
            transport,
            ..Default::default()
        }))
    }
}

impl LineGrammar for TrojanUriGrammar {
    fn decode(&self, line: &str) -> std::result::Result<Proxy, GrammarError> {
        self.parse(line).map_err(Into::into)
    }
}
