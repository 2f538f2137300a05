//! Descriptors that hand a detected line to an injected grammar.

use std::sync::Arc;

use tracing::trace;

use crate::error::{ClientFormat, ParseError, Result};
use crate::parser::ProxyParser;
use crate::parser::grammar::LineGrammar;
use crate::proxy::Proxy;

/// Detects one line type and forwards the whole line to the grammar of its
/// client family
pub struct DelegatedParser {
    name: &'static str,
    format: ClientFormat,
    detector: fn(&str) -> bool,
    grammar: Option<Arc<dyn LineGrammar>>,
}

impl DelegatedParser {
    pub fn new(
        name: &'static str,
        format: ClientFormat,
        detector: fn(&str) -> bool,
        grammar: Option<Arc<dyn LineGrammar>>,
    ) -> Self {
        Self {
            name,
            format,
            detector,
            grammar,
        }
    }
}

impl ProxyParser for DelegatedParser {
    fn name(&self) -> &str {
        self.name
    }

    fn test(&self, line: &str) -> bool {
        (self.detector)(line)
    }

    fn decode(&self, line: &str) -> Result<Proxy> {
        let grammar = self
            .grammar
            .as_ref()
            .ok_or(ParseError::GrammarUnavailable(self.format))?;
        trace!("Delegating line to {} grammar", self.format);
        grammar.decode(line).map_err(|source| ParseError::Grammar {
            format: self.format,
            source,
        })
    }
}
