//! Decoding errors.

use std::fmt;

use thiserror::Error;

/// Error returned by an external grammar-based decoder
pub type GrammarError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Client family whose line grammar is supplied from outside the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientFormat {
    Surge,
    Loon,
    QuantumultX,
    TrojanUri,
}

impl fmt::Display for ClientFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientFormat::Surge => write!(f, "Surge"),
            ClientFormat::Loon => write!(f, "Loon"),
            ClientFormat::QuantumultX => write!(f, "Quantumult X"),
            ClientFormat::TrojanUri => write!(f, "trojan URI"),
        }
    }
}

/// Failure to turn one line into a proxy record
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no parser recognizes this line")]
    NoMatchingFormat,

    #[error("malformed {format} input: {reason}")]
    MalformedInput {
        format: &'static str,
        reason: String,
    },

    #[error("unsupported plugin: {0}")]
    UnsupportedPlugin(String),

    #[error("unsupported {option}: {value}")]
    UnsupportedOption { option: String, value: String },

    #[error("unsupported proxy type: {0}")]
    UnsupportedType(String),

    #[error("no {0} grammar configured")]
    GrammarUnavailable(ClientFormat),

    #[error("{format} syntax error: {source}")]
    Grammar {
        format: ClientFormat,
        #[source]
        source: GrammarError,
    },
}

impl ParseError {
    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        ParseError::MalformedInput {
            format,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_option(option: impl Into<String>, value: impl Into<String>) -> Self {
        ParseError::UnsupportedOption {
            option: option.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
