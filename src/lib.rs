pub mod cli;
pub mod error;
pub mod parser;
pub mod proxy;

pub use error::{ClientFormat, GrammarError, ParseError};
pub use parser::{GrammarSet, LineGrammar, ProxyParser, ProxyRegistry};
pub use proxy::{Proxy, ProxyType};
