//! Error taxonomy
//!
//! Two kinds: input errors (bad NDJSON, unreadable files) and
//! algorithmic-precondition errors (the sign algebra fell through,
//! which indicates a logic bug rather than bad input). Nothing else
//! surfaces — every other operation in the core is a total function
//! over well-typed `Node`s.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomClusterError>;

#[derive(Debug, Error)]
pub enum DomClusterError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed entry on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("sign algebra has no rule for combining {a:?} and {b:?}")]
    SignAlgebra { a: crate::node::Sign, b: crate::node::Sign },
}
