//! Error taxonomy for node discovery.
//!
//! Only registry retrieval and parsing fail. An unreachable node is a normal
//! probe outcome and never surfaces here.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by discovery operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The registry page could not be retrieved.
    #[error("failed to fetch node registry: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The registry page was retrieved but its table could not be parsed.
    #[error("failed to parse node registry: {0}")]
    Parse(#[from] ParseError),

    /// There were no candidates to probe.
    #[error("no bootstrap node candidates available")]
    NoCandidates,
}

/// Errors produced while turning registry markup into nodes.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The page has no node table anchor.
    #[error("node table marker not found in registry page")]
    MissingTable,

    /// The node table exists but has no cells.
    #[error("node table contains no cells")]
    EmptyTable,

    /// The cell count does not divide into whole rows.
    #[error("node table has {fields} cells, not a multiple of {columns} columns")]
    FieldCount { fields: usize, columns: usize },

    /// A port cell is not a 16-bit unsigned integer.
    #[error("invalid port {value:?}")]
    Port {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A key cell is not an even-length hex string.
    #[error("invalid public key {value:?}")]
    Key {
        value: String,
        #[source]
        source: hex::FromHexError,
    },
}

impl Error {
    /// Whether this error came from the registry contents rather than transport.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_messages() {
        let err = Error::from(ParseError::FieldCount {
            fields: 13,
            columns: 7,
        });
        assert!(err.is_parse());
        assert_eq!(
            err.to_string(),
            "failed to parse node registry: node table has 13 cells, not a multiple of 7 columns"
        );

        let source = "x".parse::<u16>().unwrap_err();
        let port = ParseError::Port {
            value: "x".to_string(),
            source,
        };
        assert_eq!(port.to_string(), "invalid port \"x\"");
        assert!(std::error::Error::source(&port).is_some());
        assert!(!Error::NoCandidates.is_parse());
    }
}
