//! Error types for the loci ingestion tools

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for loci operations
pub type Result<T> = std::result::Result<T, LociError>;

/// Main error type shared by the workspace
///
/// Per-line problems in an input file are never reported through this type;
/// they are classified and skipped by the parser. Only run-level failures
/// surface here.
#[derive(Error, Debug)]
pub enum LociError {
    #[error("Cannot find input file: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Read error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Channel closed: {0}")]
    Channel(String),
}

impl LociError {
    /// True for the pre-flight "input missing" condition
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, LociError::InputNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_not_found_message_carries_path() {
        let err = LociError::InputNotFound(PathBuf::from("/data/3dts/loci.tsv"));
        assert_eq!(err.to_string(), "Cannot find input file: /data/3dts/loci.tsv");
        assert!(err.is_input_not_found());
    }

    #[test]
    fn test_read_error_names_line() {
        let err = LociError::Read {
            line: 42,
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8"),
        };
        assert_eq!(err.to_string(), "Read error at line 42: bad utf-8");
        assert!(!err.is_input_not_found());
    }
}
