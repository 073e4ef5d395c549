//! Parser configuration
//!
//! Everything the transformer needs to know about its input is carried in a
//! [`ParserConfig`] value handed to it at construction.

use loci_common::{LociError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Version string of the 3DTS data plugin these records are produced for
pub const DATA_VERSION: &str = "v5";

/// Number of tab-separated columns in a locus score line
pub const FIELD_COUNT: usize = 9;

/// Configuration for reading a locus score file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Source tag under which each record's annotation is nested (e.g. "3dts")
    pub source_name: String,

    /// Name of the input file inside the data folder
    pub file_name: String,

    /// Field delimiter
    pub delimiter: char,

    /// Log a progress line every N lines read
    pub progress_interval: usize,

    /// Log every skipped raw line once the input is exhausted
    pub log_skipped_lines: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            source_name: "3dts".to_string(),
            file_name: "3dts_loci_scores.sorted.tsv".to_string(),
            delimiter: '\t',
            progress_interval: 10_000,
            log_skipped_lines: true,
        }
    }
}

impl ParserConfig {
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::default()
    }

    /// Full path of the input file inside `data_folder`
    pub fn input_path(&self, data_folder: impl AsRef<Path>) -> PathBuf {
        data_folder.as_ref().join(&self.file_name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_name.trim().is_empty() {
            return Err(LociError::Config("Source name cannot be empty".to_string()));
        }

        if self.file_name.trim().is_empty() {
            return Err(LociError::Config("File name cannot be empty".to_string()));
        }

        if self.progress_interval == 0 {
            return Err(LociError::Config(
                "Progress interval must be greater than 0".to_string(),
            ));
        }

        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(LociError::Config(
                "Delimiter cannot be a line terminator".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ParserConfig
#[derive(Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.config.source_name = name.into();
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.config.progress_interval = interval;
        self
    }

    pub fn log_skipped_lines(mut self, enabled: bool) -> Self {
        self.config.log_skipped_lines = enabled;
        self
    }

    pub fn build(self) -> ParserConfig {
        self.config
    }
}
