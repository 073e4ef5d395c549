// Locus score line parser
//
// Classifies a single raw line as a valid record or a skip with a reason.
// Nothing here fails: every malformed line becomes a `LineOutcome::Skipped`.

use crate::config::{ParserConfig, FIELD_COUNT};
use crate::models::{LocusAnnotation, LocusRecord, ScoreEntry};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Skip reasons
// ============================================================================

/// Why a line produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty after trimming, or starts with `#`
    CommentOrBlank,

    /// The trimmed line does not split into the expected number of fields
    FieldCountMismatch { expected: usize, actual: usize },

    /// A typed column could not be converted
    TypeCoercionFailure {
        field: &'static str,
        value: String,
        message: String,
    },
}

impl SkipReason {
    /// Stable kebab-case name of the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::CommentOrBlank => "comment-or-blank",
            SkipReason::FieldCountMismatch { .. } => "field-count-mismatch",
            SkipReason::TypeCoercionFailure { .. } => "type-coercion-failure",
        }
    }

    /// True for reasons worth a warning (anything but comments and blanks)
    pub fn is_error(&self) -> bool {
        !matches!(self, SkipReason::CommentOrBlank)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::CommentOrBlank => f.write_str(self.as_str()),
            SkipReason::FieldCountMismatch { expected, actual } => write!(
                f,
                "{}: expected {} fields, got {}",
                self.as_str(),
                expected,
                actual
            ),
            SkipReason::TypeCoercionFailure {
                field,
                value,
                message,
            } => write!(f, "{}: {} '{}': {}", self.as_str(), field, value, message),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Line outcome
// ============================================================================

/// Classification of one input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Valid(LocusRecord),
    Skipped(SkipReason),
}

impl LineOutcome {
    pub fn record(self) -> Option<LocusRecord> {
        match self {
            LineOutcome::Valid(record) => Some(record),
            LineOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            LineOutcome::Valid(_) => None,
            LineOutcome::Skipped(reason) => Some(reason),
        }
    }
}

// ============================================================================
// Line parser
// ============================================================================

/// Turns raw lines into [`LineOutcome`]s
///
/// Column layout (tab-delimited, 9 columns):
/// Column 1: chromosome (e.g. "chr1")
/// Column 2: start
/// Column 3: end
/// Column 4: score
/// Column 5: PDB id
/// Column 6: PDB chain
/// Column 7: UniProt feature name
/// Column 8: PDB residue range min
/// Column 9: PDB residue range max
#[derive(Debug, Clone)]
pub struct LineParser {
    source_name: String,
    delimiter: char,
}

impl LineParser {
    pub fn new(config: &ParserConfig) -> Self {
        LineParser {
            source_name: config.source_name.clone(),
            delimiter: config.delimiter,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Classify a single raw line (with or without its line terminator)
    pub fn classify(&self, line: &str) -> LineOutcome {
        match self.parse_line(line) {
            Ok(record) => LineOutcome::Valid(record),
            Err(reason) => LineOutcome::Skipped(reason),
        }
    }

    fn parse_line(&self, line: &str) -> Result<LocusRecord, SkipReason> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Err(SkipReason::CommentOrBlank);
        }

        let columns: Vec<&str> = line.split(self.delimiter).collect();
        let [chrom, start, end, score, pdb_id, pdb_chain, feature, residue_min, residue_max] =
            columns[..]
        else {
            return Err(SkipReason::FieldCountMismatch {
                expected: FIELD_COUNT,
                actual: columns.len(),
            });
        };

        let chrom = strip_chr(chrom);
        let start: i64 = coerce("start", start)?;
        let end: i64 = coerce("end", end)?;
        let score = coerce_finite("score", score)?;

        let annotation = LocusAnnotation {
            chrom,
            start,
            end,
            scores: vec![ScoreEntry {
                score,
                pdb_id: pdb_id.to_string(),
                pdb_chain: pdb_chain.to_string(),
                uniprot_feature_name: feature.to_string(),
                pdb_residue_min: residue_min.to_string(),
                pdb_residue_max: residue_max.to_string(),
            }],
        };

        Ok(LocusRecord::new(self.source_name.clone(), annotation))
    }
}

/// Remove every occurrence of "chr", not only a leading one
/// Example: "chr1" -> "1", "chrUn_chrX" -> "Un_X"
fn strip_chr(chrom: &str) -> String {
    chrom.replace("chr", "")
}

fn coerce<T>(field: &'static str, value: &str) -> Result<T, SkipReason>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| SkipReason::TypeCoercionFailure {
            field,
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Parse a decimal, rejecting NaN and infinities
fn coerce_finite(field: &'static str, value: &str) -> Result<f64, SkipReason> {
    let parsed: f64 = coerce(field, value)?;
    if !parsed.is_finite() {
        return Err(SkipReason::TypeCoercionFailure {
            field,
            value: value.to_string(),
            message: "value is not a finite number".to_string(),
        });
    }
    Ok(parsed)
}

// ============================================================================
// Tests
// ============================================================================
