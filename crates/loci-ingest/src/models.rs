// Locus score record models

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// ============================================================================
// Score entry
// ============================================================================

/// One structural score attached to a genomic interval
///
/// Residue bounds stay as text; they are not coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: f64,
    pub pdb_id: String,
    pub pdb_chain: String,
    pub uniprot_feature_name: String,
    pub pdb_residue_min: String,
    pub pdb_residue_max: String,
}

// ============================================================================
// Locus annotation
// ============================================================================

/// Source-tagged part of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocusAnnotation {
    /// Chromosome with every `chr` occurrence removed (e.g. "1", "X")
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    /// Exactly one entry when emitted by the parser; the aggregation sink
    /// appends entries of same-id records here when it merges them.
    pub scores: Vec<ScoreEntry>,
}

// ============================================================================
// Locus record
// ============================================================================

/// A normalized record keyed by its genomic identifier
///
/// Serializes as `{"_id": <id>, "<source>": <annotation>}`, the document shape
/// the aggregation sink indexes on.
#[derive(Debug, Clone, PartialEq)]
pub struct LocusRecord {
    /// `chr{chrom}:g.{start}_{end}`
    pub id: String,
    /// Source tag the annotation is nested under
    pub source: String,
    pub annotation: LocusAnnotation,
}

impl LocusRecord {
    /// Build a record, deriving its id from the annotation's coordinates
    pub fn new(source: impl Into<String>, annotation: LocusAnnotation) -> Self {
        let id = Self::derive_id(&annotation.chrom, annotation.start, annotation.end);
        LocusRecord {
            id,
            source: source.into(),
            annotation,
        }
    }

    /// Genomic identifier for an interval
    /// Example: ("1", 100, 200) -> "chr1:g.100_200"
    pub fn derive_id(chrom: &str, start: i64, end: i64) -> String {
        format!("chr{}:g.{}_{}", chrom, start, end)
    }

    /// The single score entry a freshly parsed record carries
    pub fn score(&self) -> Option<&ScoreEntry> {
        self.annotation.scores.first()
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for LocusRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("_id", &self.id)?;
        map.serialize_entry(&self.source, &self.annotation)?;
        map.end()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn annotation() -> LocusAnnotation {
        LocusAnnotation {
            chrom: "1".to_string(),
            start: 100,
            end: 200,
            scores: vec![ScoreEntry {
                score: 0.5,
                pdb_id: "PDB1".to_string(),
                pdb_chain: "A".to_string(),
                uniprot_feature_name: "featX".to_string(),
                pdb_residue_min: "10".to_string(),
                pdb_residue_max: "20".to_string(),
            }],
        }
    }

    #[test]
    fn test_derive_id() {
        assert_eq!(LocusRecord::derive_id("1", 100, 200), "chr1:g.100_200");
        assert_eq!(LocusRecord::derive_id("X", 5, 5), "chrX:g.5_5");
    }

    #[test]
    fn test_new_derives_id_from_coordinates() {
        let record = LocusRecord::new("3dts", annotation());
        assert_eq!(record.id, "chr1:g.100_200");
        assert_eq!(record.score().map(|s| s.score), Some(0.5));
    }

    #[test]
    fn test_serializes_under_source_tag() {
        let record = LocusRecord::new("3dts", annotation());
        let value = record.to_json().unwrap();

        assert_eq!(
            value,
            json!({
                "_id": "chr1:g.100_200",
                "3dts": {
                    "chrom": "1",
                    "start": 100,
                    "end": 200,
                    "scores": [{
                        "score": 0.5,
                        "pdb_id": "PDB1",
                        "pdb_chain": "A",
                        "uniprot_feature_name": "featX",
                        "pdb_residue_min": "10",
                        "pdb_residue_max": "20"
                    }]
                }
            })
        );
    }

    #[test]
    fn test_source_tag_is_configurable() {
        let record = LocusRecord::new("loci_v2", annotation());
        let value = record.to_json().unwrap();
        assert!(value.get("loci_v2").is_some());
        assert!(value.get("3dts").is_none());
    }
}
