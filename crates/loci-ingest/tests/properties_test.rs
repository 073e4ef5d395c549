//! Property tests for line accounting and record identity

use loci_ingest::{LineOutcome, LineParser, LocusRecords, ParserConfig};
use proptest::prelude::*;
use std::io::Cursor;

fn valid_line() -> impl Strategy<Value = (String, String, i64, i64)> {
    (
        prop_oneof![Just("chr".to_string()), Just(String::new())],
        "[0-9XYM]{1,2}",
        0i64..1_000_000_000,
        0i64..1_000_000_000,
        -10.0f64..10.0,
    )
        .prop_map(|(prefix, chrom, start, end, score)| {
            let line = format!(
                "{}{}\t{}\t{}\t{}\tPDB1\tA\tfeatX\t10\t20",
                prefix, chrom, start, end, score
            );
            (line, chrom, start, end)
        })
}

fn any_line() -> impl Strategy<Value = String> {
    prop_oneof![
        valid_line().prop_map(|(line, ..)| line),
        Just(String::new()),
        "#[a-z ]{0,20}",
        "[a-z0-9]{1,8}(\t[a-z0-9]{1,8}){0,11}",
    ]
}

proptest! {
    #[test]
    fn test_valid_lines_produce_derived_id((line, chrom, start, end) in valid_line()) {
        let parser = LineParser::new(&ParserConfig::default());
        match parser.classify(&line) {
            LineOutcome::Valid(record) => {
                prop_assert_eq!(record.id, format!("chr{}:g.{}_{}", chrom, start, end));
                prop_assert_eq!(record.annotation.scores.len(), 1);
            },
            LineOutcome::Skipped(reason) => prop_assert!(false, "skipped: {}", reason),
        }
    }

    #[test]
    fn test_emitted_plus_skipped_equals_lines(lines in prop::collection::vec(any_line(), 0..60)) {
        let input: String = lines.iter().map(|line| format!("{}\n", line)).collect();

        let mut records = LocusRecords::new(
            Cursor::new(input.into_bytes()),
            &ParserConfig::default(),
        );
        let emitted = records.by_ref().filter(|r| r.is_ok()).count();
        let summary = records.into_summary();

        prop_assert_eq!(summary.lines_read, lines.len());
        prop_assert_eq!(emitted + summary.skip_count(), lines.len());
    }

    #[test]
    fn test_wrong_field_count_never_emits(count in 1usize..20) {
        prop_assume!(count != 9);
        let line = vec!["1"; count].join("\t");
        let parser = LineParser::new(&ParserConfig::default());
        let outcome = parser.classify(&line);
        prop_assert_eq!(
            outcome.skip_reason().map(|r| r.as_str()),
            Some("field-count-mismatch")
        );
    }
}
