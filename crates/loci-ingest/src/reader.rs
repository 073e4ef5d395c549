//! Streaming locus score reader
//!
//! [`LocusRecords`] is a pull-based iterator: each call to `next()` reads
//! lines until one yields a record or the input ends. Skipped lines are kept
//! in encounter order for the end-of-run report.

use crate::config::{ParserConfig, DATA_VERSION};
use crate::models::LocusRecord;
use crate::parser::{LineOutcome, LineParser, SkipReason};
use crate::progress::{ProgressSnapshot, ProgressTracker};
use flate2::read::MultiGzDecoder;
use loci_common::{LociError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Boxed line source, plain or gunzipped
pub type InputReader = Box<dyn BufRead + Send>;

// ============================================================================
// Input helpers
// ============================================================================

/// Fail with [`LociError::InputNotFound`] if `path` does not exist
pub fn check_input(path: &Path) -> Result<()> {
    if !path.exists() {
        let err = LociError::InputNotFound(path.to_path_buf());
        error!("{}", err);
        return Err(err);
    }
    Ok(())
}

/// Open `path` for line reading; `.gz` files are decompressed on the fly
pub fn open_input(path: &Path) -> Result<InputReader> {
    let file = File::open(path)?;
    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if is_gzip {
        debug!("Opening {} as gzip", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Count lines in `path` (a final line without a newline counts)
pub fn count_lines(path: &Path) -> Result<usize> {
    info!("start counting file lines");

    let mut reader = open_input(path)?;
    let mut buf = Vec::with_capacity(1024);
    let mut total = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        total += 1;
    }

    info!("total lines: {}", total);
    Ok(total)
}

// ============================================================================
// Run summary
// ============================================================================

/// A line that produced no record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number
    pub line_number: usize,
    pub reason: SkipReason,
    /// Raw line without its terminator
    pub raw: String,
}

/// Counts for a (possibly partial) run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseSummary {
    /// Lines consumed so far
    pub lines_read: usize,
    pub emitted: usize,
    pub skipped: Vec<SkippedLine>,
    /// Line count from the pre-pass, when one was made
    pub total_lines: Option<usize>,
}

impl ParseSummary {
    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }

    /// Number of skipped lines per reason name
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for line in &self.skipped {
            *counts.entry(line.reason.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// Record iterator
// ============================================================================

/// Lazy sequence of records read from a line source
pub struct LocusRecords<R: BufRead> {
    reader: R,
    parser: LineParser,
    line_buf: String,
    line_number: usize,
    emitted: usize,
    skipped: Vec<SkippedLine>,
    total_lines: Option<usize>,
    progress: Option<ProgressTracker>,
    last_progress: Option<ProgressSnapshot>,
    log_skipped_lines: bool,
    finished: bool,
}

impl<R: BufRead> LocusRecords<R> {
    pub fn new(reader: R, config: &ParserConfig) -> Self {
        LocusRecords {
            reader,
            parser: LineParser::new(config),
            line_buf: String::with_capacity(256),
            line_number: 0,
            emitted: 0,
            skipped: Vec::new(),
            total_lines: None,
            progress: None,
            last_progress: None,
            log_skipped_lines: config.log_skipped_lines,
            finished: false,
        }
    }

    /// Log progress milestones against a known line total
    pub fn with_progress(mut self, tracker: ProgressTracker) -> Self {
        self.total_lines = Some(tracker.total_lines());
        self.progress = Some(tracker);
        self
    }

    /// Also draw a terminal progress bar (requires [`Self::with_progress`])
    pub fn with_progress_bar(mut self) -> Self {
        self.progress = self.progress.take().map(ProgressTracker::with_progress_bar);
        self
    }

    /// Current 1-based line number
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Skipped lines so far, in encounter order
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Most recent progress milestone, if one has been reached
    pub fn last_progress(&self) -> Option<&ProgressSnapshot> {
        self.last_progress.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            lines_read: self.line_number,
            emitted: self.emitted,
            skipped: self.skipped.clone(),
            total_lines: self.total_lines,
        }
    }

    pub fn into_summary(self) -> ParseSummary {
        ParseSummary {
            lines_read: self.line_number,
            emitted: self.emitted,
            skipped: self.skipped,
            total_lines: self.total_lines,
        }
    }

    fn record_skip(&mut self, reason: SkipReason) {
        if reason.is_error() {
            warn!(line = self.line_number, "skipping line {}: {}", self.line_number, reason);
        }

        self.skipped.push(SkippedLine {
            line_number: self.line_number,
            reason,
            raw: self.line_buf.trim_end_matches(['\n', '\r']).to_string(),
        });
    }

    fn finish(&mut self) {
        self.finished = true;

        if let Some(ref progress) = self.progress {
            progress.finish();
        }

        info!(
            "parse completed, {}/{} lines skipped.",
            self.skipped.len(),
            self.total_lines.unwrap_or(self.line_number)
        );

        if self.log_skipped_lines {
            for line in &self.skipped {
                info!("skipped line: {}", line.raw.trim());
            }
        }
    }
}

impl<R: BufRead> Iterator for LocusRecords<R> {
    type Item = Result<LocusRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.line_buf.clear();

            match self.reader.read_line(&mut self.line_buf) {
                Ok(0) => {
                    self.finish();
                    return None;
                },
                Ok(_) => {
                    self.line_number += 1;

                    let milestone = self
                        .progress
                        .as_ref()
                        .and_then(|p| p.record_line(self.line_number, self.skipped.len()));
                    if milestone.is_some() {
                        self.last_progress = milestone;
                    }

                    match self.parser.classify(&self.line_buf) {
                        LineOutcome::Valid(record) => {
                            self.emitted += 1;
                            return Some(Ok(record));
                        },
                        LineOutcome::Skipped(reason) => self.record_skip(reason),
                    }
                },
                Err(e) => {
                    // The reader cannot resync after a failed read
                    self.finished = true;
                    return Some(Err(LociError::Read {
                        line: self.line_number + 1,
                        source: e,
                    }));
                },
            }
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Open `<data_folder>/<file_name>` and return its lazy record sequence
///
/// Fails before any streaming if the configuration is invalid or the input
/// file is missing.
pub fn load_data(
    data_folder: impl AsRef<Path>,
    config: &ParserConfig,
) -> Result<LocusRecords<InputReader>> {
    config.validate()?;

    let input_file = config.input_path(data_folder);
    check_input(&input_file)?;

    info!(
        source = %config.source_name,
        version = DATA_VERSION,
        "loading {}",
        input_file.display()
    );

    let total_lines = count_lines(&input_file)?;
    let reader = open_input(&input_file)?;

    info!("start reading file: {}", config.file_name);

    let tracker = ProgressTracker::new(total_lines, config.progress_interval);
    Ok(LocusRecords::new(reader, config).with_progress(tracker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const INPUT: &str = "#chrom\tstart\tend\tscore\tpdb_id\tchain\tfeature\tmin\tmax
chr1\t100\t200\t0.5\tPDB1\tA\tfeatX\t10\t20

chr1\t100\t200\tNOTANUM\tPDB1\tA\tfeatX\t10\t20
chr2\t300\t400\t0.75\tPDB2\tB\tfeatY\t5\t9
chr3\t1\t2\t0.1\tPDB3\tC\tfeatZ\t1
";

    fn records(input: &str) -> LocusRecords<Cursor<Vec<u8>>> {
        LocusRecords::new(Cursor::new(input.as_bytes().to_vec()), &ParserConfig::default())
    }

    #[test]
    fn test_emits_valid_records_in_order() {
        let ids: Vec<String> = records(INPUT).map(|r| r.unwrap().id).collect();
        assert_eq!(ids, vec!["chr1:g.100_200", "chr2:g.300_400"]);
    }

    #[test]
    fn test_summary_accounts_for_every_line() {
        let mut iter = records(INPUT);
        let emitted = iter.by_ref().count();
        let summary = iter.into_summary();

        assert_eq!(emitted, 2);
        assert_eq!(summary.lines_read, 6);
        assert_eq!(summary.emitted + summary.skip_count(), summary.lines_read);

        let numbers: Vec<usize> = summary.skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(numbers, vec![1, 3, 4, 6]);

        let counts = summary.skip_counts();
        assert_eq!(counts.get("comment-or-blank"), Some(&2));
        assert_eq!(counts.get("type-coercion-failure"), Some(&1));
        assert_eq!(counts.get("field-count-mismatch"), Some(&1));
    }

    #[test]
    fn test_is_lazy() {
        let mut iter = records(INPUT);
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.id, "chr1:g.100_200");
        // Only the comment and the first record have been consumed
        assert_eq!(iter.line_number(), 2);
        assert_eq!(iter.skipped().len(), 1);
        assert!(!iter.is_finished());
    }

    #[test]
    fn test_skipped_raw_line_keeps_content() {
        let mut iter = records("chr1\tbad\r\n");
        assert!(iter.next().is_none());
        assert_eq!(iter.skipped()[0].raw, "chr1\tbad");
        assert!(iter.is_finished());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let bytes = b"chr1\t1\t2\t0.1\tP\tA\tf\t1\t2\n\xff\xfe\n".to_vec();
        let mut iter = LocusRecords::new(Cursor::new(bytes), &ParserConfig::default());

        assert!(iter.next().unwrap().is_ok());
        match iter.next() {
            Some(Err(LociError::Read { line, .. })) => assert_eq!(line, 2),
            other => panic!("expected read error, got {:?}", other.map(|r| r.is_ok())),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_keeps_latest_progress_milestone() {
        let mut iter = records(INPUT).with_progress(ProgressTracker::new(6, 2));
        assert!(iter.last_progress().is_none());

        iter.next();
        assert_eq!(iter.last_progress().map(|p| p.line_number), Some(2));

        iter.by_ref().for_each(drop);
        let last = iter.last_progress().unwrap();
        assert_eq!(last.line_number, 6);
        assert_eq!(last.total_lines, 6);
        // Counted before line 6 itself is classified
        assert_eq!(last.skipped, 3);
        assert_eq!(last.ratio, 1.0);
    }

    #[test]
    fn test_empty_input() {
        let mut iter = records("");
        assert!(iter.next().is_none());
        assert_eq!(iter.summary().lines_read, 0);
    }
}
