//! loci-ingest - 3DTS locus score ingestion tool

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use loci_common::logging::{init_logging, LogConfig, LogLevel};
use loci_ingest::channel::spawn_records;
use loci_ingest::{load_data, ParserConfig, DATA_VERSION};
use serde_json::json;
use serde_jsonlines::JsonLinesWriter;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "loci-ingest")]
#[command(author, version, about = "3DTS locus score ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse the locus score file and write records as JSON Lines
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after writing this many records
        #[arg(long)]
        limit: Option<usize>,

        /// Records buffered between reader and writer
        #[arg(long, default_value_t = 1024)]
        buffer: usize,

        /// Draw a terminal progress bar
        #[arg(long)]
        progress_bar: bool,
    },

    /// Parse the file without writing records and print a summary
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Folder containing the locus score file
    #[arg(short, long, env = "LOCI_DATA_FOLDER")]
    data_folder: PathBuf,

    /// Name of the locus score file inside the data folder
    #[arg(long, env = "LOCI_FILE_NAME")]
    file_name: Option<String>,

    /// Source tag records are nested under
    #[arg(long, env = "LOCI_SOURCE_NAME")]
    source_name: Option<String>,

    /// Log progress every N lines
    #[arg(long, env = "LOCI_PROGRESS_INTERVAL")]
    progress_interval: Option<usize>,

    /// Do not log each skipped line at the end of the run
    #[arg(long)]
    no_skipped_lines: bool,
}

impl InputArgs {
    fn parser_config(&self) -> ParserConfig {
        let defaults = ParserConfig::default();
        ParserConfig::builder()
            .file_name(self.file_name.clone().unwrap_or(defaults.file_name))
            .source_name(self.source_name.clone().unwrap_or(defaults.source_name))
            .progress_interval(self.progress_interval.unwrap_or(defaults.progress_interval))
            .log_skipped_lines(!self.no_skipped_lines)
            .build()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("loci-ingest")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    info!("loci-ingest (3DTS data {})", DATA_VERSION);

    match cli.command {
        Command::Parse {
            input,
            output,
            limit,
            buffer,
            progress_bar,
        } => parse(&input, output, limit, buffer, progress_bar).await?,
        Command::Check { input } => check(&input)?,
    }

    Ok(())
}

async fn parse(
    input: &InputArgs,
    output: Option<PathBuf>,
    limit: Option<usize>,
    buffer: usize,
    progress_bar: bool,
) -> Result<()> {
    let config = input.parser_config();
    let mut records = load_data(&input.data_folder, &config)?;
    if progress_bar {
        records = records.with_progress_bar();
    }

    let sink: Box<dyn Write> = match output {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let mut writer = JsonLinesWriter::new(sink);

    let mut channel = spawn_records(records, buffer);
    let mut written = 0usize;

    while let Some(item) = channel.recv().await {
        let record = item?;
        writer.write(&record).context("Failed to write record")?;
        written += 1;

        if limit.is_some_and(|max| written >= max) {
            info!("Reached record limit of {}", written);
            break;
        }
    }

    writer.flush()?;
    let summary = channel.finish().await?;

    info!(
        "Wrote {} records ({} lines read, {} skipped)",
        written,
        summary.lines_read,
        summary.skip_count()
    );
    if let Some(ref path) = output {
        info!("Records saved to {}", path.display());
    }

    Ok(())
}

fn check(input: &InputArgs) -> Result<()> {
    let config = input.parser_config();
    let mut records = load_data(&input.data_folder, &config)?;

    let mut ids = HashSet::new();
    for record in records.by_ref() {
        ids.insert(record?.id);
    }

    let summary = records.into_summary();
    let report = json!({
        "file": config.input_path(&input.data_folder),
        "source": config.source_name,
        "total_lines": summary.total_lines,
        "lines_read": summary.lines_read,
        "emitted": summary.emitted,
        "distinct_ids": ids.len(),
        "skipped": summary.skip_count(),
        "skip_reasons": summary.skip_counts(),
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
