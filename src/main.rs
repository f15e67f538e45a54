//! webminer command-line interface
//!
//! Three modes: crawl a site (`--url`), process a directory of saved pages
//! (`--process`), or do both back to back (`--both`). Processing can filter
//! records with one query flag family and export the result set as JSON,
//! CSV, or a SQLite database.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use webminer::export::ExportError;
use webminer::{CrawlOptions, Crawler, MinerError, Pipeline, Query};

#[derive(Parser, Debug)]
#[command(name = "webminer")]
#[command(version)]
#[command(about = "Crawl a web host and mine structured data from its pages")]
#[command(group(ArgGroup::new("mode").required(true)))]
#[command(group(ArgGroup::new("filter")))]
struct Cli {
    /// Crawl mode: seed URL to start from
    #[arg(short = 'u', long = "url", value_name = "URL", group = "mode")]
    url: Option<String>,

    /// Process mode: directory of HTML files to mine
    #[arg(short = 'p', long = "process", value_name = "DIR", group = "mode")]
    process: Option<PathBuf>,

    /// Crawl, then process the crawl output
    #[arg(short = 'b', long = "both", value_name = "URL", group = "mode")]
    both: Option<String>,

    /// Maximum number of pages to crawl (-1 = unbounded)
    #[arg(short = 'm', long, default_value_t = -1, allow_hyphen_values = true)]
    max_pages: i64,

    /// Output directory for crawled pages
    #[arg(short = 'o', long, value_name = "DIR", default_value = "output")]
    output: PathBuf,

    /// Number of concurrent crawl workers
    #[arg(short = 't', long, value_name = "N", default_value_t = 5)]
    concurrent_threads: usize,

    /// Number of processing workers (0 = synchronous)
    #[arg(long, visible_alias = "pt", value_name = "N", default_value_t = 4)]
    processing_threads: usize,

    /// Processor to run on each file (generic, text, metadata, links, ...)
    #[arg(long, value_name = "TYPE", default_value = "generic")]
    processor_type: String,

    /// Export format: json, csv, or database
    #[arg(short = 'e', long, value_name = "FORMAT", default_value = "json")]
    export: String,

    /// Export output path
    #[arg(long, value_name = "PATH", default_value = "processed_output.json")]
    export_file: PathBuf,

    /// Keep only records whose title or text contains this string
    #[arg(long, value_name = "STR", group = "filter")]
    filter_text: Option<String>,

    /// Match --filter-text case-sensitively
    #[arg(long, requires = "filter_text")]
    filter_case_sensitive: bool,

    /// Keep only records whose title or text matches this regex
    #[arg(long, value_name = "PATTERN", group = "filter")]
    filter_regex: Option<String>,

    /// Metadata key to filter on (use with --filter-meta-value)
    #[arg(long, value_name = "KEY", group = "filter", requires = "filter_meta_value")]
    filter_meta_key: Option<String>,

    /// Metadata value required under --filter-meta-key
    #[arg(long, value_name = "VALUE", requires = "filter_meta_key")]
    filter_meta_value: Option<String>,

    /// Keep only records whose URL matches this regex
    #[arg(long, value_name = "PATTERN", group = "filter")]
    filter_url_regex: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        let _ = error.print();
        process::exit(1);
    });

    setup_logging(cli.verbose, cli.quiet);

    if let Err(error) = run(cli) {
        tracing::error!("{}", error);
        process::exit(1);
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webminer=info,warn"),
            1 => EnvFilter::new("webminer=debug,info"),
            2 => EnvFilter::new("webminer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> webminer::Result<()> {
    let crawl_seed = cli.url.as_deref().or(cli.both.as_deref());

    if let Some(seed) = crawl_seed {
        let options = CrawlOptions {
            max_pages: cli.max_pages,
            output_dir: cli.output.clone(),
            concurrent_threads: cli.concurrent_threads,
        };

        let crawler = Crawler::new(seed, options)?;
        let stats = crawler.crawl()?;
        tracing::info!(
            "crawled {} pages into {}",
            stats.downloaded,
            cli.output.display()
        );

        if cli.both.is_none() {
            return Ok(());
        }
    }

    let input_dir = match (&cli.both, &cli.process) {
        (Some(_), _) => cli.output.clone(),
        (None, Some(dir)) => dir.clone(),
        (None, None) => return Ok(()),
    };

    let mut pipeline = Pipeline::new(input_dir, cli.processing_threads);
    pipeline.add_processor(&cli.processor_type);

    let records = match build_query(&cli)? {
        Some(query) => pipeline.process_filtered(&query),
        None => pipeline.process_all(),
    };
    tracing::info!("processed {} records", records.len());

    match cli.export.as_str() {
        "json" => pipeline.export_json(&records, &cli.export_file)?,
        "csv" => pipeline.export_csv(&records, &cli.export_file)?,
        "database" => pipeline.export_database(&records, &cli.export_file)?,
        other => {
            return Err(MinerError::Export(ExportError::UnknownFormat(
                other.to_string(),
            )))
        }
    }

    Ok(())
}

/// Builds the record filter from the CLI's filter flags, if any were given.
fn build_query(cli: &Cli) -> webminer::Result<Option<Query>> {
    if let Some(term) = &cli.filter_text {
        return Ok(Some(Query::text(term, cli.filter_case_sensitive)));
    }
    if let Some(pattern) = &cli.filter_regex {
        return Ok(Some(Query::regex(pattern)?));
    }
    if let (Some(key), Some(value)) = (&cli.filter_meta_key, &cli.filter_meta_value) {
        return Ok(Some(Query::metadata(key, value)));
    }
    if let Some(pattern) = &cli.filter_url_regex {
        return Ok(Some(Query::url_regex(pattern)?));
    }
    Ok(None)
}
