// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use futures::StreamExt;
use geofeed_ranges::utils::logging::{format_error, format_success};
use geofeed_ranges::{
    Config, Location, OutputMode, PipelineError, PipelineRunner, ProgressTracker,
    RangeExtractor, Validator, open_sink, open_source, range_stream,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "geofeed_ranges")]
#[command(author = "cipher")]
#[command(version)]
#[command(about = "Extract validated CIDR ranges from RFC 8805 geofeeds", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", env = "GEOFEED_RANGES_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the ranges of a geofeed to a file or stdout
    Extract {
        /// Geofeed URL, file path, or - for stdin
        source: Option<String>,

        /// Output file (stdout when omitted or -)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prefix the output with a "# Last updated" comment
        #[arg(long)]
        header: bool,

        /// Write the address field as found instead of normalizing it
        #[arg(long)]
        raw: bool,
    },

    /// Count the ranges a geofeed would produce without writing them
    Check {
        source: Option<String>,

        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    geofeed_ranges::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error(&format!("{:#}", e)));
            exit_code(&e)
        }
    }
}

/// 2 when the feed held no usable ranges, 1 for every other failure.
fn exit_code(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<PipelineError>() {
        Some(PipelineError::NoValidRanges) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::load(Some(path.as_path())).context("Failed to load configuration")?
        }
        None => Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        }),
    };

    match cli.command {
        Commands::Extract {
            source,
            output,
            header,
            raw,
        } => cmd_extract(&config, source, output, header, raw, cli.color).await,
        Commands::Check { source, raw } => cmd_check(&config, source, raw).await,
    }
}

fn resolve_location(config: &Config, source: Option<String>) -> Result<Location> {
    let value = source
        .or_else(|| config.source.location.clone())
        .context("No geofeed source given; pass SOURCE or set source.location")?;

    Ok(Location::parse(&value)?)
}

fn resolve_mode(config: &Config, raw: bool) -> OutputMode {
    if raw {
        OutputMode::Raw
    } else {
        config.output.mode
    }
}

async fn cmd_extract(
    config: &Config,
    source: Option<String>,
    output: Option<PathBuf>,
    header: bool,
    raw: bool,
    color: bool,
) -> Result<()> {
    let location = resolve_location(config, source)?;
    let output = output.or_else(|| config.output.path.clone());

    if let (Location::Path(input), Some(output)) = (&location, &output) {
        Validator::validate_distinct_paths(input, output)?;
    }

    let extractor = RangeExtractor::new(resolve_mode(config, raw));
    let include_header = header || config.output.include_header;
    debug!(
        "Extracting with mode {:?}, header {}",
        extractor.mode(),
        include_header
    );

    let source = open_source(&location, &config.source)
        .await
        .context("Failed to open geofeed source")?;
    let sink = open_sink(output.as_deref())
        .await
        .context("Failed to open output")?;

    let mut runner = PipelineRunner::new(extractor).with_header(include_header);
    if output.is_some() {
        runner = runner.with_progress(ProgressTracker::new(color));
    }

    let stats = runner.run(source, sink).await?;

    eprintln!(
        "{}",
        format_success(&format!(
            "{} ranges written ({} malformed lines skipped) in {} ms",
            stats.ranges_emitted, stats.malformed_lines, stats.duration_ms
        ))
    );

    Ok(())
}

async fn cmd_check(config: &Config, source: Option<String>, raw: bool) -> Result<()> {
    let location = resolve_location(config, source)?;
    let extractor = RangeExtractor::new(resolve_mode(config, raw));

    let source = open_source(&location, &config.source)
        .await
        .context("Failed to open geofeed source")?;

    let mut ranges = Box::pin(range_stream(extractor, source));
    let mut count = 0usize;

    while let Some(range) = ranges.next().await {
        let range = range.map_err(PipelineError::Source)?;
        debug!("{}", range);
        count += 1;
    }

    if count == 0 {
        return Err(PipelineError::NoValidRanges.into());
    }

    println!("{}", count);
    Ok(())
}
