mod archive;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use extract::report::{render, render_records};
use extract::{Inventory, OutputFormat};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Hardware inventory from archives of captured diagnostic output
///
/// Each archive holds the output of dmidecode, /proc/cpuinfo, lshw -xml and
/// friends collected on one machine. One summary row is produced per archive.
#[derive(Parser, Debug)]
#[command(name = "hwinv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Glob patterns resolving to .tar.gz/.tgz/.tar archives
    #[arg(required_unless_present = "completions")]
    patterns: Vec<String>,

    /// Write the summary to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "csv", env = "HWINV_FORMAT")]
    format: FormatArg,

    /// Also write the full per-machine records as JSON to this file
    #[arg(long, value_name = "PATH")]
    records: Option<PathBuf>,

    /// Stop at the first archive that fails
    #[arg(long)]
    fail_fast: bool,

    /// Verbosity level (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Output format argument.
#[derive(Debug, Clone, ValueEnum)]
enum FormatArg {
    /// Quoted comma-separated values
    Csv,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "hwinv", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(args.verbose, args.quiet);
    run(args)
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    // RUST_LOG overrides the command-line verbosity
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let paths = archive::resolve_patterns(&args.patterns)?;
    if paths.is_empty() {
        bail!("No archives matched: {}", args.patterns.join(" "));
    }

    let mut inventory = Inventory::default();
    let mut stopped = false;

    for path in &paths {
        let name = archive::archive_name(path);
        info!("Processing {}", path.display());

        let mut builder = inventory.builder(&name);
        match archive::read_archive(path, &mut builder) {
            Ok(()) => {
                let record = builder.finish();
                inventory.add_record(&name, record);
            }
            Err(e) => inventory.add_failure(&name, &e),
        }

        if args.fail_fast && !inventory.failures().is_empty() {
            stopped = true;
            break;
        }
    }

    let mut summary = render(inventory.summaries(), args.format.into())?;
    if !summary.ends_with('\n') {
        summary.push('\n');
    }
    match &args.output {
        Some(path) => std::fs::write(path, &summary)
            .with_context(|| format!("Failed to write to {}", path.display()))?,
        None => print!("{}", summary),
    }

    if let Some(path) = &args.records {
        let records = render_records(inventory.records())?;
        std::fs::write(path, records)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    info!(
        "Summarized {} of {} archive(s), {} failure(s)",
        inventory.summaries().len(),
        paths.len(),
        inventory.failures().len()
    );

    if stopped {
        if let Some(failure) = inventory.failures().first() {
            bail!(
                "Stopped at {} ({} failed): {}",
                failure.archive,
                failure.stage,
                failure.reason
            );
        }
    }

    Ok(())
}
