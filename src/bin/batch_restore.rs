use anyhow::Context;
use clap::Parser;
use plss_restore::core::batch::run_batch;
use plss_restore::utils::logger::{self, LogFormat};
use plss_restore::utils::validation::Validate;
use plss_restore::DiagnosticsConfig;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "batch-restore")]
#[command(about = "Restore lost corners by single proportion for every row of a CSV file")]
struct Args {
    /// CSV of jobs (id, A-D coordinates, record/measured NS and EW distances)
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the results CSV
    #[arg(short, long, default_value = "restored.csv")]
    output: PathBuf,

    /// Allowed deviation of a control line from a section multiple, in feet
    #[arg(long, default_value_t = 300.0)]
    span_tolerance: f64,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, args.verbose);

    let diagnostics = DiagnosticsConfig {
        span_tolerance: args.span_tolerance,
        ..DiagnosticsConfig::default()
    };
    diagnostics.validate()?;

    tracing::info!("🚀 Reading jobs from: {}", args.input.display());
    let input = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let summary = run_batch(BufReader::new(input), BufWriter::new(output), &diagnostics)?;

    println!(
        "✅ {} jobs: {} restored, {} failed, {} with warnings",
        summary.total, summary.succeeded, summary.failed, summary.with_warnings
    );
    println!("📁 Output saved to: {}", args.output.display());

    if summary.failed > 0 {
        std::process::exit(2);
    }
    Ok(())
}
