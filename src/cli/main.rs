use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use upload_normalizer::{config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "upload-normalizer",
    version,
    about = "Normalize upload options from image metadata: merge tags, set alt text, serialize rights fields"
)]
struct Cli {
    /// Hook payload files or directories (reads one payload from stdin if omitted)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: upload-normalizer.json in the working directory, if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init: bool,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Write results to DIR instead of stdout
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));
        config::Config::default().save(&path)?;
        println!("Default config written to {}", path.display());
        return Ok(());
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;

    // Override output settings from CLI flags
    if cli.compact {
        config.output.pretty = false;
    }
    if let Some(ref dir) = cli.output_dir {
        config.output.output_dir = Some(dir.to_string_lossy().into_owned());
    }

    // No paths: a single payload on stdin
    if cli.paths.is_empty() {
        log::debug!("Reading hook payload from stdin");
        let options = pipeline::read_payload(std::io::stdin().lock())?.normalize();
        println!("{}", pipeline::render_options(&options, config.output.pretty)?);
        return Ok(());
    }

    let payloads = pipeline::collect_payloads(&cli.paths);
    if payloads.is_empty() {
        anyhow::bail!("No hook payload files found in the specified paths.");
    }

    log::info!("Found {} payload(s) to process", payloads.len());

    let total = payloads.len();
    let mut failed = 0;

    for result in pipeline::process_batch(&payloads, &config) {
        if let Some(ref err) = result.error {
            log::error!("{}: {err}", result.path.display());
            failed += 1;
            continue;
        }

        if let Some(ref out) = result.output_path {
            log::info!("  Wrote: {}", out.display());
        } else if let Some(ref options) = result.options {
            println!("{}", pipeline::render_options(options, config.output.pretty)?);
        }
    }

    // Summary
    log::info!(
        "Done: {} succeeded, {failed} failed out of {total} payloads",
        total - failed
    );

    if failed > 0 {
        anyhow::bail!("{failed} payload(s) failed");
    }

    Ok(())
}
