use anyhow::Result;
use clap::{ArgAction, Parser};
use log::{error, info};
use std::path::PathBuf;
use std::process;

use doxy_ultra::{BuildError, DocBuilder, GeneratorConfig};

#[derive(Parser, Debug)]
#[command(name = "doxy-ultra", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Directory the HTML pages are written to
    output_dir: Option<PathBuf>,

    /// Directory holding the Doxygen XML records
    #[arg(short, long, default_value = ".")]
    input: PathBuf,

    /// TOML file with generator options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    help: bool,

    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,
}

/// Informational and malformed invocations all exit with status 1.
fn exit_with_usage(program: &str) -> ! {
    let usage = BuildError::Usage(format!("Syntax: {} <output directory>", program));
    eprintln!("{}", usage);
    process::exit(1);
}

fn main() {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => exit_with_usage(&program),
    };

    if cli.version {
        eprintln!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        eprintln!("License: {}", env!("CARGO_PKG_LICENSE"));
        process::exit(1);
    }

    let output_dir = match (cli.help, cli.output_dir.clone()) {
        (false, Some(dir)) => dir,
        _ => exit_with_usage(&program),
    };

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli, output_dir) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, output_dir: PathBuf) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };

    let builder = DocBuilder::new(config, cli.input.clone(), output_dir);
    let stats = builder.build()?;

    info!(
        "Wrote {} pages ({} inline blocks) to {} from {} record files",
        stats.pages_written,
        stats.inline_blocks,
        builder.output_dir().display(),
        stats.files_read
    );
    if stats.orphans > 0 {
        info!("{} entities were attached to a fallback parent", stats.orphans);
    }
    Ok(())
}
