use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mixtape::{pipeline, Config, DEFAULT_OUTPUT_PATH};

const USAGE: &str =
    "Incorrect usage - please use `mixtape [mixtape_file_path] [change_file_path]`";

/// Applies a batch of playlist changes to a mixtape document.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct CliArgs {
    /// Path to the mixtape JSON document.
    pub mixtape_file_path: PathBuf,

    /// Path to the change JSON document.
    pub change_file_path: PathBuf,

    /// Where to write the resulting mixtape.
    #[clap(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install the log subscriber")
}

fn run(cli_args: CliArgs) -> Result<()> {
    let config = Config::new(cli_args.mixtape_file_path, cli_args.change_file_path)
        .with_output(cli_args.output);

    let summary = pipeline::run(&config)?;
    info!(
        created = ?summary.created,
        deleted = ?summary.deleted,
        songs_added = summary.songs_added,
        duplicate_adds = summary.duplicate_adds,
        "{} change(s) applied",
        summary.applied()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli_args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return match err.print() {
                Ok(()) => ExitCode::SUCCESS,
                Err(print_err) => {
                    eprintln!("Failed to print help: {}", print_err);
                    ExitCode::FAILURE
                }
            };
        }
        Err(_) => {
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing() {
        eprintln!("{:#}", err);
    }

    match run(cli_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{}", err.to_string().trim_end());
            ExitCode::FAILURE
        }
    }
}
