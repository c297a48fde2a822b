use std::path::PathBuf;
use std::process;

use clap::Parser;
use schemport_cli::display::BarDisplay;
use schemport_cli::{paths, report};
use schemport_convert::BatchCoordinator;
use schemport_core::ConvertConfig;

/// Convert WorldEdit .schematic files into structure-block .nbt files.
#[derive(Debug, Parser)]
#[command(name = "schem2nbt", version)]
struct Cli {
    /// Input .schematic file, or folder with --folder.
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output .nbt file, or folder with --folder.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Convert every file in the input folder.
    #[arg(short, long)]
    folder: bool,

    /// Show detailed logs.
    #[arg(short, long)]
    verbose: bool,

    /// RON file overriding converter settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a JSON summary of the batch here.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Do not draw the progress bar.
    #[arg(long)]
    no_progress: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = match &cli.config {
        Some(path) => ConvertConfig::load(path).unwrap_or_else(|e| {
            eprintln!("ERROR: {e}");
            process::exit(1);
        }),
        None => ConvertConfig::default(),
    };

    let jobs = paths::resolve_jobs(&cli.input, cli.output.as_deref(), cli.folder)
        .unwrap_or_else(|e| {
            eprintln!("ERROR: {e}");
            process::exit(1);
        });

    let mut display = if cli.no_progress {
        BarDisplay::hidden()
    } else {
        BarDisplay::new()
    };
    let summary = BatchCoordinator::new(config).run(&jobs, &mut display);

    if let Some(path) = &cli.report {
        if let Err(e) = report::save_summary(path, &summary) {
            eprintln!("ERROR: failed to write report {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved report to {}", path.display());
    }

    if !summary.all_succeeded() {
        eprintln!(
            "ERROR: {} of {} files failed to convert",
            summary.failed(),
            summary.files.len()
        );
        process::exit(1);
    }
}
