pub mod analysis;
pub mod cli;
pub mod data;
pub mod io_utils;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod rows;
pub mod schema;
pub mod stats;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{AnalyzeArgs, Cli, Commands},
    report::SummaryDocument,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_profiler", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => handle_analyze(&args),
        Commands::Process(args) => pipeline::execute(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    info!(
        "Analyzing '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Input path {:?} has no file name", args.input))?;
    let bytes =
        fs::read(&args.input).with_context(|| format!("Reading input file {:?}", args.input))?;

    let analysis = analysis::analyze_with_delimiter(&file_name, &bytes, delimiter);
    let json = SummaryDocument::from_analysis(&analysis).to_json_pretty()?;
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("Writing summary to {path:?}"))?;
            info!("Wrote summary for '{file_name}' to {path:?}");
        }
        None => println!("{json}"),
    }
    if let Some(message) = &analysis.error_message {
        info!("Analysis of '{file_name}' finished with status=error: {message}");
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
