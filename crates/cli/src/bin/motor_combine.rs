use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use motor_data::format::format_for_path;
use motor_data::{Diagnostics, combine_data, format_info};

#[path = "shared/io.rs"]
mod shared;

/// Concatenate several motor files of one format into a single file.
#[derive(Parser, Debug)]
#[command(author, version, about = "Combine same-format motor files into one")]
struct Cli {
    /// Format name or extension (defaults to the first input's extension)
    #[arg(long)]
    format: Option<String>,

    /// Output file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Motor files to combine
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    shared::init_logging();
    let cli = Cli::parse();

    let format = match cli.format.as_deref() {
        Some(name) => format_info(name).ok_or_else(|| anyhow!("unknown format '{name}'"))?,
        None => format_for_path(&cli.inputs[0]).ok_or_else(|| {
            anyhow!(
                "cannot determine the format of {}; pass --format",
                cli.inputs[0].display()
            )
        })?,
    };

    let payloads = cli
        .inputs
        .iter()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<String>>>()?;
    let borrowed: Vec<&str> = payloads.iter().map(String::as_str).collect();

    let mut diagnostics = Diagnostics::new();
    let combined = combine_data(format.name, &borrowed, &mut diagnostics);
    shared::report(&diagnostics);
    let combined =
        combined.ok_or_else(|| shared::fatal(&diagnostics, "failed to combine motor files"))?;

    shared::write_text(&cli.output, &combined)
}
