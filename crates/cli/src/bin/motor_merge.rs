use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use motor_data::config::load_manifest;
use motor_data::{Diagnostics, FormatInfo, MergeInput, ParsedMotor, format_info, merge_data, print_data};

#[path = "shared/io.rs"]
mod shared;

/// Synthesize a virtual motor from the clustered/staggered motors in a manifest.
#[derive(Parser, Debug)]
#[command(author, version, about = "Merge motors from a YAML/TOML manifest into one thrust curve")]
struct Cli {
    /// Merge manifest (.yaml, .yml, or .toml)
    #[arg(long)]
    manifest: PathBuf,

    /// Output format (defaults to the manifest's output_format)
    #[arg(long)]
    to: Option<String>,

    /// Output file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Also write the merged point series as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write `{info, points}` as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    shared::init_logging();
    let cli = Cli::parse();

    let manifest = load_manifest(&cli.manifest)?;
    let motors = manifest
        .motors
        .iter()
        .map(|entry| shared::read_motor(&entry.file, entry.format.map(|f| f.name())))
        .collect::<anyhow::Result<Vec<ParsedMotor>>>()?;
    let inputs: Vec<MergeInput<'_>> = manifest
        .motors
        .iter()
        .zip(&motors)
        .map(|(entry, motor)| MergeInput::new(motor, entry.count, entry.offset))
        .collect();

    let mut diagnostics = Diagnostics::new();
    let merged = merge_data(&inputs, &mut diagnostics);
    shared::report(&diagnostics);
    let merged = merged.ok_or_else(|| shared::fatal(&diagnostics, "failed to merge motors"))?;
    log::info!(
        "{}: merged {} motor files into {}",
        manifest.name.as_deref().unwrap_or("manifest"),
        motors.len(),
        merged.info.name.as_deref().unwrap_or("?")
    );

    let target = match cli.to.as_deref() {
        Some(name) => format_info(name).ok_or_else(|| anyhow!("unknown format '{name}'"))?,
        None => FormatInfo::of(manifest.output_format),
    };
    let mut diagnostics = Diagnostics::new();
    let text = print_data(target.name, &merged.info, &merged.points, &mut diagnostics);
    shared::report(&diagnostics);
    let text = text.ok_or_else(|| shared::fatal(&diagnostics, "failed to print merged motor"))?;

    shared::write_text(&cli.output, &text)?;
    shared::write_sidecars(
        cli.csv.as_deref(),
        cli.json.as_deref(),
        &merged.info,
        &merged.points,
    )?;
    Ok(())
}
