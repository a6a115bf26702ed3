use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use motor_data::{Diagnostics, compute_info, format_info, print_data};

#[path = "shared/io.rs"]
mod shared;

/// Parse a motor data file and print it again, optionally in the other format.
#[derive(Parser, Debug)]
#[command(author, version, about = "Convert motor files between RASP (.eng) and RockSim (.rse)")]
struct Cli {
    /// Motor data file to read
    #[arg(long)]
    input: PathBuf,

    /// Input format name or extension (defaults to the file extension, then sniffing)
    #[arg(long)]
    from: Option<String>,

    /// Output format name or extension (defaults to the input format)
    #[arg(long)]
    to: Option<String>,

    /// Output file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Report burn time, impulse, and designation on stderr
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Also write the point series as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write `{info, points}` as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    shared::init_logging();
    let cli = Cli::parse();

    let motor = shared::read_motor(&cli.input, cli.from.as_deref())?;
    let target = match cli.to.as_deref() {
        Some(name) => format_info(name).ok_or_else(|| anyhow!("unknown format '{name}'"))?,
        None => motor_data::FormatInfo::of(motor.format),
    };

    if cli.summary {
        let stats = compute_info(&motor.points)?;
        eprintln!("Motor        : {}", motor.info.name.as_deref().unwrap_or("?"));
        eprintln!(
            "Manufacturer : {}",
            motor.info.manufacturer.as_deref().unwrap_or("?")
        );
        if let Some(motor_type) = motor.info.motor_type {
            eprintln!("Type         : {}", motor_type.as_str());
        }
        eprintln!("Designation  : {}", stats.designation);
        eprintln!("Total impulse: {:.2} Ns", stats.total_impulse);
        eprintln!(
            "Thrust       : avg {:.2} N, max {:.2} N",
            stats.avg_thrust, stats.max_thrust
        );
        eprintln!("Burn time    : {:.3} s ({} points)", stats.burn_time, motor.points.len());
    }

    let mut diagnostics = Diagnostics::new();
    let text = print_data(target.name, &motor.info, &motor.points, &mut diagnostics);
    shared::report(&diagnostics);
    let text = text.ok_or_else(|| shared::fatal(&diagnostics, "failed to print motor"))?;

    shared::write_text(&cli.output, &text)?;
    shared::write_sidecars(
        cli.csv.as_deref(),
        cli.json.as_deref(),
        &motor.info,
        &motor.points,
    )?;
    Ok(())
}
