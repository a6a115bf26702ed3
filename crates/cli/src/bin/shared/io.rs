//! Helpers shared by the motor data binaries.
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, anyhow};
use motor_data::export::curve;
use motor_data::format::format_for_path;
use motor_data::{
    Diagnostics, FormatInfo, MotorInfo, ParsedMotor, Point, format_info, guess_format, parse_data,
};

/// Route `log` output to stderr, defaulting to warnings only.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

/// Log every collected diagnostic.
pub fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        log::warn!("{diagnostic}");
    }
}

/// Error for a failed operation, carrying the last diagnostic as the reason.
pub fn fatal(diagnostics: &Diagnostics, what: &str) -> anyhow::Error {
    match diagnostics.iter().last() {
        Some(diagnostic) => anyhow!("{what}: {diagnostic}"),
        None => anyhow!("{what}"),
    }
}

/// Pick a format from an explicit name, the file extension, or the contents.
pub fn resolve_format(
    path: &Path,
    requested: Option<&str>,
    data: &str,
) -> anyhow::Result<&'static FormatInfo> {
    if let Some(name) = requested {
        return format_info(name).ok_or_else(|| anyhow!("unknown format '{name}'"));
    }
    if let Some(info) = format_for_path(path) {
        return Ok(info);
    }
    guess_format(data)
        .map(FormatInfo::of)
        .ok_or_else(|| anyhow!("cannot determine the format of {}", path.display()))
}

pub fn read_motor(path: &Path, requested: Option<&str>) -> anyhow::Result<ParsedMotor> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let format = resolve_format(path, requested, &data)?;

    let mut diagnostics = Diagnostics::new();
    let parsed = parse_data(format.name, &data, &mut diagnostics);
    report(&diagnostics);
    parsed.ok_or_else(|| fatal(&diagnostics, &format!("failed to parse {}", path.display())))
}

pub fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    let mut writer = curve::writer_for_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write the optional CSV and JSON companions of a curve.
pub fn write_sidecars(
    csv: Option<&Path>,
    json: Option<&Path>,
    info: &MotorInfo,
    points: &[Point],
) -> anyhow::Result<()> {
    if let Some(path) = csv {
        curve::write_points_csv(curve::writer_for_path(path)?, points)?;
    }
    if let Some(path) = json {
        curve::write_json(curve::writer_for_path(path)?, info, points)?;
    }
    Ok(())
}
