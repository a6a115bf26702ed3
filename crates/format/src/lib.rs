//! Format registry: a fixed table of the built-in codecs plus lookup,
//! content sniffing, and checked dispatch.

use std::path::Path;

use motor_core::{ErrorCode, ErrorCollector, Format, MotorInfo, ParsedMotor, Point};

pub type ParseFn = fn(&str, &mut dyn ErrorCollector) -> Option<ParsedMotor>;
pub type PrintFn = fn(&MotorInfo, &[Point], &mut dyn ErrorCollector) -> Option<String>;
pub type CombineFn = fn(&[&str], &mut dyn ErrorCollector) -> Option<String>;

/// Descriptor and entry points for one file format.
#[derive(Clone, Copy)]
pub struct FormatInfo {
    pub format: Format,
    pub name: &'static str,
    /// Bare extension, no leading dot.
    pub extension: &'static str,
    pub mime_type: &'static str,
    pub parse: ParseFn,
    pub print: PrintFn,
    pub combine: CombineFn,
}

pub static FORMATS: [FormatInfo; 2] = [
    FormatInfo {
        format: Format::Rasp,
        name: Format::Rasp.name(),
        extension: Format::Rasp.extension(),
        mime_type: Format::Rasp.mime_type(),
        parse: motor_rasp::parse,
        print: motor_rasp::print,
        combine: motor_rasp::combine,
    },
    FormatInfo {
        format: Format::RockSim,
        name: Format::RockSim.name(),
        extension: Format::RockSim.extension(),
        mime_type: Format::RockSim.mime_type(),
        parse: motor_rocksim::parse,
        print: motor_rocksim::print,
        combine: motor_rocksim::combine,
    },
];

impl FormatInfo {
    pub fn of(format: Format) -> &'static FormatInfo {
        match format {
            Format::Rasp => &FORMATS[0],
            Format::RockSim => &FORMATS[1],
        }
    }

    /// File name with this format's extension.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.extension)
    }
}

/// Look up a format by name or bare extension, ignoring case.
pub fn format_info(name: &str) -> Option<&'static FormatInfo> {
    let key = name.trim();
    let key = key.strip_prefix('.').unwrap_or(key);
    FORMATS
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(key) || f.extension.eq_ignore_ascii_case(key))
}

/// Look up a format from a file path's extension.
pub fn format_for_path(path: &Path) -> Option<&'static FormatInfo> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(format_info)
}

/// Best-effort guess at the format of `data`. Never authoritative.
pub fn guess_format(data: &str) -> Option<Format> {
    let first = data
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with(';'));
    if let Some(line) = first {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() == 7 && looks_like_designation(fields[0]) {
            return Some(Format::Rasp);
        }
    }
    if data.contains("<engine") {
        return Some(Format::RockSim);
    }
    None
}

fn looks_like_designation(token: &str) -> bool {
    let starts_ok = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    starts_ok
        && token.chars().any(|c| c.is_ascii_alphabetic())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./()+".contains(c))
}

fn checked_format(format: &str, errors: &mut dyn ErrorCollector) -> Option<&'static FormatInfo> {
    let found = format_info(format);
    if found.is_none() {
        errors.error(
            ErrorCode::DataFileFormat,
            format!("unknown motor data format \"{format}\""),
        );
    }
    found
}

/// Parse `data` with the named format's codec.
pub fn parse_data(
    format: &str,
    data: &str,
    errors: &mut dyn ErrorCollector,
) -> Option<ParsedMotor> {
    let info = checked_format(format, errors)?;
    if data.trim().is_empty() {
        errors.error(
            ErrorCode::DataFileEmpty,
            format!("{} data file is empty", info.name),
        );
        return None;
    }
    (info.parse)(data, errors)
}

/// Print a motor with the named format's codec.
pub fn print_data(
    format: &str,
    motor: &MotorInfo,
    points: &[Point],
    errors: &mut dyn ErrorCollector,
) -> Option<String> {
    let info = checked_format(format, errors)?;
    if points.len() < 2 {
        errors.error(
            ErrorCode::DataFileEmpty,
            format!("nothing to print: {} point(s)", points.len()),
        );
        return None;
    }
    (info.print)(motor, points, errors)
}

/// Concatenate several files of the named format.
pub fn combine_data(
    format: &str,
    payloads: &[&str],
    errors: &mut dyn ErrorCollector,
) -> Option<String> {
    let info = checked_format(format, errors)?;
    if payloads.is_empty() {
        errors.error(
            ErrorCode::DataFileEmpty,
            "no data files to combine".to_string(),
        );
        return None;
    }
    log::debug!("combining {} {} files", payloads.len(), info.name);
    (info.combine)(payloads, errors)
}
