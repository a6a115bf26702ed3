//! RASP (.eng) motor files.
//!
//! Layout: optional `;` comment lines, one info line with seven fields
//! (`name diameter(mm) length(mm) delays propellant total manufacturer`),
//! then one `time thrust` pair per line.
//!
//! Unlike the RockSim reader, a malformed data line here only drops that
//! point; the parse still fails at the end if any point was dropped, but every
//! bad line gets reported first.

use motor_core::constants::RASP_TIME_EPSILON;
use motor_core::units::{m_to_mm, mm_to_m};
use motor_core::{
    ErrorCode, ErrorCollector, Format, MotorInfo, ParsedMotor, Point, format_trimmed, parse_number,
    sorted_points,
};

const INFO_FIELDS: usize = 7;
const MIN_DIMENSION_MM: f64 = 1.0;
// Weights are kept in the unit written in the file (kilograms in practice);
// these are the 0.1 g / 1 g floors in that unit.
const MIN_PROPELLANT_WEIGHT: f64 = 0.0001;
const MIN_TOTAL_WEIGHT: f64 = 0.001;

/// Parse RASP text into a motor. Returns `None` on any fatal problem.
pub fn parse(data: &str, errors: &mut dyn ErrorCollector) -> Option<ParsedMotor> {
    let mut comments: Vec<String> = Vec::new();
    let mut info: Option<MotorInfo> = None;
    let mut points: Vec<Point> = Vec::new();
    let mut data_lines = 0usize;
    let mut bad_points = 0usize;

    for (index, raw) in normalize_line_endings(data).lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix(';') {
            if info.is_none() {
                let comment = comment.strip_prefix(' ').unwrap_or(comment);
                comments.push(comment.trim_end().to_string());
            }
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if info.is_none() {
            info = Some(parse_info_line(&fields, line_no, errors)?);
            continue;
        }

        if parse_number(fields[0]).is_none() && data_lines > 0 {
            errors.error(
                ErrorCode::MultipleMotors,
                format!("line {line_no}: data after the first motor ignored"),
            );
            break;
        }
        data_lines += 1;

        match parse_point(&fields) {
            Ok(point) => {
                if let Some(last) = points.last() {
                    if point.time <= last.time + RASP_TIME_EPSILON {
                        errors.error(
                            ErrorCode::InvalidPoints,
                            format!(
                                "line {line_no}: time {} does not advance past {}",
                                point.time, last.time
                            ),
                        );
                    }
                }
                points.push(point);
            }
            Err(reason) => {
                errors.error(ErrorCode::InvalidPoints, format!("line {line_no}: {reason}"));
                bad_points += 1;
            }
        }
    }

    let Some(mut info) = info else {
        errors.error(ErrorCode::RaspInfoLine, "missing RASP info line".to_string());
        return None;
    };
    if !comments.is_empty() {
        info.comment = Some(comments.join("\n"));
    }

    let points = sorted_points(&points);
    check_curve_shape(&points, errors);

    if bad_points > 0 {
        errors.error(
            ErrorCode::InvalidPoints,
            format!("{bad_points} invalid data point(s)"),
        );
        return None;
    }
    if points.len() < 2 {
        errors.error(
            ErrorCode::MissingPoints,
            format!("at least two data points required, found {}", points.len()),
        );
        return None;
    }

    log::debug!(
        "parsed RASP motor {}: {} points",
        info.name.as_deref().unwrap_or("?"),
        points.len()
    );
    Some(ParsedMotor {
        format: Format::Rasp,
        info,
        points,
    })
}

fn parse_info_line(
    fields: &[&str],
    line_no: usize,
    errors: &mut dyn ErrorCollector,
) -> Option<MotorInfo> {
    if fields.len() < INFO_FIELDS {
        errors.error(
            ErrorCode::RaspInfoLine,
            format!(
                "line {line_no}: info line has {} fields, expected {INFO_FIELDS}",
                fields.len()
            ),
        );
        return None;
    }
    if fields.len() > INFO_FIELDS {
        errors.error(
            ErrorCode::RaspInfoLine,
            format!(
                "line {line_no}: info line has {} fields, extra fields ignored",
                fields.len()
            ),
        );
    }

    let mut check = |label: &str, text: &str, min: f64| match parse_number(text) {
        Some(v) if v >= min => Some(v),
        _ => {
            errors.error(
                ErrorCode::InvalidInfo,
                format!("line {line_no}: invalid {label} \"{text}\""),
            );
            None
        }
    };

    // Only the dimensions are converted; weights stay as written.
    let diameter = check("diameter", fields[1], MIN_DIMENSION_MM).map(mm_to_m);
    let length = check("length", fields[2], MIN_DIMENSION_MM).map(mm_to_m);
    let propellant_weight = check("propellant weight", fields[4], MIN_PROPELLANT_WEIGHT);
    let total_weight = check("total weight", fields[5], MIN_TOTAL_WEIGHT);

    Some(MotorInfo {
        name: Some(fields[0].to_string()),
        manufacturer: Some(fields[6].to_string()),
        diameter,
        length,
        delays: Some(fields[3].to_string()),
        propellant_weight,
        total_weight,
        ..MotorInfo::default()
    })
}

fn parse_point(fields: &[&str]) -> Result<Point, String> {
    if fields.len() != 2 {
        return Err(format!(
            "expected time and thrust, found {} fields",
            fields.len()
        ));
    }
    let time = parse_number(fields[0]).ok_or_else(|| format!("invalid time \"{}\"", fields[0]))?;
    let thrust =
        parse_number(fields[1]).ok_or_else(|| format!("invalid thrust \"{}\"", fields[1]))?;
    if time < 0.0 {
        return Err(format!("negative time {time}"));
    }
    if thrust < 0.0 {
        return Err(format!("negative thrust {thrust}"));
    }
    Ok(Point::new(time, thrust))
}

fn check_curve_shape(points: &[Point], errors: &mut dyn ErrorCollector) {
    if points.len() < 2 {
        return;
    }
    let last = points.len() - 1;
    if let Some(index) = (1..last).find(|&i| points[i].thrust == 0.0) {
        errors.error(
            ErrorCode::InvalidPoints,
            format!(
                "zero thrust at point {} before the end of the curve",
                index + 1
            ),
        );
    }
    if points[last].thrust != 0.0 {
        errors.error(
            ErrorCode::InvalidPoints,
            format!("final point has non-zero thrust {}", points[last].thrust),
        );
    }
}

/// Render a motor as RASP text.
pub fn print(info: &MotorInfo, points: &[Point], errors: &mut dyn ErrorCollector) -> Option<String> {
    if points.len() < 2 {
        errors.error(
            ErrorCode::MissingPoints,
            format!("at least two data points required, found {}", points.len()),
        );
        return None;
    }

    let mut out = String::new();
    if let Some(comment) = &info.comment {
        for line in comment.lines() {
            if line.is_empty() {
                out.push_str(";\n");
            } else {
                out.push_str(&format!("; {line}\n"));
            }
        }
    }

    let mm = |v: Option<f64>| v.map(|m| format_trimmed(m_to_mm(m), 3));
    let weight = |v: Option<f64>| v.map(|w| format_trimmed(w, 6));
    out.push_str(&format!(
        "{} {} {} {} {} {} {}\n",
        token(info.name.as_deref(), "Unknown"),
        mm(info.diameter).unwrap_or_else(|| "0".to_string()),
        mm(info.length).unwrap_or_else(|| "0".to_string()),
        delays_token(info.delays.as_deref()),
        weight(info.propellant_weight).unwrap_or_else(|| "0".to_string()),
        weight(info.total_weight).unwrap_or_else(|| "0".to_string()),
        token(info.manufacturer.as_deref(), "Unknown"),
    ));

    for point in points {
        out.push_str(&format!("   {} {:.3}\n", time_token(point.time), point.thrust));
    }
    Some(out)
}

/// Millisecond times as `0.100`; finer times get a fourth decimal so that
/// RockSim samples 50 µs apart stay distinct.
fn time_token(time: f64) -> String {
    let millis = format!("{time:.3}");
    match millis.parse::<f64>() {
        Ok(rounded) if (rounded - time).abs() < 1e-9 => millis,
        _ => format!("{time:.4}"),
    }
}

fn token(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.split_whitespace().collect::<Vec<_>>().join("_"),
        _ => fallback.to_string(),
    }
}

fn delays_token(delays: Option<&str>) -> String {
    match delays.map(str::trim) {
        Some(d) if !d.is_empty() => d
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-"),
        _ => "0".to_string(),
    }
}

/// Concatenate RASP files into one, separated by a lone `;` line.
///
/// Bodies are not re-parsed.
pub fn combine(payloads: &[&str], errors: &mut dyn ErrorCollector) -> Option<String> {
    let bodies: Vec<String> = payloads
        .iter()
        .map(|data| trim_blank_lines(&normalize_line_endings(data)))
        .filter(|body| !body.is_empty())
        .collect();
    if bodies.is_empty() {
        errors.error(
            ErrorCode::DataFileEmpty,
            "no RASP data to combine".to_string(),
        );
        return None;
    }

    let mut out = bodies.join("\n;\n");
    out.push('\n');
    Some(out)
}

fn normalize_line_endings(data: &str) -> String {
    data.replace("\r\n", "\n").replace('\r', "\n")
}

fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
