//! RockSim (.rse) motor files.
//!
//! A document is either a bare `<engine>` or an `<engine-database>` wrapping a
//! single `<engine-list>`. Engine attributes carry the metadata in millimetres
//! and grams; `<data>` holds one `<eng-data t f m/>` row per sample.
//!
//! A single bad data row fails the whole parse, unlike the RASP reader.

mod tree;

use std::borrow::Cow;

use motor_core::constants::ROCKSIM_TIME_EPSILON;
use motor_core::units::{g_to_kg, kg_to_g, m_to_mm, mm_to_m};
use motor_core::{
    ErrorCode, ErrorCollector, Format, MotorInfo, MotorType, ParsedMotor, Point, format_trimmed,
    parse_number, sorted_points,
};
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::tree::{Element, read_document};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Parse RockSim XML into a motor. Returns `None` on any fatal problem.
pub fn parse(data: &str, errors: &mut dyn ErrorCollector) -> Option<ParsedMotor> {
    let xml = strip_cdata(data);
    let root = match read_document(&xml) {
        Ok(root) => root,
        Err(reason) => {
            errors.error(
                ErrorCode::RocksimBadXml,
                format!("invalid RockSim XML: {reason}"),
            );
            return None;
        }
    };

    let engine = select_engine(&root, errors)?;
    let info = read_info(engine, errors);
    let points = read_points(engine, errors)?;

    log::debug!(
        "parsed RockSim motor {}: {} points",
        info.name.as_deref().unwrap_or("?"),
        points.len()
    );
    Some(ParsedMotor {
        format: Format::RockSim,
        info,
        points,
    })
}

/// Replace every CDATA section with its escaped content so the XML reader
/// only ever sees plain text.
fn strip_cdata(data: &str) -> Cow<'_, str> {
    if !data.contains(CDATA_OPEN) {
        return Cow::Borrowed(data);
    }
    let mut out = String::with_capacity(data.len());
    let mut rest = data;
    while let Some(open) = rest.find(CDATA_OPEN) {
        let inner_start = open + CDATA_OPEN.len();
        let Some(close) = rest[inner_start..].find(CDATA_CLOSE) else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&escape(&rest[inner_start..inner_start + close]));
        rest = &rest[inner_start + close + CDATA_CLOSE.len()..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn select_engine<'a>(root: &'a Element, errors: &mut dyn ErrorCollector) -> Option<&'a Element> {
    match root.name.as_str() {
        "engine" => Some(root),
        "engine-database" => {
            let lists: Vec<&Element> = root.children_named("engine-list").collect();
            if lists.len() != 1 {
                errors.error(
                    ErrorCode::RocksimWrongDoc,
                    format!("expected one <engine-list>, found {}", lists.len()),
                );
                return None;
            }
            let engines: Vec<&Element> = lists[0].children_named("engine").collect();
            match engines.len() {
                0 => {
                    errors.error(
                        ErrorCode::RocksimWrongDoc,
                        "<engine-list> contains no <engine>".to_string(),
                    );
                    None
                }
                1 => Some(engines[0]),
                n => {
                    errors.error(
                        ErrorCode::MultipleMotors,
                        format!("{n} engines found, only the first is used"),
                    );
                    Some(engines[0])
                }
            }
        }
        other => {
            errors.error(
                ErrorCode::RocksimWrongDoc,
                format!("unexpected root element <{other}>"),
            );
            None
        }
    }
}

fn read_info(engine: &Element, errors: &mut dyn ErrorCollector) -> MotorInfo {
    let mut number = |key: &str, min: f64| {
        let text = engine.attr(key)?;
        match parse_number(text) {
            Some(v) if v >= min => Some(v),
            _ => {
                errors.error(
                    ErrorCode::InvalidInfo,
                    format!("invalid {key} attribute \"{text}\""),
                );
                None
            }
        }
    };

    let mut info = MotorInfo {
        name: text_attr(engine, "code"),
        manufacturer: text_attr(engine, "mfg"),
        delays: text_attr(engine, "delays"),
        diameter: number("dia", 1.0).map(mm_to_m),
        length: number("len", 1.0).map(mm_to_m),
        total_weight: number("initWt", 1.0).map(g_to_kg),
        propellant_weight: number("propWt", 0.1).map(g_to_kg),
        total_impulse: number("Itot", 0.1),
        avg_thrust: number("avgThrust", 0.001),
        max_thrust: number("peakThrust", 0.01),
        burn_time: number("burn-time", 0.01),
        mass_fraction: number("massFrac", 1.0),
        isp: number("Isp", 1.0),
        ..MotorInfo::default()
    };

    if let Some(label) = engine.attr("Type") {
        match MotorType::from_label(label) {
            Some(motor_type) => info.motor_type = Some(motor_type),
            None => errors.error(
                ErrorCode::InvalidInfo,
                format!("unrecognized motor type \"{label}\""),
            ),
        }
    }

    info.comment = engine
        .children_named("comments")
        .map(|c| c.text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string);
    info
}

fn text_attr(engine: &Element, key: &str) -> Option<String> {
    engine
        .attr(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn read_points(engine: &Element, errors: &mut dyn ErrorCollector) -> Option<Vec<Point>> {
    let blocks: Vec<&Element> = engine.children_named("data").collect();
    let Some(block) = blocks.first() else {
        errors.error(
            ErrorCode::MissingPoints,
            "engine has no <data> element".to_string(),
        );
        return None;
    };
    if blocks.len() > 1 {
        errors.error(
            ErrorCode::MultipleMotors,
            format!("{} <data> elements found, only the first is used", blocks.len()),
        );
    }

    let mut points: Vec<Point> = Vec::new();
    for (index, row) in block.children_named("eng-data").enumerate() {
        let n = index + 1;
        let time = row.attr("t").and_then(parse_number);
        let thrust = row.attr("f").and_then(parse_number);
        let (Some(time), Some(thrust)) = (time, thrust) else {
            errors.error(
                ErrorCode::InvalidPoints,
                format!("data point {n}: missing or invalid t/f"),
            );
            return None;
        };
        if time < 0.0 || thrust < 0.0 {
            errors.error(
                ErrorCode::InvalidPoints,
                format!("data point {n}: negative time or thrust"),
            );
            return None;
        }

        let propellant_weight = match row.attr("m") {
            None => None,
            Some(text) => match parse_number(text) {
                Some(grams) if grams >= 0.0 => Some(g_to_kg(grams)),
                _ => {
                    errors.error(
                        ErrorCode::InvalidPoints,
                        format!("data point {n}: invalid mass \"{text}\" ignored"),
                    );
                    None
                }
            },
        };

        if let Some(last) = points.last() {
            if time <= last.time + ROCKSIM_TIME_EPSILON {
                errors.error(
                    ErrorCode::InvalidPoints,
                    format!("data point {n}: time {time} does not advance past {}", last.time),
                );
            }
        }
        points.push(Point {
            time,
            thrust,
            propellant_weight,
        });
    }

    if points.len() < 2 {
        errors.error(
            ErrorCode::MissingPoints,
            format!("at least two data points required, found {}", points.len()),
        );
        return None;
    }
    Some(sorted_points(&points))
}

/// Render a motor as a RockSim engine database holding one engine.
pub fn print(info: &MotorInfo, points: &[Point], errors: &mut dyn ErrorCollector) -> Option<String> {
    if points.len() < 2 {
        errors.error(
            ErrorCode::MissingPoints,
            format!("at least two data points required, found {}", points.len()),
        );
        return None;
    }
    match write_document(info, points) {
        Ok(bytes) => {
            let mut xml = String::from_utf8_lossy(&bytes).into_owned();
            xml.push('\n');
            Some(xml)
        }
        Err(err) => {
            errors.error(
                ErrorCode::BadMotorData,
                format!("failed to write RockSim XML: {err}"),
            );
            None
        }
    }
}

fn write_document(info: &MotorInfo, points: &[Point]) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("engine-database")))?;
    writer.write_event(Event::Start(BytesStart::new("engine-list")))?;

    writer.write_event(Event::Start(engine_start(info)))?;
    if let Some(comment) = info.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        writer.write_event(Event::Start(BytesStart::new("comments")))?;
        writer.write_event(Event::Text(BytesText::new(comment)))?;
        writer.write_event(Event::End(BytesEnd::new("comments")))?;
    }

    writer.write_event(Event::Start(BytesStart::new("data")))?;
    let masses = point_masses(info, points);
    for (point, mass) in points.iter().zip(masses) {
        let mut row = BytesStart::new("eng-data");
        row.push_attribute(("t", format_trimmed(point.time, 4).as_str()));
        row.push_attribute(("f", format_trimmed(point.thrust, 3).as_str()));
        if let Some(kg) = mass {
            row.push_attribute(("m", format_trimmed(kg_to_g(kg), 3).as_str()));
        }
        writer.write_event(Event::Empty(row))?;
    }
    writer.write_event(Event::End(BytesEnd::new("data")))?;

    writer.write_event(Event::End(BytesEnd::new("engine")))?;
    writer.write_event(Event::End(BytesEnd::new("engine-list")))?;
    writer.write_event(Event::End(BytesEnd::new("engine-database")))?;
    Ok(writer.into_inner())
}

fn engine_start(info: &MotorInfo) -> BytesStart<'static> {
    let mut attrs: Vec<(&str, String)> = Vec::new();
    if let Some(name) = &info.name {
        attrs.push(("code", name.clone()));
    }
    if let Some(mfg) = &info.manufacturer {
        attrs.push(("mfg", mfg.clone()));
    }
    if let Some(motor_type) = info.motor_type {
        let label = match motor_type {
            MotorType::Reload => "reload",
            MotorType::Hybrid => "hybrid",
            MotorType::SingleUse => "single-use",
        };
        attrs.push(("Type", label.to_string()));
    }

    let numeric = [
        ("dia", info.diameter.map(m_to_mm)),
        ("len", info.length.map(m_to_mm)),
        ("initWt", info.total_weight.map(kg_to_g)),
        ("propWt", info.propellant_weight.map(kg_to_g)),
    ];
    for (key, value) in numeric {
        if let Some(v) = value {
            attrs.push((key, format_trimmed(v, 3)));
        }
    }
    if let Some(delays) = &info.delays {
        attrs.push(("delays", delays.clone()));
    }
    let stats = [
        ("Itot", info.total_impulse),
        ("avgThrust", info.avg_thrust),
        ("peakThrust", info.max_thrust),
        ("burn-time", info.burn_time),
        ("massFrac", info.mass_fraction),
        ("Isp", info.isp),
    ];
    for (key, value) in stats {
        if let Some(v) = value {
            attrs.push((key, format_trimmed(v, 3)));
        }
    }

    let mut start = BytesStart::new("engine");
    for (key, value) in &attrs {
        start.push_attribute((*key, value.as_str()));
    }
    start
}

/// Per-point remaining propellant. Explicit point masses win; otherwise the
/// total propellant is burned off in proportion to delivered impulse.
fn point_masses(info: &MotorInfo, points: &[Point]) -> Vec<Option<f64>> {
    if points.iter().any(|p| p.propellant_weight.is_some()) {
        return points.iter().map(|p| p.propellant_weight).collect();
    }
    let Some(propellant) = info.propellant_weight else {
        return vec![None; points.len()];
    };

    let mut cumulative = Vec::with_capacity(points.len());
    let (mut impulse, mut prev_time, mut prev_thrust) = (0.0_f64, 0.0_f64, 0.0_f64);
    for point in points {
        impulse += (point.time - prev_time) * (point.thrust + prev_thrust) / 2.0;
        cumulative.push(impulse);
        prev_time = point.time;
        prev_thrust = point.thrust;
    }
    if impulse <= 0.0 {
        return vec![None; points.len()];
    }
    cumulative
        .into_iter()
        .map(|delivered| Some(propellant * (1.0 - delivered / impulse)))
        .collect()
}

/// Merge several engine databases into one.
///
/// The `<engine-list>` bodies are cut out textually and re-wrapped. Payloads
/// whose root is not `<engine-database>` are skipped without a report.
pub fn combine(payloads: &[&str], errors: &mut dyn ErrorCollector) -> Option<String> {
    let mut fragments: Vec<&str> = Vec::new();
    let mut accepted = 0usize;
    for (index, data) in payloads.iter().enumerate() {
        match engine_list_body(data) {
            Some(body) => {
                accepted += 1;
                let body = body.trim_end().trim_start_matches(['\r', '\n']);
                if !body.is_empty() {
                    fragments.push(body);
                }
            }
            None => log::debug!("skipping RockSim payload {index}: not an engine database"),
        }
    }
    if accepted == 0 {
        errors.error(
            ErrorCode::DataFileEmpty,
            "no RockSim engine databases to combine".to_string(),
        );
        return None;
    }

    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push_str("\n<engine-database>\n  <engine-list>\n");
    for fragment in fragments {
        out.push_str(fragment);
        out.push('\n');
    }
    out.push_str("  </engine-list>\n</engine-database>\n");
    Some(out)
}

fn engine_list_body(data: &str) -> Option<&str> {
    let mut root = data.trim_start_matches('\u{feff}').trim_start();
    if root.starts_with("<?xml") {
        let end = root.find("?>")?;
        root = root[end + 2..].trim_start();
    }
    if !root.starts_with("<engine-database") {
        return None;
    }

    let open = root.find("<engine-list")?;
    let open_end = open + root[open..].find('>')?;
    if root[..open_end].ends_with('/') {
        return Some("");
    }
    let body_start = open_end + 1;
    let body_end = body_start + root[body_start..].find("</engine-list>")?;
    Some(&root[body_start..body_end])
}
