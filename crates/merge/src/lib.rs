//! Virtual motor synthesis.
//!
//! Several physical motors, each fired `count` times at once and ignited
//! `offset` seconds after a shared t=0, are resampled onto one uniform grid
//! and summed. The summed curve is trimmed, simplified, and re-annotated with
//! synthesized metadata.

use motor_core::constants::{G0, MIN_THRUST};
use motor_core::{
    ErrorCode, ErrorCollector, Format, MotorInfo, ParsedMotor, Point, format_trimmed, sorted_points,
};
use motor_info::{CurveInfo, compute_info};
use serde::{Deserialize, Serialize};

const SAMPLES_PER_SECOND: f64 = 100.0;
const MIN_SAMPLES: usize = 100;
/// Longest merged burn accepted (s); bounds the grid at 360,000 samples.
pub const MAX_BURN_TIME: f64 = 3600.0;
const MANUFACTURER: &str = "Custom";

/// One contributing motor. Borrows the caller's data; nothing is mutated.
#[derive(Debug, Clone, Copy)]
pub struct MergeInput<'a> {
    pub points: &'a [Point],
    pub info: &'a MotorInfo,
    /// Motors fired simultaneously (cluster size), at least 1.
    pub count: u32,
    /// Ignition delay relative to t=0 (s).
    pub offset: f64,
}

impl<'a> MergeInput<'a> {
    pub fn new(motor: &'a ParsedMotor, count: u32, offset: f64) -> Self {
        Self {
            points: &motor.points,
            info: &motor.info,
            count,
            offset,
        }
    }
}

/// Synthesized motor, ready for any format's printer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedMotor {
    pub info: MotorInfo,
    pub points: Vec<Point>,
}

impl MergedMotor {
    pub fn into_parsed(self, format: Format) -> ParsedMotor {
        ParsedMotor {
            format,
            info: self.info,
            points: self.points,
        }
    }
}

/// Combine `inputs` into a single thrust curve.
///
/// Every failure is reported as `BAD_MOTOR_DATA` and yields `None`.
pub fn merge_data(inputs: &[MergeInput<'_>], errors: &mut dyn ErrorCollector) -> Option<MergedMotor> {
    if inputs.is_empty() {
        return fail(errors, "no motors to merge".to_string());
    }

    let mut curves: Vec<Vec<Point>> = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let label = motor_label(input.info, index);
        if input.count == 0 {
            return fail(errors, format!("{label}: count must be at least 1"));
        }
        if !input.offset.is_finite() || input.offset < 0.0 {
            return fail(errors, format!("{label}: invalid offset {}", input.offset));
        }
        let usable: Vec<Point> = input
            .points
            .iter()
            .filter(|p| p.time.is_finite() && p.thrust.is_finite())
            .filter(|p| p.time >= 0.0 && p.thrust >= 0.0)
            .copied()
            .collect();
        if usable.len() < 2 {
            return fail(
                errors,
                format!("{label}: at least two usable data points required"),
            );
        }
        curves.push(shift_and_scale(&sorted_points(&usable), input.offset, input.count));
    }

    if !inputs.iter().any(|input| input.offset == 0.0) {
        return fail(
            errors,
            "at least one motor must ignite at time zero".to_string(),
        );
    }

    let burn_time = curves
        .iter()
        .filter_map(|curve| curve.last())
        .map(|last| last.time)
        .fold(0.0_f64, f64::max);
    if burn_time <= 0.0 {
        return fail(errors, "merged motors have no burn time".to_string());
    }
    if !burn_time.is_finite() || burn_time > MAX_BURN_TIME {
        return fail(
            errors,
            format!("merged burn time {burn_time} s exceeds the {MAX_BURN_TIME} s limit"),
        );
    }

    let Grid { mut samples, step } = Grid::new(burn_time);
    for (index, curve) in curves.iter().enumerate() {
        if !accumulate(&mut samples, curve) {
            return fail(
                errors,
                format!(
                    "{}: contributes no data to the merged curve",
                    motor_label(inputs[index].info, index)
                ),
            );
        }
    }

    let max_thrust = samples.iter().map(|p| p.thrust).fold(0.0_f64, f64::max);
    if max_thrust <= MIN_THRUST {
        return fail(errors, "merged curve has no thrust".to_string());
    }

    let mut points = simplify(trim(&samples), max_thrust);
    for point in &mut points {
        if point.thrust < MIN_THRUST {
            point.thrust = MIN_THRUST;
        }
    }
    let end = match points.last() {
        Some(last) if last.time < burn_time => burn_time,
        Some(last) => last.time + step,
        None => burn_time,
    };
    points.push(Point::new(end, 0.0));

    let stats = match compute_info(&points) {
        Ok(stats) => stats,
        Err(err) => return fail(errors, format!("merged curve unusable: {err}")),
    };
    let info = merged_info(inputs, &stats);
    log::debug!(
        "merged {} motors into {} ({} points, {:.3} s)",
        inputs.len(),
        stats.designation,
        points.len(),
        stats.burn_time
    );
    Some(MergedMotor { info, points })
}

fn fail<T>(errors: &mut dyn ErrorCollector, message: String) -> Option<T> {
    errors.error(ErrorCode::BadMotorData, message);
    None
}

fn motor_label(info: &MotorInfo, index: usize) -> String {
    match &info.name {
        Some(name) => format!("motor {} ({name})", index + 1),
        None => format!("motor {}", index + 1),
    }
}

fn shift_and_scale(points: &[Point], offset: f64, count: u32) -> Vec<Point> {
    points
        .iter()
        .map(|p| {
            let thrust = if count != 1 {
                p.thrust * f64::from(count)
            } else {
                p.thrust
            };
            Point::new(p.time + offset, thrust)
        })
        .collect()
}

/// Uniform sample times covering (0, burn_time].
///
/// At least 100 samples per second, so the step never exceeds 0.01 s and no
/// zero-thrust anchor before the first sample is ever needed.
struct Grid {
    samples: Vec<Point>,
    step: f64,
}

impl Grid {
    fn new(burn_time: f64) -> Self {
        let n = ((burn_time * SAMPLES_PER_SECOND).round() as usize).max(MIN_SAMPLES);
        let step = burn_time / n as f64;
        let samples = (1..=n)
            .map(|i| {
                // The last sample sits exactly on the burn time.
                let time = if i == n { burn_time } else { step * i as f64 };
                Point::new(time, 0.0)
            })
            .collect();
        Grid { samples, step }
    }
}

/// Add the curve's interpolated thrust into every sample it spans.
/// Returns false when no sample falls inside the curve.
fn accumulate(samples: &mut [Point], curve: &[Point]) -> bool {
    let start = curve[0].time;
    let end = curve[curve.len() - 1].time;
    let last_segment = curve.len() - 2;
    let mut segment = 0;
    let mut touched = false;

    for sample in samples.iter_mut() {
        if sample.time < start {
            continue;
        }
        if sample.time > end {
            break;
        }
        while segment < last_segment && curve[segment + 1].time < sample.time {
            segment += 1;
        }
        sample.thrust += interpolate(&curve[segment], &curve[segment + 1], sample.time);
        touched = true;
    }
    touched
}

fn interpolate(a: &Point, b: &Point, time: f64) -> f64 {
    let span = b.time - a.time;
    if span <= 0.0 {
        return b.thrust;
    }
    a.thrust + (b.thrust - a.thrust) * (time - a.time) / span
}

fn trim(samples: &[Point]) -> &[Point] {
    let first = samples.iter().position(|p| p.thrust >= MIN_THRUST);
    let last = samples.iter().rposition(|p| p.thrust >= MIN_THRUST);
    match (first, last) {
        (Some(first), Some(last)) => &samples[first..=last],
        _ => &[],
    }
}

/// Drop interior samples that lie on the line between their two grid
/// neighbors, within `max_thrust / 1000`.
fn simplify(samples: &[Point], max_thrust: f64) -> Vec<Point> {
    let Some((&first, _)) = samples.split_first() else {
        return Vec::new();
    };
    let tolerance = max_thrust / 1000.0;
    let peak = samples.iter().position(|p| p.thrust >= max_thrust);
    let is_zero = |p: &Point| p.thrust < MIN_THRUST;

    let mut kept = vec![first];
    for i in 1..samples.len().saturating_sub(1) {
        let (prev, current, next) = (samples[i - 1], samples[i], samples[i + 1]);
        let transition = is_zero(&current) && (!is_zero(&prev) || !is_zero(&next));
        let off_line = (current.thrust - interpolate(&prev, &next, current.time)).abs() > tolerance;
        if Some(i) == peak || transition || off_line {
            kept.push(current);
        }
    }
    if samples.len() > 1 {
        kept.push(samples[samples.len() - 1]);
    }
    kept
}

fn merged_info(inputs: &[MergeInput<'_>], stats: &CurveInfo) -> MotorInfo {
    let largest = |field: fn(&MotorInfo) -> Option<f64>| {
        inputs
            .iter()
            .filter_map(|input| field(input.info))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    };
    let total = |field: fn(&MotorInfo) -> Option<f64>| {
        inputs
            .iter()
            .map(|input| field(input.info).map(|v| v * f64::from(input.count)))
            .sum::<Option<f64>>()
    };

    let propellant_weight = total(|info| info.propellant_weight);
    let isp = propellant_weight
        .filter(|&kg| kg > 0.0)
        .map(|kg| stats.total_impulse / (kg * G0));

    let first_type = inputs[0].info.motor_type;
    let motor_type = first_type.filter(|t| inputs.iter().all(|i| i.info.motor_type == Some(*t)));

    let base = MotorInfo {
        manufacturer: Some(MANUFACTURER.to_string()),
        motor_type,
        diameter: largest(|info| info.diameter),
        length: largest(|info| info.length),
        propellant_weight,
        total_weight: total(|info| info.total_weight),
        isp,
        comment: Some(describe_inputs(inputs)),
        ..MotorInfo::default()
    };
    stats.apply_to(&base)
}

fn describe_inputs(inputs: &[MergeInput<'_>]) -> String {
    let mut lines = vec!["Synthesized from:".to_string()];
    for (index, input) in inputs.iter().enumerate() {
        let manufacturer = input.info.manufacturer.as_deref().unwrap_or("Unknown");
        let name = input
            .info
            .name
            .clone()
            .unwrap_or_else(|| format!("motor {}", index + 1));
        let mut line = format!("{} x {manufacturer} {name}", input.count);
        if input.offset > 0.0 {
            line.push_str(&format!(" at +{}s", format_trimmed(input.offset, 3)));
        }
        lines.push(line);
    }
    lines.join("\n")
}
