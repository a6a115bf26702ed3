//! Summary statistics derived from a raw thrust curve.
//!
//! Impulse classes follow the doubling scheme starting at 1.25 N·s; the
//! class letters and the thrust suffix must match designations already
//! stored elsewhere, so the formatting here is exact.

use motor_core::{MotorInfo, Point, sorted_points};
use thiserror::Error;

/// Both burn time and total impulse must exceed this to be usable.
const MIN_USABLE: f64 = 0.001;
/// Upper impulse bound of class "A" is twice this value.
const BASE_IMPULSE: f64 = 1.25;

/// Statistics computed from a point series.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveInfo {
    pub burn_time: f64,
    pub max_thrust: f64,
    pub total_impulse: f64,
    pub avg_thrust: f64,
    /// Letter class such as "K".
    pub impulse_class: String,
    /// Conventional name such as "K550".
    pub designation: String,
}

impl CurveInfo {
    /// Copy of `info` with the statistics and designation filled in.
    pub fn apply_to(&self, info: &MotorInfo) -> MotorInfo {
        MotorInfo {
            name: Some(self.designation.clone()),
            total_impulse: Some(self.total_impulse),
            avg_thrust: Some(self.avg_thrust),
            max_thrust: Some(self.max_thrust),
            burn_time: Some(self.burn_time),
            ..info.clone()
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InfoError {
    #[error("at least two points are required, got {0}")]
    TooFewPoints(usize),
    #[error("no usable time/thrust data (burn time {burn_time:.4} s, impulse {total_impulse:.4} Ns)")]
    NoUsableData { burn_time: f64, total_impulse: f64 },
}

/// Compute burn time, peak/average thrust, total impulse, and designation.
///
/// Points are sorted on a private copy. The first point is integrated from an
/// implicit (0, 0) sample.
pub fn compute_info(points: &[Point]) -> Result<CurveInfo, InfoError> {
    if points.len() < 2 {
        return Err(InfoError::TooFewPoints(points.len()));
    }
    let sorted = sorted_points(points);

    let mut burn_time = 0.0_f64;
    let mut max_thrust = 0.0_f64;
    let mut total_impulse = 0.0_f64;
    let (mut prev_time, mut prev_thrust) = (0.0_f64, 0.0_f64);
    for point in &sorted {
        burn_time = burn_time.max(point.time);
        max_thrust = max_thrust.max(point.thrust);
        total_impulse += (point.time - prev_time) * (point.thrust + prev_thrust) / 2.0;
        prev_time = point.time;
        prev_thrust = point.thrust;
    }

    if burn_time <= MIN_USABLE || total_impulse <= MIN_USABLE {
        return Err(InfoError::NoUsableData {
            burn_time,
            total_impulse,
        });
    }

    let avg_thrust = total_impulse / burn_time;
    let impulse_class = impulse_class(total_impulse);
    let designation = format!("{}{}", impulse_class, format_avg_thrust(avg_thrust));
    log::debug!(
        "computed {designation}: {total_impulse:.3} Ns over {burn_time:.3} s from {} points",
        sorted.len()
    );

    Ok(CurveInfo {
        burn_time,
        max_thrust,
        total_impulse,
        avg_thrust,
        impulse_class,
        designation,
    })
}

/// Letter class for a total impulse (N·s).
pub fn impulse_class(total_impulse: f64) -> String {
    let mut threshold = BASE_IMPULSE;
    let mut index = 0;
    while total_impulse > threshold * 2.0 {
        threshold *= 2.0;
        index += 1;
    }
    class_label(index)
}

/// Spreadsheet-style label: 0 → "A", 25 → "Z", 26 → "AA", 27 → "AB".
pub fn class_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// Average thrust suffix: one decimal below 2 N, whole newtons below 10,000 N,
/// comma-grouped whole newtons above that.
pub fn format_avg_thrust(avg_thrust: f64) -> String {
    if avg_thrust < 2.0 {
        format!("{avg_thrust:.1}")
    } else if avg_thrust < 10_000.0 {
        format!("{}", avg_thrust.round() as i64)
    } else {
        group_thousands(avg_thrust.round() as i64)
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
