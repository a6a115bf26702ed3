//! Canonical motor data model shared by every codec.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The two built-in motor data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Plain-text ENG format from the RASP simulator.
    #[serde(rename = "RASP", alias = "rasp", alias = "eng")]
    Rasp,
    /// XML RSE format used by RockSim.
    #[serde(rename = "RockSim", alias = "rocksim", alias = "rse")]
    RockSim,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Rasp, Format::RockSim];

    pub const fn name(self) -> &'static str {
        match self {
            Format::Rasp => "RASP",
            Format::RockSim => "RockSim",
        }
    }

    /// Bare file extension (no leading dot).
    pub const fn extension(self) -> &'static str {
        match self {
            Format::Rasp => "eng",
            Format::RockSim => "rse",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Format::Rasp => "text/x-rasp+plain",
            Format::RockSim => "text/x-rse+xml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single thrust-curve sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Seconds since ignition.
    pub time: f64,
    /// Newtons.
    pub thrust: f64,
    /// Remaining propellant (kg), only carried by RockSim data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propellant_weight: Option<f64>,
}

impl Point {
    pub fn new(time: f64, thrust: f64) -> Self {
        Self {
            time,
            thrust,
            propellant_weight: None,
        }
    }
}

/// Motor construction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorType {
    #[serde(rename = "reload")]
    Reload,
    #[serde(rename = "hybrid")]
    Hybrid,
    #[serde(rename = "SU")]
    SingleUse,
}

impl MotorType {
    /// Normalize a free-form type label by its prefix, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_ascii_lowercase();
        if lower.starts_with("rel") {
            Some(MotorType::Reload)
        } else if lower.starts_with("hyb") {
            Some(MotorType::Hybrid)
        } else if lower.starts_with("sin") || lower == "su" {
            Some(MotorType::SingleUse)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MotorType::Reload => "reload",
            MotorType::Hybrid => "hybrid",
            MotorType::SingleUse => "SU",
        }
    }
}

/// Sparse metadata bag. Every present numeric field is MKS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub motor_type: Option<MotorType>,
    /// Metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    /// Metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delays: Option<String>,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propellant_weight: Option<f64>,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_weight: Option<f64>,
    /// Newton-seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_impulse: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_thrust: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_thrust: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_fraction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Result of a successful parse. Always holds at least two points sorted by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMotor {
    pub format: Format,
    pub info: MotorInfo,
    pub points: Vec<Point>,
}

/// Owned copy of `points` ordered by time; the input slice is left untouched.
pub fn sorted_points(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
    sorted
}
