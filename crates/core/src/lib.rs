//! Core units, constants, and shared primitives for the motor data workspace.

mod diagnostics;
mod model;
mod number;

pub use diagnostics::{Diagnostic, Diagnostics, ErrorCode, ErrorCollector, LogCollector};
pub use model::{Format, MotorInfo, MotorType, ParsedMotor, Point, sorted_points};
pub use number::{format_trimmed, parse_number};

/// Physical and format constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Minimum time advance between consecutive RASP points (s).
    pub const RASP_TIME_EPSILON: f64 = 1e-5;
    /// Minimum time advance between consecutive RockSim points (s).
    pub const ROCKSIM_TIME_EPSILON: f64 = 5e-5;
    /// Thrust below this value is treated as no thrust at all (N).
    pub const MIN_THRUST: f64 = 0.001;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert millimetres to metres.
    #[inline]
    pub fn mm_to_m(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert metres to millimetres.
    #[inline]
    pub fn m_to_mm(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert grams to kilograms.
    #[inline]
    pub fn g_to_kg(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert kilograms to grams.
    #[inline]
    pub fn kg_to_g(v: f64) -> f64 {
        v * 1_000.0
    }
}
