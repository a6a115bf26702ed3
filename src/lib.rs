//! Motor data file codecs and thrust-curve synthesis.
//!
//! The workspace crates are re-exported here so front-ends (CLI, web, tests)
//! depend on a single library.

pub use motor_config as config;
pub use motor_export as export;
pub use motor_format as format;
pub use motor_info as info;
pub use motor_merge as merge;
pub use motor_rasp as rasp;
pub use motor_rocksim as rocksim;

pub use motor_core::{constants, units};
pub use motor_core::{
    Diagnostic, Diagnostics, ErrorCode, ErrorCollector, Format, LogCollector, MotorInfo,
    MotorType, ParsedMotor, Point,
};
pub use motor_format::{
    FormatInfo, combine_data, format_info, guess_format, parse_data, print_data,
};
pub use motor_info::{CurveInfo, InfoError, compute_info};
pub use motor_merge::{MergeInput, MergedMotor, merge_data};
