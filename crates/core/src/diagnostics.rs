//! Error codes and the collector sink every codec reports through.
//!
//! Codecs never fail with `Err` on malformed input. Fatal problems produce no
//! result and a report here; warnings are reported while a result is still
//! returned.

use std::fmt;

use thiserror::Error;

/// Anomaly categories reported by the codecs and the merge engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    DataFileEmpty,
    DataFileFormat,
    RaspInfoLine,
    RocksimBadXml,
    RocksimWrongDoc,
    InvalidInfo,
    InvalidPoints,
    MissingPoints,
    MultipleMotors,
    BadMotorData,
    BadMotorInfo,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DataFileEmpty => "DATA_FILE_EMPTY",
            ErrorCode::DataFileFormat => "DATA_FILE_FORMAT",
            ErrorCode::RaspInfoLine => "RASP_INFO_LINE",
            ErrorCode::RocksimBadXml => "ROCKSIM_BAD_XML",
            ErrorCode::RocksimWrongDoc => "ROCKSIM_WRONG_DOC",
            ErrorCode::InvalidInfo => "INVALID_INFO",
            ErrorCode::InvalidPoints => "INVALID_POINTS",
            ErrorCode::MissingPoints => "MISSING_POINTS",
            ErrorCode::MultipleMotors => "MULTIPLE_MOTORS",
            ErrorCode::BadMotorData => "BAD_MOTOR_DATA",
            ErrorCode::BadMotorInfo => "BAD_MOTOR_INFO",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
}

/// Sink receiving every anomaly found while parsing, printing, or merging.
pub trait ErrorCollector {
    fn error(&mut self, code: ErrorCode, message: String);
}

impl<F> ErrorCollector for F
where
    F: FnMut(ErrorCode, String),
{
    fn error(&mut self, code: ErrorCode, message: String) {
        self(code, message)
    }
}

/// Collector that keeps every report in order.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Codes in report order, duplicates included.
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.entries.iter().map(|d| d.code).collect()
    }

    pub fn contains(&self, code: ErrorCode) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }
}

impl ErrorCollector for Diagnostics {
    fn error(&mut self, code: ErrorCode, message: String) {
        self.entries.push(Diagnostic { code, message });
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Collector that forwards every report to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCollector;

impl ErrorCollector for LogCollector {
    fn error(&mut self, code: ErrorCode, message: String) {
        log::warn!("{code}: {message}");
    }
}
