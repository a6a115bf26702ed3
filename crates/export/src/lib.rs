//! Export helpers for CSV and JSON thrust-curve artifacts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub mod curve {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use motor_core::{MotorInfo, Point};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use super::ExportError;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write `time_s,thrust_n` rows, plus `propellant_kg` when any point carries a mass.
    pub fn write_points_csv<W: Write>(writer: W, points: &[Point]) -> Result<(), ExportError> {
        let with_mass = points.iter().any(|p| p.propellant_weight.is_some());
        let mut csv = csv::Writer::from_writer(writer);
        if with_mass {
            csv.write_record(["time_s", "thrust_n", "propellant_kg"])?;
        } else {
            csv.write_record(["time_s", "thrust_n"])?;
        }
        for point in points {
            let time = point.time.to_string();
            let thrust = point.thrust.to_string();
            if with_mass {
                let mass = point
                    .propellant_weight
                    .map(|kg| kg.to_string())
                    .unwrap_or_default();
                csv.write_record([time, thrust, mass])?;
            } else {
                csv.write_record([time, thrust])?;
            }
        }
        csv.flush()?;
        Ok(())
    }

    #[derive(Serialize)]
    struct CurveDocument<'a> {
        info: &'a MotorInfo,
        points: &'a [Point],
    }

    /// Write the `{info, points}` document consumed by graphing front ends.
    pub fn write_json<W: Write>(
        mut writer: W,
        info: &MotorInfo,
        points: &[Point],
    ) -> Result<(), ExportError> {
        to_writer_pretty(&mut writer, &CurveDocument { info, points })?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
