//! Merge manifests: which motor files to combine, how many of each, and when
//! each one ignites.

use std::fs::File;
use std::path::{Path, PathBuf};

use motor_core::Format;
use serde::Deserialize;
use thiserror::Error;

/// A merge job read from YAML or TOML.
#[derive(Debug, Deserialize, Clone)]
pub struct MergeManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_output_format")]
    pub output_format: Format,
    pub motors: Vec<MotorEntry>,
}

/// One contributing motor file.
#[derive(Debug, Deserialize, Clone)]
pub struct MotorEntry {
    pub file: PathBuf,
    /// Guessed from the extension or contents when absent.
    #[serde(default)]
    pub format: Option<Format>,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default)]
    pub offset: f64,
}

fn default_output_format() -> Format {
    Format::Rasp
}

fn default_count() -> u32 {
    1
}

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid manifest: {0}")]
    Invalid(String),
}

/// Load and validate a manifest. Relative motor paths are resolved against
/// the manifest's directory.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<MergeManifest, ConfigError> {
    let path = path.as_ref();
    let mut manifest: MergeManifest = if path.extension().map(|ext| ext == "toml").unwrap_or(false)
    {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    manifest.validate()?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    manifest.resolve_relative_to(base);
    Ok(manifest)
}

impl MergeManifest {
    /// Check counts, offsets, and that at least one motor is listed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motors.is_empty() {
            return Err(ConfigError::Invalid("no motors listed".to_string()));
        }
        for entry in &self.motors {
            if entry.count == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: count must be at least 1",
                    entry.file.display()
                )));
            }
            if !entry.offset.is_finite() || entry.offset < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{}: offset must be a non-negative number of seconds",
                    entry.file.display()
                )));
            }
        }
        Ok(())
    }

    /// Prefix every relative motor path with `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for entry in &mut self.motors {
            if entry.file.is_relative() {
                entry.file = base.join(&entry.file);
            }
        }
    }
}
