use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::collection::DEFAULT_TOLERANCE;
use crate::error::{Error, Result};

fn default_tolerance() -> f64 {
  DEFAULT_TOLERANCE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceOverride {
  /// Path relative to the batch input directory.
  pub name: String,
  pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
  #[serde(default = "default_tolerance")]
  pub tolerance: f64,
  #[serde(default)]
  pub overrides: Vec<ToleranceOverride>,
}

impl Default for BatchConfig {
  fn default() -> Self {
    BatchConfig {
      tolerance: DEFAULT_TOLERANCE,
      overrides: Vec::new(),
    }
  }
}

impl BatchConfig {
  pub fn from_path(path: &Path) -> Result<BatchConfig> {
    let config: BatchConfig = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if !self.tolerance.is_finite() {
      return Err(Error::InvalidConfig(format!(
        "tolerance must be a finite number, got {}",
        self.tolerance
      )));
    }
    for o in &self.overrides {
      if !o.tolerance.is_finite() {
        return Err(Error::InvalidConfig(format!(
          "tolerance for {} must be a finite number, got {}",
          o.name, o.tolerance
        )));
      }
    }
    Ok(())
  }

  /// The tolerance for a file, given its path relative to the input
  /// directory. The last matching override wins.
  pub fn tolerance_for(&self, relative: &Path) -> f64 {
    self
      .overrides
      .iter()
      .rev()
      .find(|o| Path::new(&o.name) == relative)
      .map_or(self.tolerance, |o| o.tolerance)
  }
}
