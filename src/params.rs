//! Parameter metadata for the detection config
//!
//! This module provides metadata about detection parameters, enabling:
//! - Grid search optimization
//! - Parameter documentation
//! - Automatic configuration UI generation
//!
//! # Example
//!
//! ```rust
//! use triggerbar::params::param_meta;
//!
//! for param in param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{
  detectors::{ElephantConfig, EngulfingConfig, SwingConfig, TailConfig},
  DetectionConfig, PatternError, Percent, Period, Result,
};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// ATR multiple (non-negative float)
  Multiple,
  /// Percentage value (0.0..=100.0)
  Percent,
  /// Bar count (positive integer)
  Count,
  /// Boolean flag encoded as 0.0 / 1.0
  Toggle,
}

/// Metadata for a single detection parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "elephant_min_size")
  pub name: &'static str,
  /// Parameter type
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  pub const fn multiple(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Multiple, default, range, description }
  }

  pub const fn percent(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Percent, default, range, description }
  }

  pub const fn count(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Count, default, range, description }
  }

  pub const fn toggle(name: &'static str, default: bool, description: &'static str) -> Self {
    Self {
      name,
      param_type: ParamType::Toggle,
      default: if default { 1.0 } else { 0.0 },
      range: (0.0, 1.0, 1.0),
      description,
    }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value.is_nan() || value < min || value > max {
      return Err(PatternError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Multiple | ParamType::Percent => Ok(()),
      ParamType::Count => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(PatternError::InvalidValue("Count must be a positive integer"));
        }
        Ok(())
      },
      ParamType::Toggle => {
        if value != 0.0 && value != 1.0 {
          return Err(PatternError::InvalidValue("Toggle must be 0 or 1"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// DETECTION PARAMETER TABLE
// ============================================================

static DETECTION_PARAMS: &[ParamMeta] = &[
  ParamMeta::count("atr_period", 14.0, (2.0, 100.0, 1.0), "ATR smoothing period"),
  ParamMeta::toggle("detect_elephant_bars", true, "Detect elephant bars"),
  ParamMeta::multiple(
    "elephant_min_size",
    1.3,
    (0.1, 5.0, 0.1),
    "Candle minimum size (ATR multiple)",
  ),
  ParamMeta::percent(
    "elephant_body_percent",
    70.0,
    (0.1, 100.0, 0.1),
    "Candle body size percentage",
  ),
  ParamMeta::toggle("detect_tail_bars", true, "Detect tail bars"),
  ParamMeta::multiple("tail_min_size", 1.0, (0.1, 10.0, 0.1), "Minimum size (ATR multiple)"),
  ParamMeta::percent("tail_min_percent", 75.0, (0.1, 100.0, 0.1), "Minimum tail percentage"),
  ParamMeta::toggle("tail_color_matters", false, "Color tail markers by bar direction"),
  ParamMeta::toggle("detect_engulfing_bars", true, "Detect engulfing bars"),
  ParamMeta::multiple(
    "float_allowance",
    0.0,
    (0.0, 10.0, 0.1),
    "Gap tolerance on the open comparison (reserved)",
  ),
  ParamMeta::multiple(
    "engulfing_min_size",
    1.0,
    (0.0, 10.0, 0.1),
    "Minimum size (ATR multiple)",
  ),
  ParamMeta::toggle("engulf_wick", false, "Wick needs to be engulfed as well"),
  ParamMeta::toggle("detect_swing_high_low", true, "Detect swing highs/lows"),
  ParamMeta::count("swing_lookback", 10.0, (1.0, 100.0, 1.0), "Swing lookback"),
  ParamMeta::count(
    "swing_confirmation_bars",
    1.0,
    (1.0, 10.0, 1.0),
    "Swing confirmation bars (reserved)",
  ),
];

/// Metadata for every configurable detection parameter
pub fn param_meta() -> &'static [ParamMeta] {
  DETECTION_PARAMS
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Percent from params with default fallback
pub fn get_percent(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Percent> {
  let value = params.get(key).copied().unwrap_or(default);
  Percent::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  Period::new(value as usize)
}

/// Helper to get a boolean flag from params with default fallback.
/// Any nonzero value reads as true.
pub fn get_flag(params: &HashMap<&str, f64>, key: &str, default: bool) -> bool {
  params.get(key).map(|v| *v != 0.0).unwrap_or(default)
}

fn get_value(params: &HashMap<&str, f64>, key: &str, default: f64) -> f64 {
  params.get(key).copied().unwrap_or(default)
}

impl DetectionConfig {
  /// Creates a detection config from a name/value map.
  ///
  /// Missing parameters use their default values; the assembled config is
  /// validated against the documented ranges before it is returned.
  pub fn from_params(params: &HashMap<&str, f64>) -> Result<Self> {
    let config = Self {
      atr_period: get_period(params, "atr_period", 14)?,
      elephant: ElephantConfig {
        enabled: get_flag(params, "detect_elephant_bars", true),
        min_size: get_value(params, "elephant_min_size", 1.3),
        body_percent: get_percent(params, "elephant_body_percent", 70.0)?,
      },
      tail: TailConfig {
        enabled: get_flag(params, "detect_tail_bars", true),
        min_size: get_value(params, "tail_min_size", 1.0),
        min_percent: get_percent(params, "tail_min_percent", 75.0)?,
        color_matters: get_flag(params, "tail_color_matters", false),
      },
      engulfing: EngulfingConfig {
        enabled: get_flag(params, "detect_engulfing_bars", true),
        float_allowance: get_value(params, "float_allowance", 0.0),
        min_size: get_value(params, "engulfing_min_size", 1.0),
        engulf_wick: get_flag(params, "engulf_wick", false),
      },
      swing: SwingConfig {
        enabled: get_flag(params, "detect_swing_high_low", true),
        lookback: get_period(params, "swing_lookback", 10)?,
        confirmation_bars: get_value(params, "swing_confirmation_bars", 1.0) as usize,
      },
    };
    config.validate()?;
    Ok(config)
  }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_param_meta_percent() {
    let meta = ParamMeta::percent("test_percent", 70.0, (0.1, 100.0, 0.1), "Test percent");

    assert_eq!(meta.name, "test_percent");
    assert_eq!(meta.param_type, ParamType::Percent);
    assert_eq!(meta.default, 70.0);
  }

  #[test]
  fn test_param_meta_toggle() {
    let meta = ParamMeta::toggle("test_toggle", true, "Test toggle");

    assert_eq!(meta.param_type, ParamType::Toggle);
    assert_eq!(meta.default, 1.0);
    assert!(meta.validate(0.0).is_ok());
    assert!(meta.validate(1.0).is_ok());
    assert!(meta.validate(0.5).is_err());
  }

  #[test]
  fn test_generate_grid() {
    let meta = ParamMeta::percent("test", 0.5, (0.3, 0.7, 0.2), "Test");

    let grid = meta.generate_grid();
    assert_eq!(grid.len(), 3);
    assert!((grid[0] - 0.3).abs() < f64::EPSILON);
    assert!((grid[1] - 0.5).abs() < f64::EPSILON);
    assert!((grid[2] - 0.7).abs() < f64::EPSILON);
  }

  #[test]
  fn test_validate_count() {
    let meta = ParamMeta::count("test", 14.0, (2.0, 100.0, 1.0), "Test");

    assert!(meta.validate(14.0).is_ok());
    assert!(meta.validate(2.0).is_ok());
    assert!(meta.validate(100.0).is_ok());
    assert!(meta.validate(1.0).is_err());
    assert!(meta.validate(101.0).is_err());
    assert!(meta.validate(14.5).is_err());
  }

  #[test]
  fn test_param_table_covers_defaults() {
    // every table default round-trips through from_params unchanged
    let config = DetectionConfig::from_params(&HashMap::new()).unwrap();
    let defaults = DetectionConfig::default();
    assert_eq!(config.atr_period, defaults.atr_period);
    assert_eq!(config.elephant.min_size, defaults.elephant.min_size);
    assert_eq!(config.tail.min_percent, defaults.tail.min_percent);
    assert_eq!(config.swing.lookback, defaults.swing.lookback);
  }

  #[test]
  fn test_from_params_overrides() {
    let mut params = HashMap::new();
    params.insert("elephant_min_size", 2.0);
    params.insert("detect_tail_bars", 0.0);
    params.insert("swing_lookback", 5.0);

    let config = DetectionConfig::from_params(&params).unwrap();
    assert_eq!(config.elephant.min_size, 2.0);
    assert!(!config.tail.enabled);
    assert_eq!(config.swing.lookback.get(), 5);
    // untouched families keep defaults
    assert!(config.engulfing.enabled);
  }

  #[test]
  fn test_from_params_rejects_out_of_range() {
    let mut params = HashMap::new();
    params.insert("elephant_min_size", 50.0);
    assert!(DetectionConfig::from_params(&params).is_err());
  }

  #[test]
  fn test_get_flag_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 1.0);
    params.insert("key2", 0.0);

    assert!(get_flag(&params, "key1", false));
    assert!(!get_flag(&params, "key2", true));
    assert!(get_flag(&params, "key3", true));
  }

  #[test]
  fn test_get_percent_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 80.0);

    assert!((get_percent(&params, "key1", 50.0).unwrap().get() - 80.0).abs() < f64::EPSILON);
    assert!((get_percent(&params, "key2", 50.0).unwrap().get() - 50.0).abs() < f64::EPSILON);
    params.insert("bad", 120.0);
    assert!(get_percent(&params, "bad", 50.0).is_err());
  }

  #[test]
  fn test_get_period_helper() {
    let mut params = HashMap::new();
    params.insert("key1", 20.0);

    assert_eq!(get_period(&params, "key1", 14).unwrap().get(), 20);
    assert_eq!(get_period(&params, "key2", 14).unwrap().get(), 14);
  }
}
