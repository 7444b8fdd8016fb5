//! Engine configuration
//!
//! Solver settings and the day-count basis, loadable from a TOML file:
//!
//! ```toml
//! [solver]
//! tolerance = 1e-6
//! max_iterations = 200
//!
//! [day_count]
//! days_per_year = 365.0
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{years_between, years_from_days, BSError, BSResult, DEFAULT_DAYS_PER_YEAR};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Implied volatility bisection settings
    pub solver: SolverConfig,
    /// Calendar-day to year conversion
    pub day_count: DayCountConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> BSResult<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> BSResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Load from a TOML file, or defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> BSResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> BSResult<()> {
        self.solver.validate()?;
        self.day_count.validate()
    }
}

/// Bisection solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Absolute price tolerance for early exit
    /// Default: 1e-4
    pub tolerance: f64,

    /// Iteration cap; on exhaustion the last bracket midpoint is returned
    /// Default: 100
    pub max_iterations: usize,

    /// Lower end of the volatility bracket
    /// Default: 0.001
    pub vol_low: f64,

    /// Upper end of the volatility bracket
    /// Default: 5.0
    pub vol_high: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 100,
            vol_low: 0.001,
            vol_high: 5.0,
        }
    }
}

impl SolverConfig {
    /// Tight tolerance for reconciliation work
    pub fn precise() -> Self {
        Self {
            tolerance: 1e-8,
            max_iterations: 200,
            ..Default::default()
        }
    }

    /// Loose tolerance for quick screening
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 30,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> BSResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(BSError::config(format!(
                "solver tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(BSError::config("solver max_iterations must be at least 1"));
        }
        if !(self.vol_low > 0.0 && self.vol_low < self.vol_high && self.vol_high.is_finite()) {
            return Err(BSError::config(format!(
                "volatility bracket must satisfy 0 < low < high, got [{}, {}]",
                self.vol_low, self.vol_high
            )));
        }
        Ok(())
    }
}

/// Day-count configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCountConfig {
    /// Days in a year for time-to-expiry and per-day theta
    /// Default: 365
    pub days_per_year: f64,
}

impl Default for DayCountConfig {
    fn default() -> Self {
        Self {
            days_per_year: DEFAULT_DAYS_PER_YEAR,
        }
    }
}

impl DayCountConfig {
    pub fn years_from_days(&self, days: f64) -> f64 {
        years_from_days(days, self.days_per_year)
    }

    pub fn years_between(&self, from: NaiveDate, expiry: NaiveDate) -> f64 {
        years_between(from, expiry, self.days_per_year)
    }

    pub fn validate(&self) -> BSResult<()> {
        if self.days_per_year.is_finite() && self.days_per_year > 0.0 {
            Ok(())
        } else {
            Err(BSError::config(format!(
                "days_per_year must be positive, got {}",
                self.days_per_year
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.solver.tolerance, 1e-4);
        assert_eq!(config.solver.max_iterations, 100);
        assert_eq!(config.solver.vol_low, 0.001);
        assert_eq!(config.solver.vol_high, 5.0);
        assert_eq!(config.day_count.days_per_year, 365.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            [solver]
            tolerance = 1e-6
            "#,
        )
        .unwrap();

        assert_eq!(config.solver.tolerance, 1e-6);
        assert_eq!(config.solver.max_iterations, 100);
        assert_eq!(config.day_count, DayCountConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = EngineConfig::from_toml_str("[solver]\nvol_low = 6.0\n").unwrap_err();
        assert!(matches!(err, BSError::Config(_)));

        let err = EngineConfig::from_toml_str("[day_count]\ndays_per_year = 0.0\n").unwrap_err();
        assert!(matches!(err, BSError::Config(_)));

        assert!(EngineConfig::from_toml_str("solver = 3").is_err());
    }

    #[test]
    fn test_presets() {
        assert!(SolverConfig::precise().validate().is_ok());
        assert!(SolverConfig::fast().validate().is_ok());
        assert!(SolverConfig::precise().tolerance < SolverConfig::fast().tolerance);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = EngineConfig::load_or_default("does/not/exist/bs-options.toml").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
