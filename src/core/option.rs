//! Option contract definitions
//!
//! A European option is fully described by its type and five scalars:
//! spot, strike, flat rate, constant volatility and time to expiry in years.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{BSError, BSResult};

/// Day-count basis used to turn calendar days into years
pub const DEFAULT_DAYS_PER_YEAR: f64 = 365.0;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    /// Whether immediate exercise pays anything
    pub fn is_itm(&self, spot: f64, strike: f64) -> bool {
        match self {
            OptionType::Call => spot > strike,
            OptionType::Put => spot < strike,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = BSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(BSError::invalid_input(format!(
                "unknown option type '{}', expected call or put",
                other
            ))),
        }
    }
}

/// European option specification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option type (Call/Put)
    pub option_type: OptionType,
    /// Spot price of the underlying
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Continuously compounded risk-free rate (0.05 = 5%)
    pub rate: f64,
    /// Annualized volatility (0.20 = 20%)
    pub volatility: f64,
    /// Time to expiry in years, 0 for an expired option
    pub time: f64,
}

impl OptionSpec {
    /// Create a validated option specification
    pub fn new(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        time: f64,
    ) -> BSResult<Self> {
        let spec = Self {
            option_type,
            spot,
            strike,
            rate,
            volatility,
            time,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the pricing invariants.
    ///
    /// Volatility may be zero only for an expired option, where it is unused.
    pub fn validate(&self) -> BSResult<()> {
        validate_market(self.spot, self.strike, self.rate, self.time)?;
        ensure_finite("volatility", self.volatility)?;
        if self.time > 0.0 {
            ensure_positive("volatility", self.volatility)?;
        } else if self.volatility < 0.0 {
            return Err(BSError::invalid_input(format!(
                "volatility must be non-negative, got {}",
                self.volatility
            )));
        }
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.time <= 0.0
    }

    pub fn intrinsic(&self) -> f64 {
        self.option_type.intrinsic(self.spot, self.strike)
    }

    /// Discount factor e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time).exp()
    }

    /// Log-moneyness: ln(S/K)
    pub fn log_moneyness(&self) -> f64 {
        (self.spot / self.strike).ln()
    }
}

/// Check spot, strike, rate and time shared by every engine entry point
pub(crate) fn validate_market(spot: f64, strike: f64, rate: f64, time: f64) -> BSResult<()> {
    ensure_positive("spot", spot)?;
    ensure_positive("strike", strike)?;
    ensure_finite("rate", rate)?;
    ensure_finite("time", time)?;
    if time < 0.0 {
        return Err(BSError::invalid_input(format!(
            "time to expiry must be non-negative, got {}",
            time
        )));
    }
    Ok(())
}

pub(crate) fn ensure_finite(name: &str, value: f64) -> BSResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BSError::invalid_input(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

pub(crate) fn ensure_positive(name: &str, value: f64) -> BSResult<()> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(BSError::invalid_input(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

/// Convert a day count into years on the given basis
pub fn years_from_days(days: f64, days_per_year: f64) -> f64 {
    days / days_per_year
}

/// Year fraction between a valuation date and an expiry date.
///
/// Expiries on or before the valuation date give 0 (expired).
pub fn years_between(from: NaiveDate, expiry: NaiveDate, days_per_year: f64) -> f64 {
    let days = (expiry - from).num_days().max(0);
    years_from_days(days as f64, days_per_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_parse_option_type() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" PUT ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("c".parse::<OptionType>().unwrap(), OptionType::Call);
        assert!("straddle".parse::<OptionType>().is_err());
        assert_eq!(OptionType::Put.to_string(), "put");
    }

    #[test]
    fn test_spec_validation() {
        assert!(OptionSpec::new(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 0.5).is_ok());
        // Expired option ignores volatility
        assert!(OptionSpec::new(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.0).is_ok());

        let zero_vol = OptionSpec::new(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.5);
        assert!(matches!(zero_vol, Err(BSError::InvalidInput(_))));

        assert!(OptionSpec::new(OptionType::Put, 0.0, 100.0, 0.05, 0.2, 0.5).is_err());
        assert!(OptionSpec::new(OptionType::Put, 100.0, -1.0, 0.05, 0.2, 0.5).is_err());
        assert!(OptionSpec::new(OptionType::Put, 100.0, 100.0, 0.05, 0.2, -0.1).is_err());
        assert!(OptionSpec::new(OptionType::Put, 100.0, 100.0, f64::NAN, 0.2, 0.5).is_err());
        // Negative rates are allowed
        assert!(OptionSpec::new(OptionType::Put, 100.0, 100.0, -0.01, 0.2, 0.5).is_ok());
    }

    #[test]
    fn test_year_fractions() {
        assert!((years_from_days(30.0, DEFAULT_DAYS_PER_YEAR) - 30.0 / 365.0).abs() < 1e-15);

        let today = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 2, 19).unwrap();
        let t = years_between(today, expiry, DEFAULT_DAYS_PER_YEAR);
        assert!((t - 30.0 / 365.0).abs() < 1e-15);

        assert_eq!(years_between(expiry, today, DEFAULT_DAYS_PER_YEAR), 0.0);
    }

    #[test]
    fn test_moneyness() {
        let spec = OptionSpec::new(OptionType::Call, 110.0, 100.0, 0.05, 0.2, 0.5).unwrap();
        assert!(spec.option_type.is_itm(spec.spot, spec.strike));
        assert!(!OptionType::Put.is_itm(spec.spot, spec.strike));
        assert_eq!(spec.intrinsic(), 10.0);
        assert!(spec.log_moneyness() > 0.0);
    }
}
