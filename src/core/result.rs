//! Pricing results
//!
//! Value records returned by the engine. Nothing here outlives one calculation.

use serde::{Deserialize, Serialize};

use super::greeks::Greeks;
use super::option::OptionSpec;

/// Outcome of a bisection implied-volatility search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvSolution {
    /// Recovered volatility
    pub vol: f64,
    /// Pricing evaluations used
    pub iterations: usize,
    /// False when the iteration cap was hit and `vol` is the last bracket midpoint
    pub converged: bool,
}

/// Price and Greeks for one option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Contract the figures were computed for, with the volatility actually used
    pub spec: OptionSpec,
    pub price: f64,
    pub greeks: Greeks,
    /// Set when the volatility was solved from a market price
    pub implied_vol: Option<f64>,
    /// Solver diagnostics in implied-volatility mode
    pub solver: Option<IvSolution>,
}

impl PricingResult {
    /// Result for a directly supplied volatility
    pub fn priced(spec: OptionSpec, price: f64, greeks: Greeks) -> Self {
        Self {
            spec,
            price,
            greeks,
            implied_vol: None,
            solver: None,
        }
    }

    /// Result for a volatility recovered from a market price
    pub fn implied(spec: OptionSpec, price: f64, greeks: Greeks, solution: IvSolution) -> Self {
        Self {
            spec,
            price,
            greeks,
            implied_vol: Some(solution.vol),
            solver: Some(solution),
        }
    }

    /// Time value: price above intrinsic
    pub fn time_value(&self) -> f64 {
        self.price - self.spec.intrinsic()
    }
}
