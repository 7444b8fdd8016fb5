//! Option Greeks
//!
//! First and second order sensitivities in the units consumers expect:
//! theta per year, vega and rho per one percentage point move.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Theta: dV/dt per year
    pub theta: f64,
    /// Vega: dV/dσ per 1% vol move
    pub vega: f64,
    /// Rho: dV/dr per 1% rate move
    pub rho: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Greeks of an expired option: only the exercise indicator survives
    pub fn expired(delta: f64) -> Self {
        Self::new(delta, 0.0, 0.0, 0.0, 0.0)
    }

    /// Theta per calendar day on the given basis
    pub fn theta_per_day(&self, days_per_year: f64) -> f64 {
        self.theta / days_per_year
    }

    /// Scale Greeks by a factor (e.g., for position size)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            theta: self.theta * factor,
            vega: self.vega * factor,
            rho: self.rho * factor,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.theta.is_finite()
            && self.vega.is_finite()
            && self.rho.is_finite()
    }
}

impl Add for Greeks {
    type Output = Greeks;

    fn add(self, other: Greeks) -> Greeks {
        Greeks {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}

/// Aggregated Greeks for a batch of positions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioGreeks {
    /// Quantity-weighted option value
    pub value: f64,
    /// Quantity-weighted Greeks
    pub greeks: Greeks,
    /// Number of positions
    pub num_positions: usize,
}

impl PortfolioGreeks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a position's price and Greeks
    pub fn add_position(&mut self, price: f64, greeks: &Greeks, quantity: f64) {
        self.value += price * quantity;
        self.greeks = self.greeks + greeks.scale(quantity);
        self.num_positions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scale_and_add() {
        let g = Greeks::new(0.5, 0.02, -10.0, 0.1, 0.05);
        let doubled = g.scale(2.0);
        assert_eq!(doubled.delta, 1.0);
        assert_eq!(doubled.theta, -20.0);

        let sum = g + g;
        assert_eq!(sum, doubled);
    }

    #[test]
    fn test_theta_per_day() {
        let g = Greeks::new(0.5, 0.02, -36.5, 0.1, 0.05);
        assert_abs_diff_eq!(g.theta_per_day(365.0), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_portfolio() {
        let mut book = PortfolioGreeks::new();
        book.add_position(2.0, &Greeks::new(0.6, 0.03, -12.0, 0.11, 0.04), 10.0);
        book.add_position(3.0, &Greeks::new(-0.4, 0.03, -8.0, 0.11, -0.05), -5.0);

        assert_eq!(book.num_positions, 2);
        assert_abs_diff_eq!(book.value, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(book.greeks.delta, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(book.greeks.gamma, 0.15, epsilon = 1e-12);
        assert_abs_diff_eq!(book.greeks.rho, 0.65, epsilon = 1e-12);
    }

    #[test]
    fn test_expired() {
        let g = Greeks::expired(-1.0);
        assert_eq!(g.delta, -1.0);
        assert_eq!(g.gamma + g.theta + g.vega + g.rho, 0.0);
        assert!(g.is_finite());
    }
}
