//! Numerical engine
//!
//! Implements:
//! - Standard normal CDF / PDF
//! - Black-Scholes pricing and Greeks
//! - Bisection implied volatility

pub mod black_scholes;
pub mod implied_vol;
pub mod normal;

pub use black_scholes::*;
pub use implied_vol::*;
pub use normal::*;
