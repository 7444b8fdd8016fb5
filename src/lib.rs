//! # BS Options - Black-Scholes European Option Engine
//!
//! Deterministic pricing, Greeks and implied volatility for European calls
//! and puts under constant volatility and a flat risk-free rate.
//!
//! ## Key Components
//!
//! - **Normal distribution**: rational-polynomial CDF, exact PDF
//! - **Black-Scholes**: d1/d2, closed-form price and Greeks
//! - **Implied volatility**: bisection over the pricing function
//! - **Calculator**: one request in, price + Greeks (+ implied vol) out
//! - **Batch**: CSV rows priced in parallel with portfolio totals
//!
//! ## Usage
//!
//! ```rust
//! use bs_options::prelude::*;
//!
//! let time = 30.0 / 365.0;
//! let call = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.20, time).unwrap();
//! let greeks = bs_greeks(OptionType::Call, 100.0, 100.0, 0.05, 0.20, time).unwrap();
//! assert!(greeks.delta > 0.5 && greeks.delta < 0.6);
//!
//! let iv = implied_volatility_default(OptionType::Call, call, 100.0, 100.0, 0.05, time)
//!     .unwrap()
//!     .expect("price is above the no-arbitrage floor");
//! assert!((iv - 0.20).abs() < 5e-4);
//! ```
//!
//! ## Units
//!
//! - Rates and volatilities are decimals (0.05 = 5%)
//! - Time is in years; theta is per year
//! - Vega and rho are per one percentage point move
//!
//! ## What This Engine Does NOT Do
//!
//! - American exercise
//! - Dividends
//! - Term structures or volatility surfaces

pub mod calculator;
pub mod config;
pub mod core;
pub mod data;
pub mod models;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::core::{
        years_between, years_from_days, BSError, BSResult, Greeks, IvSolution, OptionSpec,
        OptionType, PortfolioGreeks, PricingResult,
    };

    pub use crate::calculator::{evaluate, evaluate_batch, PricingRequest, VolInput};
    pub use crate::config::{DayCountConfig, EngineConfig, SolverConfig};

    pub use crate::models::{
        d1, d2, greeks as bs_greeks, implied_volatility, implied_volatility_default,
        intrinsic_floor, norm_cdf, norm_pdf, parity_gap, parity_residual, price as bs_price,
    };
}

pub use crate::core::{BSError, BSResult};
