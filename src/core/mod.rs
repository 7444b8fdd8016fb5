//! Core data types for the Black-Scholes engine
//!
//! Defines fundamental types:
//! - OptionType / OptionSpec: contract and market inputs
//! - Greeks / PortfolioGreeks: sensitivities
//! - PricingResult / IvSolution: engine output
//! - BSError: error type

pub mod error;
pub mod greeks;
pub mod option;
pub mod result;

pub use error::*;
pub use greeks::*;
pub use option::*;
pub use result::*;
