//! Calculator facade
//!
//! Turns one request (type, S, K, r, T plus either a volatility or an
//! observed price) into a full [`PricingResult`]. In implied-volatility mode
//! the solved volatility feeds both the pricer and the Greeks.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SolverConfig;
use crate::core::{BSResult, OptionSpec, OptionType, PricingResult};
use crate::models::{greeks_spec, implied_volatility, price_spec};

/// Where the volatility comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolInput {
    /// Price with a known volatility
    Volatility(f64),
    /// Solve the volatility from an observed option price
    MarketPrice(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub option_type: OptionType,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    /// Years to expiry
    pub time: f64,
    pub input: VolInput,
}

impl PricingRequest {
    pub fn with_volatility(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        vol: f64,
        time: f64,
    ) -> Self {
        Self {
            option_type,
            spot,
            strike,
            rate,
            time,
            input: VolInput::Volatility(vol),
        }
    }

    pub fn with_market_price(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        market_price: f64,
        time: f64,
    ) -> Self {
        Self {
            option_type,
            spot,
            strike,
            rate,
            time,
            input: VolInput::MarketPrice(market_price),
        }
    }
}

/// Evaluate a single request.
///
/// `Ok(None)` means the market price lies below the no-arbitrage floor.
pub fn evaluate(request: &PricingRequest, solver: &SolverConfig) -> BSResult<Option<PricingResult>> {
    match request.input {
        VolInput::Volatility(vol) => {
            let spec = OptionSpec::new(
                request.option_type,
                request.spot,
                request.strike,
                request.rate,
                vol,
                request.time,
            )?;
            Ok(Some(PricingResult::priced(
                spec,
                price_spec(&spec)?,
                greeks_spec(&spec)?,
            )))
        }
        VolInput::MarketPrice(market_price) => {
            let solution = implied_volatility(
                request.option_type,
                market_price,
                request.spot,
                request.strike,
                request.rate,
                request.time,
                solver,
            )?;
            let Some(solution) = solution else {
                return Ok(None);
            };

            let spec = OptionSpec::new(
                request.option_type,
                request.spot,
                request.strike,
                request.rate,
                solution.vol,
                request.time,
            )?;
            Ok(Some(PricingResult::implied(
                spec,
                price_spec(&spec)?,
                greeks_spec(&spec)?,
                solution,
            )))
        }
    }
}

/// Evaluate many independent requests in parallel, preserving input order
pub fn evaluate_batch(
    requests: &[PricingRequest],
    solver: &SolverConfig,
) -> Vec<BSResult<Option<PricingResult>>> {
    debug!(rows = requests.len(), "evaluating batch");
    requests
        .par_iter()
        .map(|request| evaluate(request, solver))
        .collect()
}
