//! Implied volatility solver
//!
//! Plain bisection over the Black-Scholes price. Price is monotonically
//! increasing in volatility for T > 0, so the bracket always shrinks towards
//! the root. No Newton or Brent acceleration is applied: iteration counts are
//! part of the observable behaviour.

use tracing::{debug, warn};

use crate::config::SolverConfig;
use crate::core::option::{ensure_finite, validate_market};
use crate::core::{BSError, BSResult, IvSolution, OptionType};

use super::black_scholes::price;

/// No-arbitrage lower bound on the option price
///
/// Call: max(S - K·e^(-rT), 0). Put: max(K·e^(-rT) - S, 0).
pub fn intrinsic_floor(option_type: OptionType, spot: f64, strike: f64, rate: f64, time: f64) -> f64 {
    let discounted_strike = strike * (-rate * time).exp();
    option_type.intrinsic(spot, discounted_strike)
}

/// Recover the volatility that reproduces `market_price`.
///
/// Returns `Ok(None)` when the price sits below the no-arbitrage floor: no
/// volatility can produce it. Hitting `max_iterations` is not an error; the
/// last bracket midpoint comes back with `converged == false`.
pub fn implied_volatility(
    option_type: OptionType,
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
    config: &SolverConfig,
) -> BSResult<Option<IvSolution>> {
    config.validate()?;
    validate_market(spot, strike, rate, time)?;
    ensure_finite("market price", market_price)?;
    if time <= 0.0 {
        return Err(BSError::invalid_input(
            "implied volatility needs a positive time to expiry",
        ));
    }

    let floor = intrinsic_floor(option_type, spot, strike, rate, time);
    if market_price < floor {
        debug!(market_price, floor, "market price below no-arbitrage floor");
        return Ok(None);
    }

    let mut low = config.vol_low;
    let mut high = config.vol_high;

    for iteration in 0..config.max_iterations {
        let mid = 0.5 * (low + high);
        let diff = price(option_type, spot, strike, rate, mid, time)? - market_price;

        if diff.abs() < config.tolerance {
            debug!(vol = mid, iterations = iteration + 1, "implied volatility converged");
            return Ok(Some(IvSolution {
                vol: mid,
                iterations: iteration + 1,
                converged: true,
            }));
        }

        if diff > 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    let vol = 0.5 * (low + high);
    warn!(
        vol,
        max_iterations = config.max_iterations,
        market_price,
        "implied volatility did not reach tolerance, returning bracket midpoint"
    );
    Ok(Some(IvSolution {
        vol,
        iterations: config.max_iterations,
        converged: false,
    }))
}

/// [`implied_volatility`] with default solver settings, volatility only
pub fn implied_volatility_default(
    option_type: OptionType,
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
) -> BSResult<Option<f64>> {
    let solution = implied_volatility(
        option_type,
        market_price,
        spot,
        strike,
        rate,
        time,
        &SolverConfig::default(),
    )?;
    Ok(solution.map(|s| s.vol))
}
