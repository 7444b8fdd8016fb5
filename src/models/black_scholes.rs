//! Black-Scholes Model
//!
//! Provides:
//! - d1 / d2 intermediates
//! - European option pricing
//! - Greeks computation
//!
//! Every entry point validates its inputs and fails with
//! [`BSError::InvalidInput`] instead of producing NaN or infinity.

use crate::core::{BSError, BSResult, Greeks, OptionSpec, OptionType};

use super::normal::{norm_cdf, norm_pdf};

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> BSResult<f64> {
    let spec = OptionSpec::new(OptionType::Call, spot, strike, rate, vol, time)?;
    if spec.is_expired() {
        return Err(BSError::invalid_input(
            "d1 is undefined for a non-positive time to expiry",
        ));
    }
    ensure_numeric("d1", d1_d2(&spec).0)
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> BSResult<f64> {
    let spec = OptionSpec::new(OptionType::Call, spot, strike, rate, vol, time)?;
    if spec.is_expired() {
        return Err(BSError::invalid_input(
            "d2 is undefined for a non-positive time to expiry",
        ));
    }
    ensure_numeric("d2", d1_d2(&spec).1)
}

/// d1 and d2 for a validated, unexpired spec
fn d1_d2(spec: &OptionSpec) -> (f64, f64) {
    let vol_sqrt_t = spec.volatility * spec.time.sqrt();
    let d1 = (spec.log_moneyness()
        + (spec.rate + 0.5 * spec.volatility * spec.volatility) * spec.time)
        / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Overflow in e^(-rT) or ln(S/K) must surface as an error, not NaN or infinity
fn ensure_numeric(name: &str, value: f64) -> BSResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BSError::numerical(format!("{} is not finite ({})", name, value)))
    }
}

/// Black-Scholes European option price
///
/// An expired option (time = 0) is worth its intrinsic value.
pub fn price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> BSResult<f64> {
    let spec = OptionSpec::new(option_type, spot, strike, rate, vol, time)?;
    price_validated(&spec)
}

/// Price an [`OptionSpec`]
pub fn price_spec(spec: &OptionSpec) -> BSResult<f64> {
    spec.validate()?;
    price_validated(spec)
}

fn price_validated(spec: &OptionSpec) -> BSResult<f64> {
    if spec.is_expired() {
        return Ok(spec.intrinsic());
    }

    let (d1, d2) = d1_d2(spec);
    let df = spec.discount_factor();

    let value = match spec.option_type {
        OptionType::Call => spec.spot * norm_cdf(d1) - spec.strike * df * norm_cdf(d2),
        OptionType::Put => spec.strike * df * norm_cdf(-d2) - spec.spot * norm_cdf(-d1),
    };
    // Deep out-of-the-money prices can dip a hair below zero through the CDF approximation
    Ok(ensure_numeric("price", value)?.max(0.0))
}

/// Black-Scholes Greeks
pub fn greeks(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
) -> BSResult<Greeks> {
    let spec = OptionSpec::new(option_type, spot, strike, rate, vol, time)?;
    greeks_validated(&spec)
}

/// Greeks for an [`OptionSpec`]
pub fn greeks_spec(spec: &OptionSpec) -> BSResult<Greeks> {
    spec.validate()?;
    greeks_validated(spec)
}

fn greeks_validated(spec: &OptionSpec) -> BSResult<Greeks> {
    let OptionSpec {
        option_type,
        spot,
        strike,
        rate,
        volatility: vol,
        time,
    } = *spec;

    if spec.is_expired() {
        let delta = if option_type.is_itm(spot, strike) {
            option_type.phi()
        } else {
            0.0
        };
        return Ok(Greeks::expired(delta));
    }

    let (d1, d2) = d1_d2(spec);
    let df = spec.discount_factor();
    let sqrt_t = time.sqrt();
    let pdf_d1 = norm_pdf(d1);

    let delta = match option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    };

    // Same for call and put
    let gamma = pdf_d1 / (spot * vol * sqrt_t);

    // Per 1% vol move
    let vega = spot * sqrt_t * pdf_d1 / 100.0;

    // Per year
    let decay = -spot * pdf_d1 * vol / (2.0 * sqrt_t);
    let theta = match option_type {
        OptionType::Call => decay - rate * strike * df * norm_cdf(d2),
        OptionType::Put => decay + rate * strike * df * norm_cdf(-d2),
    };

    // Per 1% rate move
    let rho = match option_type {
        OptionType::Call => strike * time * df * norm_cdf(d2) / 100.0,
        OptionType::Put => -strike * time * df * norm_cdf(-d2) / 100.0,
    };

    let greeks = Greeks::new(delta, gamma, theta, vega, rho);
    if !greeks.is_finite() {
        return Err(BSError::numerical(format!(
            "non-finite Greeks for {:?}: {:?}",
            spec, greeks
        )));
    }
    Ok(greeks)
}

/// Put-call parity residual: (C - P) - (S - K·e^(-rT))
pub fn parity_residual(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> BSResult<f64> {
    let call = price(OptionType::Call, spot, strike, rate, vol, time)?;
    let put = price(OptionType::Put, spot, strike, rate, vol, time)?;
    parity_gap(call, put, spot, strike, rate, time)
}

/// Parity residual from call and put prices already computed
pub fn parity_gap(
    call: f64,
    put: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    time: f64,
) -> BSResult<f64> {
    let forward_gap = spot - strike * (-rate * time).exp();
    ensure_numeric("parity residual", call - put - forward_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const T30: f64 = 30.0 / 365.0;

    #[test]
    fn test_d1_d2() {
        let d1 = d1(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
        let d2 = d2(100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
        assert_abs_diff_eq!(d1, 0.35, epsilon = 1e-12);
        assert_abs_diff_eq!(d2, 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_d1_rejects_degenerate_inputs() {
        assert!(matches!(
            d1(100.0, 100.0, 0.05, 0.0, 1.0),
            Err(BSError::InvalidInput(_))
        ));
        assert!(d1(100.0, 100.0, 0.05, 0.2, 0.0).is_err());
        assert!(d2(100.0, 0.0, 0.05, 0.2, 1.0).is_err());
        assert!(d2(-5.0, 100.0, 0.05, 0.2, 1.0).is_err());
    }

    #[test]
    fn test_bs_price() {
        // ATM call, 20% vol, 1 year, 5% rate
        let call_price = price(OptionType::Call, 100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
        assert_abs_diff_eq!(call_price, 10.4506, epsilon = 1e-3);

        let put_price = price(OptionType::Put, 100.0, 100.0, 0.05, 0.20, 1.0).unwrap();
        assert_abs_diff_eq!(put_price, 5.5735, epsilon = 1e-3);

        let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
        assert!(parity.abs() < 1e-6);
    }

    #[test]
    fn test_expired_is_intrinsic() {
        assert_eq!(price(OptionType::Call, 110.0, 100.0, 0.05, 0.2, 0.0).unwrap(), 10.0);
        assert_eq!(price(OptionType::Put, 110.0, 100.0, 0.05, 0.2, 0.0).unwrap(), 0.0);
        assert_eq!(price(OptionType::Put, 90.0, 100.0, 0.05, 0.2, 0.0).unwrap(), 10.0);
        assert_eq!(price(OptionType::Call, 90.0, 100.0, 0.05, 0.0, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            price(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.5),
            Err(BSError::InvalidInput(_))
        ));
        assert!(price(OptionType::Call, 100.0, 100.0, 0.05, 0.2, -0.5).is_err());
        assert!(greeks(OptionType::Put, 100.0, 100.0, 0.05, -0.2, 0.5).is_err());
        assert!(greeks(OptionType::Put, 100.0, f64::INFINITY, 0.05, 0.2, 0.5).is_err());
    }

    #[test]
    fn test_reference_call() {
        let p = price(OptionType::Call, 150.0, 155.0, 0.05, 0.25, T30).unwrap();
        let g = greeks(OptionType::Call, 150.0, 155.0, 0.05, 0.25, T30).unwrap();

        assert_abs_diff_eq!(p, 2.5119, epsilon = 1e-3);
        assert_abs_diff_eq!(g.delta, 0.3578, epsilon = 1e-3);
        assert_abs_diff_eq!(g.gamma, 0.0347, epsilon = 1e-3);
        assert_abs_diff_eq!(g.theta, -26.974, epsilon = 1e-2);
        assert_abs_diff_eq!(g.vega, 0.1605, epsilon = 1e-3);
        assert_abs_diff_eq!(g.rho, 0.0420, epsilon = 1e-3);
    }

    #[test]
    fn test_reference_put() {
        let call = greeks(OptionType::Call, 150.0, 155.0, 0.05, 0.25, T30).unwrap();
        let put = greeks(OptionType::Put, 150.0, 155.0, 0.05, 0.25, T30).unwrap();
        let p = price(OptionType::Put, 150.0, 155.0, 0.05, 0.25, T30).unwrap();

        assert_abs_diff_eq!(p, 6.8762, epsilon = 1e-3);
        assert_abs_diff_eq!(put.delta, call.delta - 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(put.delta, -0.6422, epsilon = 1e-3);
        assert_abs_diff_eq!(put.theta, -19.2558, epsilon = 1e-2);
        assert_abs_diff_eq!(put.rho, -0.0848, epsilon = 1e-3);

        // Gamma and vega do not depend on the type
        assert_eq!(put.gamma, call.gamma);
        assert_eq!(put.vega, call.vega);
    }

    #[test]
    fn test_greeks_atm() {
        let g = greeks(OptionType::Call, 100.0, 100.0, 0.05, 0.20, T30).unwrap();

        assert!(g.delta > 0.5 && g.delta < 0.6);
        assert!(g.gamma > 0.0);
        assert!(g.theta < 0.0);
        assert!(g.vega > 0.0);
        assert!(g.rho > 0.0);
    }

    #[test]
    fn test_greeks_expired() {
        let itm_call = greeks(OptionType::Call, 110.0, 100.0, 0.05, 0.2, 0.0).unwrap();
        assert_eq!(itm_call, Greeks::expired(1.0));

        let otm_call = greeks(OptionType::Call, 90.0, 100.0, 0.05, 0.2, 0.0).unwrap();
        assert_eq!(otm_call.delta, 0.0);

        let itm_put = greeks(OptionType::Put, 90.0, 100.0, 0.05, 0.2, 0.0).unwrap();
        assert_eq!(itm_put, Greeks::expired(-1.0));

        let atm_put = greeks(OptionType::Put, 100.0, 100.0, 0.05, 0.2, 0.0).unwrap();
        assert_eq!(atm_put.delta, 0.0);
    }

    #[test]
    fn test_spec_entry_points() {
        let spec = OptionSpec::new(OptionType::Put, 95.0, 100.0, 0.03, 0.3, 0.25).unwrap();
        assert_eq!(
            price_spec(&spec).unwrap(),
            price(OptionType::Put, 95.0, 100.0, 0.03, 0.3, 0.25).unwrap()
        );
        let zero_vol = OptionSpec {
            volatility: 0.0,
            ..spec
        };
        assert!(greeks_spec(&zero_vol).is_err());
        assert!(price_spec(&zero_vol).is_err());
    }

    #[test]
    fn test_overflowing_discount_is_an_error() {
        // e^(-rT) overflows to infinity for a huge negative rate
        for option_type in [OptionType::Call, OptionType::Put] {
            assert!(matches!(
                price(option_type, 100.0, 100.0, -1000.0, 0.2, 1.0),
                Err(BSError::Numerical(_))
            ));
            assert!(matches!(
                greeks(option_type, 100.0, 100.0, -1000.0, 0.2, 1.0),
                Err(BSError::Numerical(_))
            ));
        }
        assert!(parity_residual(100.0, 100.0, -1000.0, 0.2, 1.0).is_err());
        assert!(d1(1e300, 1e-300, 0.05, 1e-300, 1e-300).is_err());
    }

    #[test]
    fn test_parity_residual() {
        let r = parity_residual(120.0, 100.0, 0.04, 0.35, 0.75).unwrap();
        assert!(r.abs() < 1e-6);

        let call = price(OptionType::Call, 120.0, 100.0, 0.04, 0.35, 0.75).unwrap();
        let put = price(OptionType::Put, 120.0, 100.0, 0.04, 0.35, 0.75).unwrap();
        assert_eq!(parity_gap(call, put, 120.0, 100.0, 0.04, 0.75).unwrap(), r);
    }
}
