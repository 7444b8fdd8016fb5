//! Standard normal distribution
//!
//! CDF via the Abramowitz & Stegun 26.2.17 rational polynomial
//! (absolute error below 7.5e-8) and the exact density.

use std::f64::consts::PI;

const P: f64 = 0.231_641_9;
const B1: f64 = 0.319_381_530;
const B2: f64 = -0.356_563_782;
const B3: f64 = 1.781_477_937;
const B4: f64 = -1.821_255_978;
const B5: f64 = 1.330_274_429;

/// Standard normal CDF
///
/// The polynomial is evaluated on |x| and reflected for negative x, so
/// `norm_cdf(-x) == 1.0 - norm_cdf(x)` under this scheme.
pub fn norm_cdf(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + P * z);
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let upper = 1.0 - norm_pdf(z) * poly;

    if x >= 0.0 {
        upper
    } else {
        1.0 - upper
    }
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn test_norm_cdf() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-7);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
        assert!(norm_cdf(-8.0) >= 0.0);
        assert!(norm_cdf(8.0) <= 1.0);
    }

    #[test]
    fn test_norm_cdf_accuracy() {
        let exact = Normal::new(0.0, 1.0).unwrap();
        let mut x = -6.0;
        while x <= 6.0 {
            assert_abs_diff_eq!(norm_cdf(x), exact.cdf(x), epsilon = 1e-7);
            x += 0.05;
        }
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for &x in &[0.1, 0.5, 1.0, 2.33, 4.0, 10.0] {
            assert_abs_diff_eq!(norm_cdf(-x) + norm_cdf(x), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_norm_pdf() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398_942_280_4, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_pdf(1.0), 0.241_970_724_5, epsilon = 1e-10);
        assert_eq!(norm_pdf(1.7), norm_pdf(-1.7));
    }
}
