//! Standard normal and chi-squared(1) distribution approximations
//!
//! Closed-form approximations from Abramowitz & Stegun, *Handbook of
//! Mathematical Functions*: the normal CDF via formula 26.2.17 (absolute
//! error below 7.5e-8) and its inverse via 26.2.23 (absolute error below
//! 4.5e-4). The chi-squared(1) CDF follows from the exact identity that a
//! chi-squared(1) variable is the square of a standard normal. No statistics
//! crate is involved, so results are deterministic across platforms.
//!
//! Everything here is a pure, stateless function of its arguments.

use crate::errors::EngineError;

/// Polynomial coefficients for the normal CDF approximation (A&S 26.2.17)
const CDF_COEFFS: [f64; 5] = [
    0.319381530,
    -0.356563782,
    1.781477937,
    -1.821255978,
    1.330274429,
];

/// Substitution constant for 26.2.17: t = 1 / (1 + CDF_T_SCALE * x)
const CDF_T_SCALE: f64 = 0.2316419;

/// Numerator coefficients for the inverse CDF approximation (A&S 26.2.23)
const INV_NUM: [f64; 3] = [2.515517, 0.802853, 0.010328];

/// Denominator coefficients for the inverse CDF approximation (A&S 26.2.23)
const INV_DEN: [f64; 3] = [1.432788, 0.189269, 0.001308];

/// Standard normal cumulative distribution function.
///
/// Satisfies `normal_cdf(0.0) == 0.5` up to the approximation error,
/// the symmetry `normal_cdf(-x) == 1 - normal_cdf(x)`, and converges to
/// 0 and 1 in the tails.
pub fn normal_cdf(x: f64) -> f64 {
    if x < 0.0 {
        return 1.0 - normal_cdf(-x);
    }
    let t = 1.0 / (1.0 + CDF_T_SCALE * x);
    // Horner form of b1*t + b2*t^2 + b3*t^3 + b4*t^4 + b5*t^5
    let poly = t
        * (CDF_COEFFS[0]
            + t * (CDF_COEFFS[1]
                + t * (CDF_COEFFS[2] + t * (CDF_COEFFS[3] + t * CDF_COEFFS[4]))));
    let density = (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt();
    1.0 - poly * density
}

/// Inverse of the standard normal CDF (the quantile function).
///
/// Defined for `p` strictly inside (0, 1); anything else is rejected as
/// invalid input. Values below 0.5 are computed through the symmetry
/// `inverse(p) == -inverse(1 - p)`.
pub fn inverse_normal_cdf(p: f64) -> Result<f64, EngineError> {
    if !(p > 0.0 && p < 1.0) {
        return Err(EngineError::invalid_input(vec![format!(
            "probability must be within (0, 1) exclusive, got {p}"
        )]));
    }
    if p < 0.5 {
        return Ok(-inverse_normal_cdf(1.0 - p)?);
    }
    let t = (-2.0 * (1.0 - p).ln()).sqrt();
    let numerator = INV_NUM[0] + t * (INV_NUM[1] + t * INV_NUM[2]);
    let denominator = 1.0 + t * (INV_DEN[0] + t * (INV_DEN[1] + t * INV_DEN[2]));
    Ok(t - numerator / denominator)
}

/// CDF of the chi-squared distribution with one degree of freedom.
///
/// Uses the identity `P(X^2 <= x) = 2 * Phi(sqrt(x)) - 1` for a standard
/// normal X. Non-positive inputs have zero probability mass below them.
pub fn chi_squared_cdf_df1(x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    2.0 * normal_cdf(x.sqrt()) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_at_zero_is_half() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
    }

    #[test]
    fn cdf_matches_known_quantiles() {
        // Phi(1.96) = 0.97500, Phi(1.6449) = 0.95000
        assert!((normal_cdf(1.96) - 0.975_002).abs() < 1e-4);
        assert!((normal_cdf(1.6449) - 0.95).abs() < 1e-4);
        assert!((normal_cdf(-1.96) - 0.024_998).abs() < 1e-4);
    }

    #[test]
    fn cdf_is_symmetric() {
        for i in 0..120 {
            let x = i as f64 * 0.05;
            assert!(
                (normal_cdf(-x) + normal_cdf(x) - 1.0).abs() < 1e-6,
                "symmetry violated at x={x}"
            );
        }
    }

    #[test]
    fn cdf_converges_in_the_tails() {
        assert!(normal_cdf(8.0) > 0.999_999);
        assert!(normal_cdf(-8.0) < 1e-6);
    }

    #[test]
    fn inverse_rejects_boundary_probabilities() {
        assert!(inverse_normal_cdf(0.0).is_err());
        assert!(inverse_normal_cdf(1.0).is_err());
        assert!(inverse_normal_cdf(-0.3).is_err());
        assert!(inverse_normal_cdf(1.7).is_err());
        assert!(inverse_normal_cdf(f64::NAN).is_err());
    }

    #[test]
    fn inverse_matches_known_quantiles() {
        // z_{0.975} = 1.95996; the 26.2.23 approximation is good to ~4.5e-4
        let z = inverse_normal_cdf(0.975).unwrap();
        assert!((z - 1.95996).abs() < 1e-3, "got {z}");

        let z = inverse_normal_cdf(0.80).unwrap();
        assert!((z - 0.84162).abs() < 1e-3, "got {z}");
    }

    #[test]
    fn inverse_is_antisymmetric() {
        let lo = inverse_normal_cdf(0.25).unwrap();
        let hi = inverse_normal_cdf(0.75).unwrap();
        assert!((lo + hi).abs() < 1e-12);
    }

    #[test]
    fn chi_squared_cdf_matches_critical_values() {
        // 3.841 is the 95th percentile of chi-squared(1)
        assert!((chi_squared_cdf_df1(3.841) - 0.95).abs() < 1e-3);
        // 6.635 is the 99th percentile
        assert!((chi_squared_cdf_df1(6.635) - 0.99).abs() < 1e-3);
    }

    #[test]
    fn chi_squared_cdf_is_zero_at_or_below_zero() {
        assert_eq!(chi_squared_cdf_df1(0.0), 0.0);
        assert_eq!(chi_squared_cdf_df1(-4.2), 0.0);
    }
}
