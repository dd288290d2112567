//! Distribution Approximation Tests
//!
//! Property checks on the normal CDF / inverse CDF pair and the derived
//! chi-squared(1) CDF:
//! - Symmetry of the CDF around zero
//! - Monotonicity across the whole support
//! - Round-trip accuracy within the stated error of the inverse
//! - Domain rejection for boundary probabilities
//! - The chi-squared(1) / squared-normal identity

use splitstat::dist::{chi_squared_cdf_df1, inverse_normal_cdf, normal_cdf};

#[test]
fn cdf_symmetry_within_tolerance() {
    for i in -600..=600 {
        let x = i as f64 * 0.01;
        let residual = (normal_cdf(-x) + normal_cdf(x) - 1.0).abs();
        assert!(residual < 1e-6, "symmetry residual {residual} at x={x}");
    }
}

#[test]
fn cdf_is_monotone_nondecreasing() {
    let mut previous = normal_cdf(-10.0);
    for i in -1000..=1000 {
        let x = i as f64 * 0.01;
        let current = normal_cdf(x);
        assert!(
            current >= previous,
            "cdf decreased between {} and {x}",
            x - 0.01
        );
        previous = current;
    }
}

#[test]
fn cdf_is_strictly_increasing_in_the_bulk() {
    // Over the range that matters for significance testing the CDF must be
    // strictly monotone, not just flat-tolerant. Past |x| ~ 4 the true
    // increment per step shrinks toward the approximation error, so the
    // strict check stays inside the bulk.
    let mut previous = normal_cdf(-4.0);
    for i in -39..=40 {
        let x = i as f64 * 0.1;
        let current = normal_cdf(x);
        assert!(current > previous, "cdf not strict at x={x}");
        previous = current;
    }
}

#[test]
fn cdf_tail_convergence() {
    assert!(normal_cdf(10.0) > 0.999_999_9);
    assert!(normal_cdf(-10.0) < 1e-7);
    assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
}

#[test]
fn round_trip_holds_across_the_working_range() {
    // cdf(inverse(p)) = p to within the ~4.5e-4 error of 26.2.23
    let mut p = 0.001;
    while p < 0.9995 {
        let x = inverse_normal_cdf(p).expect("p is inside (0, 1)");
        let recovered = normal_cdf(x);
        assert!(
            (recovered - p).abs() < 1e-3,
            "round trip drifted at p={p}: got {recovered}"
        );
        p += 0.001;
    }
}

#[test]
fn inverse_rejects_out_of_domain_probabilities() {
    for p in [0.0, 1.0, -1.0, 2.0, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        assert!(
            inverse_normal_cdf(p).is_err(),
            "p={p} should have been rejected"
        );
    }
}

#[test]
fn inverse_symmetry_through_the_median() {
    for i in 1..50 {
        let p = i as f64 * 0.01;
        let lower = inverse_normal_cdf(p).unwrap();
        let upper = inverse_normal_cdf(1.0 - p).unwrap();
        assert!((lower + upper).abs() < 1e-12, "asymmetry at p={p}");
    }
}

#[test]
fn chi_squared_matches_the_squared_normal_identity() {
    // P(X^2 <= x) = 2 Phi(sqrt(x)) - 1 must reproduce the classic critical
    // values for one degree of freedom.
    assert!((chi_squared_cdf_df1(3.841) - 0.95).abs() < 1e-3);
    assert!((chi_squared_cdf_df1(6.635) - 0.99).abs() < 1e-3);
    assert!((chi_squared_cdf_df1(10.828) - 0.999).abs() < 1e-3);
}

#[test]
fn chi_squared_is_zero_for_nonpositive_input() {
    assert_eq!(chi_squared_cdf_df1(0.0), 0.0);
    assert_eq!(chi_squared_cdf_df1(-1.0), 0.0);
}

#[test]
fn chi_squared_is_monotone() {
    let mut previous = 0.0;
    for i in 1..=300 {
        let x = i as f64 * 0.05;
        let current = chi_squared_cdf_df1(x);
        assert!(current >= previous, "chi2 cdf decreased at x={x}");
        previous = current;
    }
}
