//! Post-test analysis: significance testing for two-variant experiments
//!
//! Runs two independent tests on the observed results (a pooled
//! two-proportion Z-test and a Pearson chi-squared test on the 2x2
//! contingency table), builds a Wald confidence interval for the rate
//! difference, and derives lift, warnings, and a recommendation. The two
//! tests are mathematically equivalent for a 2x2 binomial comparison
//! (chi-squared statistic = z^2), but they are computed separately and a
//! disagreement near the significance boundary is surfaced as a warning,
//! never silently resolved in favor of one test.
//!
//! The hypothesis tests use the pooled variance estimate; the confidence
//! interval uses unpooled per-group variance. That asymmetry is standard
//! statistical practice and intentional.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{GROUP_IMBALANCE_RATIO, LOW_CONVERSION_RATE, SMALL_GROUP_VISITORS};
use crate::dist::{chi_squared_cdf_df1, inverse_normal_cdf, normal_cdf};
use crate::errors::Result;
use crate::validation::validate_groups;

// =============================================================================
// INPUT / OUTPUT TYPES
// =============================================================================

/// One arm of an experiment: control or a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentGroup {
    pub visitors: u64,
    pub conversions: u64,
}

impl ExperimentGroup {
    pub fn new(visitors: u64, conversions: u64) -> Self {
        Self {
            visitors,
            conversions,
        }
    }

    /// Observed conversion rate; 0 for an empty group
    pub fn rate(&self) -> f64 {
        if self.visitors == 0 {
            0.0
        } else {
            self.conversions as f64 / self.visitors as f64
        }
    }
}

/// Outcome of a single hypothesis test.
///
/// A `Degenerate` outcome is statistically legitimate but uninformative,
/// for example a zero pooled standard error when both groups sit on the same
/// variance-free boundary (both 0% or both 100%). It carries the condition
/// that triggered it and resolves to the documented fallback values
/// (statistic 0, p-value 1) instead of raising an error, so callers can tell
/// "no evidence of a difference" apart from "the test could not discriminate"
/// without re-deriving the condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestOutcome {
    Computed { statistic: f64, p_value: f64 },
    Degenerate { reason: &'static str },
}

impl TestOutcome {
    pub fn statistic(&self) -> f64 {
        match self {
            Self::Computed { statistic, .. } => *statistic,
            Self::Degenerate { .. } => 0.0,
        }
    }

    pub fn p_value(&self) -> f64 {
        match self {
            Self::Computed { p_value, .. } => *p_value,
            Self::Degenerate { .. } => 1.0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate { .. })
    }

    /// Serialized view at a given significance threshold
    fn into_result(self, alpha: f64) -> TestResult {
        TestResult {
            statistic: self.statistic(),
            p_value: self.p_value(),
            significant: self.p_value() < alpha,
            degenerate: self.is_degenerate(),
        }
    }
}

/// One test's contribution to the report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub statistic: f64,
    pub p_value: f64,
    /// `p_value < 1 - confidence`
    pub significant: bool,
    /// True when the statistic is a degenerate fallback, not a measurement
    pub degenerate: bool,
}

/// Wald interval for the difference in conversion rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Observed effect of the variant over the control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lift {
    /// Rate difference: variant rate - control rate
    pub absolute: f64,
    /// Difference as a percentage of the control rate
    pub relative: f64,
}

/// One group's observed numbers, echoed back in the report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub visitors: u64,
    pub conversions: u64,
    pub rate: f64,
}

impl From<&ExperimentGroup> for GroupSummary {
    fn from(group: &ExperimentGroup) -> Self {
        Self {
            visitors: group.visitors,
            conversions: group.conversions,
            rate: group.rate(),
        }
    }
}

/// Complete significance analysis for one control/variant comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceReport {
    pub control: GroupSummary,
    pub variant: GroupSummary,
    pub lift: Lift,
    pub z_test: TestResult,
    pub chi_squared_test: TestResult,
    /// Confidence level the analysis was run at
    pub confidence: f64,
    pub confidence_interval: ConfidenceInterval,
    pub recommendation: String,
    /// Independently evaluated data-quality warnings, in rule order
    pub warnings: Vec<String>,
}

// =============================================================================
// TESTS
// =============================================================================

/// Pooled two-proportion Z-test, two-sided.
///
/// `pooled = (c_conv + v_conv) / (c_vis + v_vis)`,
/// `SE = sqrt(pooled * (1 - pooled) * (1/c_vis + 1/v_vis))`,
/// `z = (v_rate - c_rate) / SE`, `p = 2 * (1 - Phi(|z|))`.
///
/// A zero standard error means both rates sit on the same variance-free
/// boundary; the outcome is tagged degenerate.
pub fn z_test(control: &ExperimentGroup, variant: &ExperimentGroup) -> TestOutcome {
    if control.visitors == 0 || variant.visitors == 0 {
        return TestOutcome::Degenerate {
            reason: "a group has no visitors",
        };
    }

    let c_vis = control.visitors as f64;
    let v_vis = variant.visitors as f64;
    let pooled = (control.conversions + variant.conversions) as f64 / (c_vis + v_vis);
    let se = (pooled * (1.0 - pooled) * (1.0 / c_vis + 1.0 / v_vis)).sqrt();

    if se == 0.0 {
        return TestOutcome::Degenerate {
            reason: "zero pooled standard error",
        };
    }

    let z = (variant.rate() - control.rate()) / se;
    let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));

    TestOutcome::Computed {
        statistic: z,
        p_value,
    }
}

/// Pearson chi-squared test on the 2x2 contingency table.
///
/// Observed: `[[c_conv, c_vis - c_conv], [v_conv, v_vis - v_conv]]`.
/// Cells with a zero expected count contribute nothing; a table where every
/// cell is skipped is degenerate. `p = 1 - chi2_cdf_df1(statistic)`.
pub fn chi_squared_test(control: &ExperimentGroup, variant: &ExperimentGroup) -> TestOutcome {
    let n = (control.visitors + variant.visitors) as f64;
    if n == 0.0 {
        return TestOutcome::Degenerate {
            reason: "empty contingency table",
        };
    }

    let observed = [
        [
            control.conversions as f64,
            (control.visitors - control.conversions) as f64,
        ],
        [
            variant.conversions as f64,
            (variant.visitors - variant.conversions) as f64,
        ],
    ];
    let row_totals = [control.visitors as f64, variant.visitors as f64];
    let col_totals = [
        observed[0][0] + observed[1][0],
        observed[0][1] + observed[1][1],
    ];

    let mut statistic = 0.0;
    let mut informative_cells = 0;
    for (i, row) in observed.iter().enumerate() {
        for (j, &obs) in row.iter().enumerate() {
            let expected = row_totals[i] * col_totals[j] / n;
            if expected == 0.0 {
                continue;
            }
            statistic += (obs - expected).powi(2) / expected;
            informative_cells += 1;
        }
    }

    if informative_cells == 0 {
        return TestOutcome::Degenerate {
            reason: "all expected cell counts are zero",
        };
    }

    TestOutcome::Computed {
        statistic,
        p_value: 1.0 - chi_squared_cdf_df1(statistic),
    }
}

/// Wald confidence interval for the rate difference.
///
/// Uses unpooled per-group variance:
/// `diff +/- z_{(1+confidence)/2} * sqrt(p1(1-p1)/n1 + p2(1-p2)/n2)`.
/// This deliberately differs from the pooled variance of [`z_test`]; the
/// null hypothesis pools, the interval around the observed difference does
/// not.
pub fn confidence_interval(
    control: &ExperimentGroup,
    variant: &ExperimentGroup,
    confidence: f64,
) -> Result<ConfidenceInterval> {
    let p1 = control.rate();
    let p2 = variant.rate();
    let diff = p2 - p1;

    let se = (p1 * (1.0 - p1) / control.visitors as f64
        + p2 * (1.0 - p2) / variant.visitors as f64)
        .sqrt();
    let z = inverse_normal_cdf(1.0 - (1.0 - confidence) / 2.0)?;

    Ok(ConfidenceInterval {
        lower: diff - z * se,
        upper: diff + z * se,
    })
}

// =============================================================================
// FULL ANALYSIS
// =============================================================================

/// Validate the inputs and run the complete analysis.
///
/// Both tests are evaluated independently against `alpha = 1 - confidence`;
/// the recommendation requires them to agree before calling a winner.
pub fn evaluate(
    control: &ExperimentGroup,
    variant: &ExperimentGroup,
    confidence: f64,
) -> Result<SignificanceReport> {
    validate_groups(control, variant, confidence)?;

    let alpha = 1.0 - confidence;
    let z_result = z_test(control, variant).into_result(alpha);
    let chi_result = chi_squared_test(control, variant).into_result(alpha);
    let interval = confidence_interval(control, variant, confidence)?;

    let c_rate = control.rate();
    let v_rate = variant.rate();
    let absolute = v_rate - c_rate;
    let lift = Lift {
        absolute,
        relative: if c_rate > 0.0 {
            absolute / c_rate * 100.0
        } else {
            0.0
        },
    };

    let warnings = build_warnings(control, variant, &z_result, &chi_result);
    let recommendation = build_recommendation(c_rate, v_rate, &lift, &z_result, &chi_result, confidence);

    debug!(
        z = z_result.statistic,
        z_p = z_result.p_value,
        chi2 = chi_result.statistic,
        chi2_p = chi_result.p_value,
        "significance analysis computed"
    );

    Ok(SignificanceReport {
        control: control.into(),
        variant: variant.into(),
        lift,
        z_test: z_result,
        chi_squared_test: chi_result,
        confidence,
        confidence_interval: interval,
        recommendation,
        warnings,
    })
}

/// Data-quality warnings, each rule evaluated independently.
fn build_warnings(
    control: &ExperimentGroup,
    variant: &ExperimentGroup,
    z_result: &TestResult,
    chi_result: &TestResult,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if control.visitors < SMALL_GROUP_VISITORS || variant.visitors < SMALL_GROUP_VISITORS {
        warnings.push("Very small sample size; results may be unreliable.".to_string());
    }

    if control.rate() < LOW_CONVERSION_RATE || variant.rate() < LOW_CONVERSION_RATE {
        warnings.push("Very low conversion rates may reduce test reliability.".to_string());
    }

    let larger = control.visitors.max(variant.visitors) as f64;
    let size_gap = (control.visitors as f64 - variant.visitors as f64).abs();
    if larger > 0.0 && size_gap / larger > GROUP_IMBALANCE_RATIO {
        warnings.push(
            "Unbalanced group sizes detected (>20% difference). Results are valid but power \
             may be reduced."
                .to_string(),
        );
    }

    if z_result.significant != chi_result.significant {
        warnings.push(
            "Z-test and chi-squared test disagree on significance. The result is borderline; \
             collect more data."
                .to_string(),
        );
    }

    warnings
}

/// Recommendation: deploy or reject only when both tests agree on
/// significance; anything else asks for more data.
fn build_recommendation(
    c_rate: f64,
    v_rate: f64,
    lift: &Lift,
    z_result: &TestResult,
    chi_result: &TestResult,
    confidence: f64,
) -> String {
    if z_result.significant && chi_result.significant {
        if lift.absolute > 0.0 {
            format!(
                "The variant shows a statistically significant improvement of {:.2}% relative \
                 lift at the {:.0}% confidence level. Both the Z-test and chi-squared test \
                 agree. Consider deploying the variant, but monitor post-launch metrics to \
                 confirm sustained performance.",
                lift.relative,
                confidence * 100.0
            )
        } else {
            format!(
                "The variant shows a statistically significant decrease of {:.2}% relative to \
                 the control. Both tests agree. Do not deploy this variant.",
                lift.relative.abs()
            )
        }
    } else {
        format!(
            "The difference between control ({:.2}%) and variant ({:.2}%) is not statistically \
             significant at the {:.0}% confidence level. Continue running the test to \
             accumulate more data, or consider testing a bolder change with a larger expected \
             effect.",
            c_rate * 100.0,
            v_rate * 100.0,
            confidence * 100.0
        )
    }
}
