//! Pre-test planning: required sample size for a target effect
//!
//! Implements the two-proportion Z-test sample-size formula. Given a baseline
//! conversion rate and the minimum detectable effect (MDE) as an absolute
//! change, the planner returns how many visitors each variant needs at the
//! requested significance and power, plus a duration estimate when daily
//! traffic is known and a set of actionable recommendations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DEFAULT_POWER, DEFAULT_SIGNIFICANCE, DEFAULT_VARIANTS, LARGE_SAMPLE_PER_VARIANT,
    LONG_TEST_DAYS, LOW_BASELINE_RATE, SEASONAL_RISK_DAYS, SUBTLE_RELATIVE_LIFT_PCT,
};
use crate::dist::inverse_normal_cdf;
use crate::errors::Result;
use crate::validation::validate_plan_config;

/// Planning parameters for a sample-size computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeConfig {
    /// Current conversion rate, e.g. 0.03 for 3%
    pub baseline_rate: f64,
    /// Minimum detectable effect as an absolute rate change, e.g. 0.005
    pub mde: f64,
    /// Confidence level for the test, e.g. 0.95
    pub significance: f64,
    /// Statistical power, e.g. 0.80
    pub power: f64,
    /// Number of variants including control
    pub variants: u32,
    /// Daily visitors across all variants, enables the duration estimate
    pub daily_traffic: Option<u64>,
}

impl SampleSizeConfig {
    /// Config with conventional defaults: 95% significance, 80% power,
    /// two variants, no traffic estimate.
    pub fn new(baseline_rate: f64, mde: f64) -> Self {
        Self {
            baseline_rate,
            mde,
            significance: DEFAULT_SIGNIFICANCE,
            power: DEFAULT_POWER,
            variants: DEFAULT_VARIANTS,
            daily_traffic: None,
        }
    }

    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    pub fn with_variants(mut self, variants: u32) -> Self {
        self.variants = variants;
        self
    }

    pub fn with_daily_traffic(mut self, daily_traffic: u64) -> Self {
        self.daily_traffic = Some(daily_traffic);
        self
    }
}

/// Result of a sample-size computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizePlan {
    pub baseline_rate: f64,
    pub mde: f64,
    /// Conversion rate the variant must reach: baseline_rate + mde
    pub target_rate: f64,
    /// The MDE expressed as a percentage of the baseline
    pub relative_lift: f64,
    pub significance: f64,
    pub power: f64,
    pub variants: u32,
    /// Visitors required per variant, rounded up
    pub per_variant: u64,
    /// Visitors required across all variants
    pub total: u64,
    /// Projected days to reach `per_variant`, when daily traffic was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u64>,
    /// Actionable notes derived from the plan; never empty
    pub recommendations: Vec<String>,
}

/// Required per-variant sample size for the two-proportion Z-test.
///
/// `n = ((z_{alpha/2} + z_power)^2 * (p1(1-p1) + p2(1-p2))) / (p2-p1)^2`
/// with `p1 = baseline_rate` and `p2 = baseline_rate + mde`, rounded up so
/// the test is never under-provisioned.
///
/// Inputs are assumed validated; [`compute_plan`] is the checked entry point.
pub fn required_per_variant(
    baseline_rate: f64,
    mde: f64,
    significance: f64,
    power: f64,
) -> Result<u64> {
    let alpha = 1.0 - significance;
    let z_alpha = inverse_normal_cdf(1.0 - alpha / 2.0)?;
    let z_power = inverse_normal_cdf(power)?;

    let p1 = baseline_rate;
    let p2 = baseline_rate + mde;

    let numerator = (z_alpha + z_power).powi(2) * (p1 * (1.0 - p1) + p2 * (1.0 - p2));
    let denominator = (p2 - p1).powi(2);

    Ok((numerator / denominator).ceil() as u64)
}

/// Validate the configuration and compute the full plan.
pub fn compute_plan(config: &SampleSizeConfig) -> Result<SampleSizePlan> {
    validate_plan_config(config)?;

    let per_variant = required_per_variant(
        config.baseline_rate,
        config.mde,
        config.significance,
        config.power,
    )?;
    let total = per_variant * u64::from(config.variants);
    let relative_lift = config.mde / config.baseline_rate * 100.0;

    let estimated_days = config.daily_traffic.map(|traffic| {
        let per_variant_per_day = traffic as f64 / f64::from(config.variants);
        (per_variant as f64 / per_variant_per_day).ceil() as u64
    });

    let recommendations = build_recommendations(config, relative_lift, per_variant, estimated_days);

    debug!(per_variant, total, ?estimated_days, "sample size plan computed");

    Ok(SampleSizePlan {
        baseline_rate: config.baseline_rate,
        mde: config.mde,
        target_rate: config.baseline_rate + config.mde,
        relative_lift,
        significance: config.significance,
        power: config.power,
        variants: config.variants,
        per_variant,
        total,
        estimated_days,
        recommendations,
    })
}

/// Recommendation rules. Each fires independently; when none fire, a single
/// all-clear note is returned so the list is never empty.
fn build_recommendations(
    config: &SampleSizeConfig,
    relative_lift: f64,
    per_variant: u64,
    estimated_days: Option<u64>,
) -> Vec<String> {
    let mut recs = Vec::new();

    if let (Some(traffic), Some(days)) = (config.daily_traffic, estimated_days) {
        recs.push(format!(
            "With {traffic} daily visitors split across {} variants, expect the test to run \
             approximately {days} days.",
            config.variants
        ));
        if days > LONG_TEST_DAYS {
            recs.push(format!(
                "Test duration exceeds {LONG_TEST_DAYS} days. Consider increasing the MDE \
                 threshold or focusing on higher-traffic pages to shorten the experiment."
            ));
        }
        if days > SEASONAL_RISK_DAYS {
            recs.push(format!(
                "Warning: tests running longer than {SEASONAL_RISK_DAYS} days risk seasonal \
                 bias and external confounders. Re-evaluate whether this test is feasible."
            ));
        }
    }

    if relative_lift < SUBTLE_RELATIVE_LIFT_PCT {
        recs.push(format!(
            "A {relative_lift:.1}% relative lift is very small. Detecting such a subtle change \
             requires a large sample. Consider whether a larger effect size would be more \
             practical to test."
        ));
    }

    if per_variant > LARGE_SAMPLE_PER_VARIANT {
        recs.push(
            "The required sample size is very large. Consider testing bolder changes with a \
             higher expected impact to reduce the required sample."
                .to_string(),
        );
    }

    if config.baseline_rate < LOW_BASELINE_RATE {
        recs.push(
            "Low baseline conversion rates require significantly more traffic. Consider \
             micro-conversion metrics (e.g., clicks, scroll depth) as proxy goals to detect \
             changes faster."
                .to_string(),
        );
    }

    if recs.is_empty() {
        recs.push(
            "Sample size requirements look reasonable. Ensure even traffic splitting and avoid \
             peeking at results before reaching the target."
                .to_string(),
        );
    }

    recs
}
