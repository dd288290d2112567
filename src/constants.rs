//! Documented constants for the inference engine
//!
//! All tunable thresholds and validation bounds live here with the reasoning
//! behind their values. Centralizing them prevents magic numbers and makes the
//! warning rules auditable in one place.

// =============================================================================
// VALIDATION BOUNDS
// =============================================================================

/// Lower bound (exclusive) for confidence, significance, and power levels
///
/// A level at or below 0.5 means the test is no better than a coin flip;
/// every level parameter must sit strictly above it.
pub const LEVEL_MIN: f64 = 0.5;

/// Upper bound (exclusive) for confidence, significance, and power levels
///
/// The inverse-CDF approximation degrades in the extreme tail, and levels at
/// 0.999 or beyond demand sample sizes that are never practical for
/// conversion experiments.
pub const LEVEL_MAX: f64 = 0.999;

/// Minimum number of variants in a planned test, control included
pub const MIN_VARIANTS: u32 = 2;

// =============================================================================
// DEFAULT PLANNING PARAMETERS
// Conventional values for conversion experiments: 95% confidence, 80% power.
// =============================================================================

/// Default significance (confidence) level for planning and analysis
pub const DEFAULT_SIGNIFICANCE: f64 = 0.95;

/// Default statistical power for planning
pub const DEFAULT_POWER: f64 = 0.80;

/// Default variant count (control plus one challenger)
pub const DEFAULT_VARIANTS: u32 = 2;

// =============================================================================
// SAMPLE-SIZE RECOMMENDATION THRESHOLDS
// =============================================================================

/// Relative lift (percent) below which the planned effect counts as subtle
///
/// Detecting less than a 5% relative change requires a disproportionately
/// large sample; the plan flags it so the caller can reconsider the MDE.
pub const SUBTLE_RELATIVE_LIFT_PCT: f64 = 5.0;

/// Per-variant sample size above which the plan suggests bolder changes
pub const LARGE_SAMPLE_PER_VARIANT: u64 = 100_000;

/// Baseline conversion rate below which proxy metrics are suggested
///
/// Sub-1% baselines need traffic volumes most pages never see; clicks or
/// scroll-depth micro-conversions detect the same change faster.
pub const LOW_BASELINE_RATE: f64 = 0.01;

/// Estimated duration (days) beyond which the plan cautions about length
pub const LONG_TEST_DAYS: u64 = 30;

/// Estimated duration (days) beyond which seasonal bias becomes a real risk
pub const SEASONAL_RISK_DAYS: u64 = 90;

// =============================================================================
// SIGNIFICANCE WARNING THRESHOLDS
// =============================================================================

/// Visitor count below which a group is considered too small to trust
pub const SMALL_GROUP_VISITORS: u64 = 100;

/// Conversion rate below which a group's results lose reliability
pub const LOW_CONVERSION_RATE: f64 = 0.005;

/// Relative group-size difference above which the split counts as unbalanced
///
/// An unbalanced split stays statistically valid but loses power; 20% is the
/// point where the loss becomes worth surfacing.
pub const GROUP_IMBALANCE_RATIO: f64 = 0.2;
