//! Input validation for the inference engine
//!
//! Every validator runs before any statistic is computed and collects the
//! complete set of violated constraints instead of stopping at the first, so
//! a caller fixing its inputs sees all problems in one response. Out-of-range
//! values are rejected outright, never silently clamped.

use crate::constants::{LEVEL_MAX, LEVEL_MIN, MIN_VARIANTS};
use crate::errors::{EngineError, Result};
use crate::sample_size::SampleSizeConfig;
use crate::significance::ExperimentGroup;

/// Validate a sample-size planning configuration.
///
/// Checks, independently: `0 < baseline_rate < 1`, `mde > 0`,
/// `baseline_rate + mde < 1`, significance and power within
/// (0.5, 0.999) exclusive, `variants >= 2`, and positive daily traffic
/// when supplied.
pub fn validate_plan_config(config: &SampleSizeConfig) -> Result<()> {
    let mut violations = Vec::new();

    if !(config.baseline_rate > 0.0 && config.baseline_rate < 1.0) {
        violations.push(format!(
            "baseline_rate must be within (0, 1) exclusive, got {}",
            config.baseline_rate
        ));
    }
    if !(config.mde > 0.0) {
        violations.push(format!("mde must be greater than 0, got {}", config.mde));
    }
    if config.baseline_rate + config.mde >= 1.0 {
        violations.push(format!(
            "baseline_rate + mde must be less than 1, got {}",
            config.baseline_rate + config.mde
        ));
    }
    check_level("significance", config.significance, &mut violations);
    check_level("power", config.power, &mut violations);
    if config.variants < MIN_VARIANTS {
        violations.push(format!(
            "variants must be at least {MIN_VARIANTS}, got {}",
            config.variants
        ));
    }
    if config.daily_traffic == Some(0) {
        violations.push("daily_traffic must be a positive integer".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(EngineError::InvalidInput { violations })
    }
}

/// Validate observed experiment groups and the requested confidence level.
///
/// Range violations are collected and reported together as `InvalidInput`.
/// Once ranges pass, a group without a single conversion is rejected as
/// `InsufficientData`: an all-zero table would only yield undefined
/// statistics.
pub fn validate_groups(
    control: &ExperimentGroup,
    variant: &ExperimentGroup,
    confidence: f64,
) -> Result<()> {
    let mut violations = Vec::new();

    check_group("control", control, &mut violations);
    check_group("variant", variant, &mut violations);
    check_level("confidence", confidence, &mut violations);

    if !violations.is_empty() {
        return Err(EngineError::InvalidInput { violations });
    }

    if control.conversions < 1 || variant.conversions < 1 {
        return Err(EngineError::InsufficientData);
    }

    Ok(())
}

fn check_group(name: &str, group: &ExperimentGroup, violations: &mut Vec<String>) {
    if group.visitors == 0 {
        violations.push(format!("{name} visitors must be a positive integer"));
    }
    if group.conversions > group.visitors {
        violations.push(format!(
            "{name} conversions ({}) cannot exceed visitors ({})",
            group.conversions, group.visitors
        ));
    }
}

fn check_level(name: &str, value: f64, violations: &mut Vec<String>) {
    if !(value > LEVEL_MIN && value < LEVEL_MAX) {
        violations.push(format!(
            "{name} must be within ({LEVEL_MIN}, {LEVEL_MAX}) exclusive, got {value}"
        ));
    }
}
