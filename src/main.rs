//! Splitstat - A/B test planning and analysis from the command line
//!
//! Thin shell over the library: parses flags, invokes the engine, and prints
//! the result as JSON on stdout. Validation errors come back as a structured
//! JSON object and a non-zero exit code. Display rounding happens here; the
//! library reports raw floats.

use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use splitstat::errors::EngineError;
use splitstat::sample_size::{compute_plan, SampleSizeConfig};
use splitstat::significance::{evaluate, ExperimentGroup, SignificanceReport, TestResult};

#[derive(Parser)]
#[command(name = "splitstat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plan and evaluate two-variant conversion experiments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the sample size required to detect a target effect
    SampleSize(SampleSizeArgs),
    /// Test observed results for statistical significance
    Significance(SignificanceArgs),
}

#[derive(Args)]
struct SampleSizeArgs {
    /// Current conversion rate (e.g. 0.03 for 3%)
    #[arg(long, allow_negative_numbers = true)]
    baseline_rate: f64,

    /// Minimum detectable effect as an absolute change (e.g. 0.005 for +0.5pt)
    #[arg(long, allow_negative_numbers = true)]
    mde: f64,

    /// Confidence level
    #[arg(long, allow_negative_numbers = true, default_value_t = splitstat::constants::DEFAULT_SIGNIFICANCE)]
    significance: f64,

    /// Statistical power
    #[arg(long, allow_negative_numbers = true, default_value_t = splitstat::constants::DEFAULT_POWER)]
    power: f64,

    /// Number of variants including control
    #[arg(long, default_value_t = splitstat::constants::DEFAULT_VARIANTS)]
    variants: u32,

    /// Daily visitors, enables a duration estimate
    #[arg(long)]
    daily_traffic: Option<u64>,
}

#[derive(Args)]
struct SignificanceArgs {
    /// Control group total visitors
    #[arg(long)]
    control_visitors: u64,

    /// Control group conversions
    #[arg(long)]
    control_conversions: u64,

    /// Variant group total visitors
    #[arg(long)]
    variant_visitors: u64,

    /// Variant group conversions
    #[arg(long)]
    variant_conversions: u64,

    /// Desired confidence level
    #[arg(long, allow_negative_numbers = true, default_value_t = splitstat::constants::DEFAULT_SIGNIFICANCE)]
    confidence: f64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => println!("{output:#}"),
        Err(err) => {
            println!("{:#}", json!({ "error": err.to_response() }));
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<Value, EngineError> {
    match cli.command {
        Commands::SampleSize(args) => {
            let config = SampleSizeConfig {
                baseline_rate: args.baseline_rate,
                mde: args.mde,
                significance: args.significance,
                power: args.power,
                variants: args.variants,
                daily_traffic: args.daily_traffic,
            };
            let plan = compute_plan(&config)?;

            let mut output = json!({
                "baseline_rate": plan.baseline_rate,
                "minimum_detectable_effect": plan.mde,
                "target_rate": round_to(plan.target_rate, 6),
                "relative_lift": format!("{:.1}%", plan.relative_lift),
                "significance_level": plan.significance,
                "statistical_power": plan.power,
                "sample_size_per_variant": plan.per_variant,
                "total_sample_needed": plan.total,
                "variants": plan.variants,
                "methodology": "Two-proportion Z-test",
                "recommendations": plan.recommendations,
            });
            if let Some(traffic) = config.daily_traffic {
                output["daily_traffic"] = json!(traffic);
                output["estimated_days"] = json!(plan.estimated_days);
            }
            Ok(output)
        }
        Commands::Significance(args) => {
            let control = ExperimentGroup::new(args.control_visitors, args.control_conversions);
            let variant = ExperimentGroup::new(args.variant_visitors, args.variant_conversions);
            let report = evaluate(&control, &variant, args.confidence)?;
            Ok(report_json(&report))
        }
    }
}

fn report_json(report: &SignificanceReport) -> Value {
    json!({
        "control": {
            "visitors": report.control.visitors,
            "conversions": report.control.conversions,
            "rate": pct(report.control.rate),
        },
        "variant": {
            "visitors": report.variant.visitors,
            "conversions": report.variant.conversions,
            "rate": pct(report.variant.rate),
        },
        "lift": {
            "absolute": pct(report.lift.absolute),
            "relative": format!("{:.2}%", report.lift.relative),
        },
        "z_test": test_json(&report.z_test),
        "chi_squared_test": test_json(&report.chi_squared_test),
        "confidence_level": report.confidence,
        "confidence_interval": {
            "lower": pct(report.confidence_interval.lower),
            "upper": pct(report.confidence_interval.upper),
        },
        "recommendation": report.recommendation,
        "warnings": report.warnings,
    })
}

fn test_json(result: &TestResult) -> Value {
    json!({
        "statistic": round_to(result.statistic, 4),
        "p_value": round_to(result.p_value, 6),
        "significant": result.significant,
        "degenerate": result.degenerate,
    })
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
