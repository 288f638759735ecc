//! Single-curve Kaplan-Meier fit
//!
//! Fits one curve over every observation in the dataset, ignoring group
//! labels, and prints the curve together with its median and predictions.

use std::path::PathBuf;

use anyhow::Context;
use careerspan_stats::{event_table::EventTable, kaplan_meier::KaplanMeierCurve};
use clap::Args;

use crate::{
    command::{EstimatorArg, curve_csv},
    schema::report::{CurveReport, SurvivalReport},
    util::{self, Output, format_opt},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct FitArg {
    /// Path to the dataset JSON file
    pub data: PathBuf,

    #[clap(flatten)]
    pub estimator: EstimatorArg,

    /// Times at which to evaluate the survival function (comma-separated)
    #[arg(long, value_delimiter = ',', default_values_t = [1.0, 3.0, 5.0, 10.0])]
    pub predict: Vec<f64>,

    /// Print the event table before the curve
    #[arg(long)]
    pub show_event_table: bool,

    /// Write the curve to this CSV file
    #[arg(long)]
    pub curve_csv: Option<PathBuf>,

    /// Write a JSON report to this path (`-` for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &FitArg) -> anyhow::Result<()> {
    let config = arg.estimator.load_config()?;
    let dataset = util::read_dataset_file(&arg.data)?;

    let curve = KaplanMeierCurve::from_observations(&dataset.observations, &config.estimator)
        .with_context(|| format!("Failed to fit curve for {}", arg.data.display()))?;

    // Keep stdout clean when it carries the JSON report.
    let to_stdout = arg
        .output
        .as_deref()
        .is_some_and(|path| path.as_os_str() == "-");
    if !to_stdout {
        print_report(arg, dataset.name.as_deref(), &curve);
    }

    if let Some(path) = &arg.curve_csv {
        let csv = curve_csv::render([("all", &curve)], false)?;
        curve_csv::save(path, &csv)?;
    }

    if let Some(path) = &arg.output {
        let mut report = SurvivalReport::new(dataset.name.clone(), config.estimator);
        report.curves.insert(
            "all".to_owned(),
            CurveReport::from_curve(&curve, &arg.predict),
        );
        Output::save_json(&report, path)?;
        tracing::info!(path = %path.display(), "saved report");
    }

    Ok(())
}

fn print_report(arg: &FitArg, name: Option<&str>, curve: &KaplanMeierCurve) {
    let config = curve.config();
    let table = curve.event_table();

    println!("Kaplan-Meier Survival Report ({})", name.unwrap_or("unnamed dataset"));
    println!("==========================================\n");
    println!(
        "Observations: {} total, {} events, {} censored",
        table.total(),
        table.total_events(),
        table.total_censored()
    );
    println!(
        "Confidence: {:.0}% {} bands, {} variance\n",
        config.confidence_level * 100.0,
        config.ci_method,
        config.variance_method
    );

    if arg.show_event_table {
        print_event_table(table);
        println!();
    }

    print_curve(curve);
    println!();

    let (lo, hi) = curve.median_confidence_interval();
    println!(
        "Median survival: {} {}",
        format_opt(curve.median(), 2),
        curve_csv::band_str(lo, hi)
    );
    println!();

    print_predictions(curve, &arg.predict);
}

fn print_event_table(table: &EventTable) {
    println!("Event Table");
    println!(
        "  {:>10} {:>8} {:>8} {:>8}",
        "Time", "At Risk", "Events", "Censored"
    );
    println!("  {}", "-".repeat(37));
    for row in table.rows() {
        println!(
            "  {:>10.2} {:>8} {:>8} {:>8}",
            row.time, row.at_risk, row.events, row.censored
        );
    }
}

fn print_curve(curve: &KaplanMeierCurve) {
    println!("Survival Curve");
    println!(
        "  {:>10} {:>8} {:>8} {:>10} {:>10} {:>10}",
        "Time", "At Risk", "Events", "Survival", "Lower", "Upper"
    );
    println!("  {}", "-".repeat(61));
    for row in curve.rows() {
        println!(
            "  {:>10.2} {:>8} {:>8} {:>10.4} {:>10} {:>10}",
            row.time,
            row.at_risk,
            row.events,
            row.survival_prob,
            format_opt(row.lower, 4),
            format_opt(row.upper, 4),
        );
    }
    if curve.rows().is_empty() {
        println!("  (no events observed; survival stays at 1)");
    }
}

fn print_predictions(curve: &KaplanMeierCurve, times: &[f64]) {
    if times.is_empty() {
        return;
    }
    let end = curve.timeline_end();
    println!("Predicted Survival");
    for (time, survival) in times.iter().zip(curve.predict_many(times)) {
        let marker = if end.is_some_and(|end| *time > end) {
            " (beyond last observation)"
        } else {
            ""
        };
        println!("  S({time}) = {survival:.4}{marker}");
    }
}
