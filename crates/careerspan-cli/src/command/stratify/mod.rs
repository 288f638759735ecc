//! Stratified survival analysis command
//!
//! Fits an independent Kaplan-Meier curve for every group label in the
//! dataset and compares the KM medians with the naive means they correct.

mod table;

use std::path::PathBuf;

use anyhow::Context;
use careerspan_analysis::{
    dataset::Dataset,
    grouping::GroupRules,
    survival::SurvivalStatsMap,
};
use clap::Args;

use crate::{
    command::{EstimatorArg, curve_csv},
    schema::report::{CurveReport, SurvivalReport},
    util::{self, Output},
};

use self::table::SurvivalTableRow;

const KM_CURVES_FILE: &str = "km_curves.csv";

#[derive(Debug, Clone, Args)]
pub(crate) struct StratifyArg {
    /// Path to the dataset JSON file
    pub data: PathBuf,

    #[clap(flatten)]
    pub estimator: EstimatorArg,

    /// Groups to show, in this order (comma-separated); all groups when omitted
    #[arg(long, value_delimiter = ',')]
    pub group_order: Vec<String>,

    /// Times at which to evaluate each group's survival function in the report
    #[arg(long, value_delimiter = ',', default_values_t = [1.0, 3.0, 5.0, 10.0])]
    pub predict: Vec<f64>,

    /// Output directory for the KM curve CSV file
    #[arg(long)]
    pub km_output_dir: Option<PathBuf>,

    /// Write a JSON report to this path (`-` for stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &StratifyArg) -> anyhow::Result<()> {
    let config = arg.estimator.load_config()?;
    let dataset = util::read_dataset_file(&arg.data)?;

    let stats_map = SurvivalStatsMap::collect_by_rules(&dataset, &config)
        .with_context(|| format!("Failed to fit group curves for {}", arg.data.display()))?;

    let selection = select_groups(&stats_map, &config.grouping, &arg.group_order);
    for label in &selection.unknown {
        tracing::warn!(group = %label, "requested group has no observations; skipping");
    }

    let to_stdout = arg
        .output
        .as_deref()
        .is_some_and(|path| path.as_os_str() == "-");
    if !to_stdout {
        print_report(&dataset, &selection.rows);
    }

    if let Some(dir) = &arg.km_output_dir {
        let csv = curve_csv::render(
            selection
                .rows
                .iter()
                .map(|row| (row.label, &row.stats.km_curve)),
            true,
        )?;
        curve_csv::save(&dir.join(KM_CURVES_FILE), &csv)?;
    }

    if let Some(path) = &arg.output {
        let mut report = SurvivalReport::new(dataset.name.clone(), config.estimator);
        for row in &selection.rows {
            report.curves.insert(
                row.label.to_owned(),
                CurveReport::from_stats(row.stats, &arg.predict),
            );
        }
        Output::save_json(&report, path)?;
        tracing::info!(path = %path.display(), groups = report.curves.len(), "saved report");
    }

    Ok(())
}

fn print_report(dataset: &Dataset, rows: &[SurvivalTableRow]) {
    let name = dataset.name.as_deref().unwrap_or("unnamed dataset");
    println!("Stratified Survival Report ({name})");
    println!("==========================================\n");

    println!(
        "Observations: {} total, {} labeled, {} censored",
        dataset.len(),
        dataset.labeled_count(),
        dataset.censored_count()
    );
    println!();

    table::print_legend();
    println!();

    println!("Survival by Group");
    table::print_survival_table(rows);
}

#[derive(Default)]
struct GroupSelection<'a> {
    rows: Vec<SurvivalTableRow<'a>>,
    unknown: Vec<String>,
}

/// Picks the groups to report.
///
/// With an empty `order` every fitted group is kept in key order. Otherwise
/// each requested label is resolved through `rules` and looked up; labels
/// without a fitted curve are collected in `unknown`. Repeated labels are
/// reported once.
fn select_groups<'a>(
    stats_map: &'a SurvivalStatsMap<String>,
    rules: &GroupRules,
    order: &[String],
) -> GroupSelection<'a> {
    if order.is_empty() {
        let rows = stats_map
            .map
            .iter()
            .map(|(label, stats)| SurvivalTableRow { label, stats })
            .collect();
        return GroupSelection {
            rows,
            unknown: vec![],
        };
    }

    let mut selection = GroupSelection::default();
    for requested in order {
        let found = rules
            .resolve(requested)
            .and_then(|label| stats_map.map.get_key_value(&label));
        match found {
            Some((label, stats)) => {
                if selection.rows.iter().all(|row| row.label != label.as_str()) {
                    selection.rows.push(SurvivalTableRow { label, stats });
                }
            }
            None => selection.unknown.push(requested.clone()),
        }
    }
    selection
}
