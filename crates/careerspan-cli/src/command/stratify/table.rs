//! Survival statistics table display

use careerspan_analysis::survival::SurvivalStats;

use crate::{command::curve_csv, util::format_opt};

/// A row in a survival statistics table
pub(super) struct SurvivalTableRow<'a> {
    /// Group label
    pub label: &'a str,
    pub stats: &'a SurvivalStats,
}

fn print_survival_table_header() {
    println!(
        "  {:<12} {:>8} {:>10} {:>12} {:>12} {:>10} {:>12} {:>10} {:>20}",
        "Group",
        "Obs",
        "Censored%",
        "Mean(Comp)",
        "Mean(All)",
        "All/Comp",
        "Median(KM)",
        "KM vs All",
        "Median CI",
    );
}

fn print_survival_table_separator() {
    // label(12) + obs(8) + censored%(10) + mean_comp(12) + mean_all(12) + all_comp(10)
    // + median_km(12) + km_vs_all(10) + median_ci(20) + spaces(8)
    println!("  {}", "-".repeat(114));
}

fn print_survival_table_row(row: &SurvivalTableRow) {
    let stats = row.stats;
    let (lo, hi) = stats.km_curve.median_confidence_interval();

    println!(
        "  {:<12} {:>8} {:>9.1}% {:>12.2} {:>12.2} {:>10} {:>12} {:>10} {:>20}",
        row.label,
        stats.observations_count,
        stats.censoring_rate(),
        stats.mean_complete,
        stats.mean_all,
        stats.all_comp_ratio_str(),
        format_opt(stats.median_km, 2),
        stats.km_vs_all_str(),
        curve_csv::band_str(lo, hi),
    );
}

/// Print a formatted survival statistics table, one row per group
pub(super) fn print_survival_table(rows: &[SurvivalTableRow]) {
    print_survival_table_header();
    print_survival_table_separator();

    for row in rows {
        print_survival_table_row(row);
    }
}

/// Print legend explaining table columns
pub(super) fn print_legend() {
    println!("Legend:");
    println!("  Mean(Comp)  : Mean duration of completed careers only (censored data excluded)");
    println!("  Mean(All)   : Naive mean of all durations (complete + censored, biased estimate)");
    println!("  All/Comp    : Ratio of the two naive means (⚠ when > 1.5)");
    println!("  Median(KM)  : Kaplan-Meier median survival (handles censoring)");
    println!("  KM vs All   : Difference between KM median and naive mean (% change)");
    println!("  Median CI   : Interval for the KM median from the pointwise bands");
}
