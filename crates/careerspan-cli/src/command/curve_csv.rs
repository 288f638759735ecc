//! CSV export of fitted Kaplan-Meier curves

use std::{fs, path::Path};

use anyhow::Context;
use careerspan_stats::kaplan_meier::KaplanMeierCurve;
use csv::WriterBuilder;

use crate::util::format_opt;

const COLUMNS: [&str; 6] = ["time", "survival_prob", "lower", "upper", "at_risk", "events"];

/// Render curves as CSV, one record per event time.
///
/// With `labeled`, a leading `group` column carries each curve's label.
/// Labels containing separators or quotes are quoted. Undefined bounds are
/// left empty.
pub(crate) fn render<'a, I>(curves: I, labeled: bool) -> anyhow::Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a KaplanMeierCurve)>,
{
    let mut wtr = WriterBuilder::new().flexible(false).from_writer(vec![]);

    let header = labeled.then_some("group").into_iter().chain(COLUMNS);
    wtr.write_record(header)
        .context("Failed to write CSV header")?;

    for (label, curve) in curves {
        for row in curve.rows() {
            let fields = [
                row.time.to_string(),
                row.survival_prob.to_string(),
                row.lower.map_or(String::new(), |v| v.to_string()),
                row.upper.map_or(String::new(), |v| v.to_string()),
                row.at_risk.to_string(),
                row.events.to_string(),
            ];
            let group = labeled.then(|| label.to_owned());
            wtr.write_record(group.into_iter().chain(fields))
                .with_context(|| format!("Failed to write CSV row for group {label}"))?;
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|err| err.into_error())
        .context("Failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub(crate) fn save(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved KM curves");
    Ok(())
}

/// Short textual form of a pointwise band, e.g. `[0.52, 0.91]`
pub(crate) fn band_str(lower: Option<f64>, upper: Option<f64>) -> String {
    format!("[{}, {}]", format_opt(lower, 4), format_opt(upper, 4))
}
