use std::collections::BTreeMap;

use careerspan_analysis::survival::SurvivalStats;
use careerspan_stats::{config::EstimatorConfig, kaplan_meier::KaplanMeierCurve};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SurvivalReport {
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    pub estimator: EstimatorConfig,
    pub curves: BTreeMap<String, CurveReport>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurveReport {
    pub observations: usize,
    pub censored: usize,
    pub median: Option<f64>,
    pub median_ci: (Option<f64>, Option<f64>),
    pub timeline_end: Option<f64>,
    pub points: Vec<CurvePointReport>,
    pub predictions: Vec<PredictionReport>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CurvePointReport {
    pub time: f64,
    pub survival: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub at_risk: usize,
    pub events: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionReport {
    pub time: f64,
    pub survival: f64,
    /// `true` when `time` lies past the last observation and the value is a flat extension
    pub beyond_horizon: bool,
}

impl SurvivalReport {
    pub fn new(dataset: Option<String>, estimator: EstimatorConfig) -> Self {
        Self {
            generated_at: Utc::now(),
            dataset,
            estimator,
            curves: BTreeMap::new(),
        }
    }
}

impl CurveReport {
    pub fn from_curve(curve: &KaplanMeierCurve, prediction_times: &[f64]) -> Self {
        let table = curve.event_table();
        let timeline_end = curve.timeline_end();
        let points = curve
            .rows()
            .iter()
            .map(|row| CurvePointReport {
                time: row.time,
                survival: row.survival_prob,
                lower: row.lower,
                upper: row.upper,
                at_risk: row.at_risk,
                events: row.events,
            })
            .collect();
        let predictions = prediction_times
            .iter()
            .zip(curve.predict_many(prediction_times))
            .map(|(&time, survival)| PredictionReport {
                time,
                survival,
                beyond_horizon: timeline_end.is_some_and(|end| time > end),
            })
            .collect();
        Self {
            observations: table.total(),
            censored: table.total_censored(),
            median: curve.median(),
            median_ci: curve.median_confidence_interval(),
            timeline_end,
            points,
            predictions,
        }
    }

    pub fn from_stats(stats: &SurvivalStats, prediction_times: &[f64]) -> Self {
        Self::from_curve(&stats.km_curve, prediction_times)
    }
}
