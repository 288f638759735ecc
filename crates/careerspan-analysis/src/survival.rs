//! Survival analysis for right-censored career data
//!
//! This module combines Kaplan-Meier curves with the naive summary
//! statistics they are usually compared against.
//!
//! # Overview
//!
//! A career ends in one of two ways in the collected data:
//!
//! - **Complete**: the player retired (event observed)
//! - **Censored**: the player was still active at collection time (event not observed)
//!
//! Standard statistics (mean, median) are biased when applied to censored data,
//! underestimating career length for the groups with the most active players.
//! Kaplan-Meier estimation accounts for censoring.
//!
//! ```text
//! Complete:  |----x    (retired after 4 years)
//! Censored:  |-------> (active after 7 years, true length unknown)
//! ```
//!
//! # Examples
//!
//! ## Basic Survival Statistics
//!
//! ```
//! use careerspan_analysis::survival::SurvivalStats;
//! use careerspan_stats::{config::EstimatorConfig, observation::Observation};
//!
//! let data = [(4.0, true), (12.0, false), (2.0, true), (12.0, false)]
//!     .into_iter()
//!     .map(|(d, e)| Observation::new(d, e).unwrap())
//!     .collect::<Vec<_>>();
//!
//! let stats = SurvivalStats::from_observations(&data, &EstimatorConfig::default()).unwrap();
//!
//! assert_eq!(stats.observations_count, 4);
//! assert_eq!(stats.censored_count, 2);
//! assert_eq!(stats.mean_complete, 3.0); // Biased: censored careers excluded
//! assert_eq!(stats.median_km, Some(4.0));
//! ```
//!
//! ## Group by Label
//!
//! ```
//! use careerspan_analysis::{config::AnalysisConfig, dataset::Dataset, survival::SurvivalStatsMap};
//! use careerspan_stats::observation::Observation;
//!
//! let dataset = Dataset::new(vec![
//!     Observation::new(3.0, true).unwrap().with_group("HB"),
//!     Observation::new(5.0, true).unwrap().with_group("RB"),
//!     Observation::new(9.0, false).unwrap().with_group("QB"),
//! ]);
//! let mut config = AnalysisConfig::default();
//! config.grouping.aliases.insert("HB".to_owned(), "RB".to_owned());
//!
//! let stats_map = SurvivalStatsMap::collect_by_rules(&dataset, &config).unwrap();
//! for (group, stats) in &stats_map.map {
//!     println!("{group}: KM median = {:?}", stats.median_km);
//! }
//! assert_eq!(stats_map.map["RB"].observations_count, 2);
//! ```

use std::collections::BTreeMap;

use careerspan_stats::{
    config::EstimatorConfig, error::SurvivalError, kaplan_meier::KaplanMeierCurve,
    observation::Observation,
    stratified::{self, GroupedResult},
};

use crate::{config::AnalysisConfig, dataset::Dataset};

/// Survival statistics for a group of observations
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalStats {
    /// Total number of observations
    pub observations_count: usize,
    /// Number of censored observations
    pub censored_count: usize,
    /// Mean duration for complete observations only
    pub mean_complete: f64,
    /// Naive mean duration for all observations
    pub mean_all: f64,
    /// Kaplan-Meier median survival time
    pub median_km: Option<f64>,
    /// Kaplan-Meier survival curve
    pub km_curve: KaplanMeierCurve,
}

#[derive(Debug, Clone)]
pub struct SurvivalStatsMap<K> {
    pub map: BTreeMap<K, SurvivalStats>,
}

impl SurvivalStats {
    /// Calculate survival statistics for one group of observations
    pub fn from_observations(
        data: &[Observation],
        config: &EstimatorConfig,
    ) -> Result<Self, SurvivalError> {
        let km_curve = KaplanMeierCurve::from_observations(data, config)?;
        Ok(Self::from_curve(data, km_curve))
    }

    /// Attach naive summaries to an already fitted curve
    ///
    /// `data` must be the observations the curve was fitted on.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_curve(data: &[Observation], km_curve: KaplanMeierCurve) -> Self {
        let observations_count = data.len();
        let censored_count = data.iter().filter(|obs| obs.is_censored()).count();

        let complete_durations: Vec<f64> = data
            .iter()
            .filter(|obs| obs.event_observed)
            .map(|obs| obs.duration)
            .collect();

        let mean_complete = if complete_durations.is_empty() {
            0.0
        } else {
            complete_durations.iter().sum::<f64>() / complete_durations.len() as f64
        };

        let mean_all = if data.is_empty() {
            0.0
        } else {
            data.iter().map(|obs| obs.duration).sum::<f64>() / observations_count as f64
        };

        let median_km = km_curve.median();

        Self {
            observations_count,
            censored_count,
            mean_complete,
            mean_all,
            median_km,
            km_curve,
        }
    }

    /// Percentage of censored observations
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn censoring_rate(&self) -> f64 {
        if self.observations_count == 0 {
            0.0
        } else {
            100.0 * self.censored_count as f64 / self.observations_count as f64
        }
    }

    /// `mean_all / mean_complete`, shown with a warning marker above 1.5
    #[must_use]
    pub fn all_comp_ratio_str(&self) -> String {
        if self.mean_complete <= 0.0 {
            return "N/A".to_owned();
        }
        let ratio = self.mean_all / self.mean_complete;
        if ratio > 1.5 {
            format!("{ratio:.2} ⚠")
        } else {
            format!("{ratio:.2}")
        }
    }

    /// Relative difference between the KM median and the naive mean
    #[must_use]
    pub fn km_vs_all_str(&self) -> String {
        match self.median_km {
            Some(km) if self.mean_all > 0.0 => {
                let diff = (km - self.mean_all) / self.mean_all * 100.0;
                format!("{diff:+.1}%")
            }
            _ => "N/A".to_owned(),
        }
    }
}

impl<K> SurvivalStatsMap<K>
where
    K: Ord + Clone,
{
    /// Collect survival statistics grouped by a custom key
    ///
    /// The key closure sees each observation and returns its group, or `None`
    /// to leave the observation out. Curves are fitted independently per group
    /// by [`GroupedResult::fit_groups`].
    pub fn collect_by_group<F>(
        dataset: &Dataset,
        config: &EstimatorConfig,
        group: F,
    ) -> Result<Self, SurvivalError>
    where
        F: FnMut(&Observation) -> Option<K>,
    {
        let data_map = stratified::partition(&dataset.observations, group);
        let curves = GroupedResult::fit_groups(&data_map, config)?;

        let map = curves
            .into_map()
            .into_iter()
            .map(|(key, curve)| {
                let stats = SurvivalStats::from_curve(&data_map[&key], curve);
                (key, stats)
            })
            .collect::<BTreeMap<_, _>>();

        tracing::info!(groups = map.len(), "collected survival statistics");

        Ok(Self { map })
    }
}

impl SurvivalStatsMap<String> {
    /// Collect survival statistics grouped by label after applying the configured group rules
    pub fn collect_by_rules(
        dataset: &Dataset,
        config: &AnalysisConfig,
    ) -> Result<Self, SurvivalError> {
        Self::collect_by_group(dataset, &config.estimator, |obs| {
            config.grouping.group_of(obs)
        })
    }
}
