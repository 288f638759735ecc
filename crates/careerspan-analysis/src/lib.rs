//! Dataset handling and grouped survival summaries for careerspan
//!
//! This crate sits between the estimation core (`careerspan-stats`) and the
//! command-line front end. It defines how cleaned records are stored, how raw
//! group labels are merged or dropped, and which summaries are reported next
//! to each Kaplan-Meier curve.
//!
//! # Overview
//!
//! 1. **Load a Dataset** ([`dataset::Dataset`]): cleaned observations from JSON
//! 2. **Resolve Groups** ([`grouping::GroupRules`]): alias and exclude labels
//! 3. **Summarize** ([`survival::SurvivalStatsMap`]): KM curve, KM median and
//!    naive means per group
//!
//! Options for the estimator and for grouping are read together from an
//! [`config::AnalysisConfig`].
//!
//! # Examples
//!
//! ```
//! use careerspan_analysis::{config::AnalysisConfig, dataset::Dataset, survival::SurvivalStatsMap};
//! use careerspan_stats::observation::Observation;
//!
//! let dataset = Dataset::new(vec![
//!     Observation::new(1.0, true).unwrap().with_group("P"),
//!     Observation::new(14.0, false).unwrap().with_group("P"),
//!     Observation::new(3.0, true).unwrap().with_group("WR"),
//! ]);
//!
//! let stats = SurvivalStatsMap::collect_by_rules(&dataset, &AnalysisConfig::default()).unwrap();
//! assert_eq!(stats.map.len(), 2);
//! assert_eq!(stats.map["WR"].median_km, Some(3.0));
//! ```

pub mod config;
pub mod dataset;
pub mod grouping;
pub mod survival;
