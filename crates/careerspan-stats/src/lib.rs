//! Kaplan-Meier survival estimation for right-censored time-to-event data.
//!
//! This crate provides the estimation core of careerspan:
//!
//! - **Observations**: validated `(duration, event_observed, group)` records
//! - **Event tables**: risk-set sizes, event and censoring counts per distinct timestamp
//! - **Kaplan-Meier curves**: step-function survival estimates with Greenwood variance,
//!   confidence bounds, point predictions and median survival
//! - **Stratification**: independent curves per group
//!
//! Data flows one way: observations → event table → survival curve → statistics.
//! Every artifact is immutable once built.
//!
//! # Modules
//!
//! - [`observation`]: The input record type
//! - [`event_table`]: Event-table construction, including the tie-break between events and
//!   censorings at the same instant
//! - [`kaplan_meier`]: The survival curve and its queries
//! - [`confidence`]: Normal and log-log pointwise confidence bounds
//! - [`stratified`]: Per-group fan-out
//! - [`config`]: Estimator options
//! - [`error`]: Error taxonomy
//!
//! # Examples
//!
//! ## Fitting a single curve
//!
//! ```
//! use careerspan_stats::{config::EstimatorConfig, kaplan_meier::KaplanMeierCurve,
//!     observation::Observation};
//!
//! // (duration, event_observed)
//! let observations = [(1.0, true), (1.0, false), (2.0, true), (3.0, true), (3.0, false), (4.0, true)]
//!     .into_iter()
//!     .map(|(d, e)| Observation::new(d, e))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//!
//! let curve = KaplanMeierCurve::from_observations(&observations, &EstimatorConfig::default()).unwrap();
//! assert_eq!(curve.median(), Some(3.0));
//! assert_eq!(curve.predict_many(&[0.5, 4.0]), vec![1.0, 0.0]);
//! ```
//!
//! ## Stratifying by group
//!
//! ```
//! use careerspan_stats::{config::EstimatorConfig, observation::Observation,
//!     stratified::GroupedResult};
//!
//! let observations = vec![
//!     Observation::new(3.0, true).unwrap().with_group("K"),
//!     Observation::new(12.0, false).unwrap().with_group("K"),
//!     Observation::new(2.0, true).unwrap().with_group("RB"),
//! ];
//! let result = GroupedResult::fit_by_label(&observations, &EstimatorConfig::default()).unwrap();
//! for (group, curve) in &result {
//!     println!("{group}: median = {:?}", curve.median());
//! }
//! ```

pub mod confidence;
pub mod config;
pub mod error;
pub mod event_table;
pub mod kaplan_meier;
pub mod observation;
pub mod stratified;
