//! Dataset structures for time-to-event records
//!
//! This module provides the on-disk representation of a cleaned set of
//! observations handed over by upstream collectors.
//!
//! # Overview
//!
//! A dataset is a flat list of [`Observation`]s. Each record carries a
//! duration (e.g. years since the draft), whether the event (retirement) has
//! been observed, and an optional group label (e.g. position):
//!
//! ```text
//! Dataset
//! ├─ name (optional)
//! └─ observations: Vec<Observation>
//!     ├─ duration
//!     ├─ event_observed
//!     └─ group (optional)
//! ```
//!
//! # Right-Censored Data
//!
//! Records end in two ways:
//!
//! - **Event observed** (`event_observed = true`): the career is over
//! - **Censored** (`event_observed = false`): still active when the data was collected
//!
//! Censored records must be handled with Kaplan-Meier estimation (see
//! [`survival`](crate::survival)); naive means underestimate survival.
//!
//! # Serialization
//!
//! ```json
//! {
//!   "name": "drafted players 1967-2015",
//!   "observations": [
//!     { "duration": 4, "event_observed": true, "group": "RB" },
//!     { "duration": 12, "event_observed": false, "group": "QB" }
//!   ]
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use careerspan_analysis::dataset::Dataset;
//!
//! let dataset: Dataset = serde_json::from_str(
//!     r#"{"observations": [
//!         {"duration": 4, "event_observed": true, "group": "RB"},
//!         {"duration": 12, "event_observed": false, "group": "QB"}
//!     ]}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(dataset.censored_count(), 1);
//! ```

use careerspan_stats::observation::Observation;
use serde::{Deserialize, Serialize};

/// Collection of cleaned observations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Dataset {
    /// Human-readable description of the data source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The records to analyze
    pub observations: Vec<Observation>,
}

impl Dataset {
    #[must_use]
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            name: None,
            observations,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of right-censored records
    #[must_use]
    pub fn censored_count(&self) -> usize {
        self.observations
            .iter()
            .filter(|obs| obs.is_censored())
            .count()
    }

    /// Number of records with an observed event
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.len() - self.censored_count()
    }

    /// Number of records carrying a group label
    #[must_use]
    pub fn labeled_count(&self) -> usize {
        self.observations
            .iter()
            .filter(|obs| obs.group.is_some())
            .count()
    }
}
