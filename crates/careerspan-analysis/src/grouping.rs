//! Group-extraction rules for stratified analysis
//!
//! Raw group labels are often too fine-grained or contain categories that
//! should not be analyzed at all. [`GroupRules`] merges labels through an
//! alias table and then drops excluded labels:
//!
//! ```
//! use careerspan_analysis::grouping::GroupRules;
//!
//! let rules: GroupRules = serde_json::from_str(
//!     r#"{"aliases": {"HB": "RB", "CB": "DB", "FS": "DB"}, "exclude": ["LS"]}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(rules.resolve("HB").as_deref(), Some("RB"));
//! assert_eq!(rules.resolve("QB").as_deref(), Some("QB"));
//! assert_eq!(rules.resolve("LS"), None);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use careerspan_stats::observation::Observation;
use serde::{Deserialize, Serialize};

/// Alias and exclusion rules applied to group labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GroupRules {
    /// Maps a raw label to the label it is merged into
    pub aliases: BTreeMap<String, String>,
    /// Labels dropped from the analysis, checked after aliasing
    pub exclude: BTreeSet<String>,
}

impl GroupRules {
    /// Returns the effective label for `label`, or `None` if it is excluded.
    ///
    /// Aliases are applied once; they do not chain.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<String> {
        let label = self.aliases.get(label).map_or(label, String::as_str);
        (!self.exclude.contains(label)).then(|| label.to_owned())
    }

    /// Returns the effective label of an observation; unlabeled observations resolve to `None`.
    #[must_use]
    pub fn group_of(&self, obs: &Observation) -> Option<String> {
        obs.group.as_deref().and_then(|label| self.resolve(label))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.exclude.is_empty()
    }
}
