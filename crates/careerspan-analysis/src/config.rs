//! Analysis configuration file
//!
//! Every field is optional; missing sections fall back to their defaults.
//!
//! ```
//! use careerspan_analysis::config::AnalysisConfig;
//! use careerspan_stats::config::CiMethod;
//!
//! let config: AnalysisConfig = serde_json::from_str(
//!     r#"{
//!         "estimator": {"confidence_level": 0.9, "ci_method": "log-log"},
//!         "grouping": {"aliases": {"HB": "RB"}}
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.estimator.confidence_level, 0.9);
//! assert_eq!(config.estimator.ci_method, CiMethod::LogLog);
//! assert!(config.grouping.exclude.is_empty());
//! ```

use careerspan_stats::config::EstimatorConfig;
use serde::{Deserialize, Serialize};

use crate::grouping::GroupRules;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Kaplan-Meier estimator options
    pub estimator: EstimatorConfig,
    /// Group label rules used by stratified analysis
    pub grouping: GroupRules,
}
