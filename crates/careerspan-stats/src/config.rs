//! Estimator configuration.

use serde::{Deserialize, Serialize};

use crate::error::SurvivalError;

/// Default confidence level for pointwise bounds.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Variance estimator for the survival curve.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Deserialize, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum VarianceMethod {
    /// Greenwood's formula.
    #[default]
    #[display("greenwood")]
    Greenwood,
}

/// Transform used to build pointwise confidence bounds.
///
/// The two policies disagree near 0 and 1: the normal interval is symmetric
/// and clipped to `[0, 1]`, the log-log interval is asymmetric and stays
/// inside `[0, 1]`. Very wide log-log intervals reach the endpoints through
/// floating-point underflow.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Deserialize, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum CiMethod {
    /// `S ± z·sqrt(Var)`, clipped to `[0, 1]`.
    #[default]
    #[display("normal")]
    Normal,
    /// Bounds computed on the `log(-log S)` scale and mapped back.
    #[display("log-log")]
    LogLog,
}

/// Options recognized by the Kaplan-Meier estimator.
///
/// Missing fields take their defaults when deserialized:
///
/// ```
/// use careerspan_stats::config::{CiMethod, EstimatorConfig};
///
/// let config: EstimatorConfig = serde_json::from_str(r#"{"ci_method": "log-log"}"#).unwrap();
/// assert_eq!(config.confidence_level, 0.95);
/// assert_eq!(config.ci_method, CiMethod::LogLog);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Confidence level of the pointwise bounds, in `(0, 1)`.
    pub confidence_level: f64,
    pub variance_method: VarianceMethod,
    pub ci_method: CiMethod,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            variance_method: VarianceMethod::default(),
            ci_method: CiMethod::default(),
        }
    }
}

impl EstimatorConfig {
    /// Returns a copy with a different confidence level.
    #[must_use]
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Returns a copy with a different confidence interval method.
    #[must_use]
    pub fn with_ci_method(mut self, ci_method: CiMethod) -> Self {
        self.ci_method = ci_method;
        self
    }

    /// Checks that the confidence level lies in the open interval `(0, 1)`.
    pub fn validate(&self) -> Result<(), SurvivalError> {
        let level = self.confidence_level;
        if level > 0.0 && level < 1.0 {
            Ok(())
        } else {
            Err(SurvivalError::InvalidConfidenceLevel { level })
        }
    }
}
