use serde::{Deserialize, Serialize};

use crate::error::{InvalidInputKind, SurvivalError};

/// A single time-to-event record.
///
/// `event_observed = false` marks a right-censored record: observation ended
/// while the subject was still active, so only a lower bound of its true
/// duration is known.
///
/// # Examples
///
/// ```
/// use careerspan_stats::observation::Observation;
///
/// let retired = Observation::new(4.0, true).unwrap();
/// let active = Observation::new(7.0, false).unwrap().with_group("QB");
///
/// assert!(retired.event_observed);
/// assert_eq!(active.group.as_deref(), Some("QB"));
/// assert!(Observation::new(-1.0, true).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Observation {
    /// Elapsed time until the event or until censoring. Never negative.
    pub duration: f64,
    /// `true` if the event occurred at `duration`, `false` if censored.
    pub event_observed: bool,
    /// Optional stratum label (e.g. a player position).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Observation {
    /// Creates an ungrouped observation after validating its duration.
    pub fn new(duration: f64, event_observed: bool) -> Result<Self, SurvivalError> {
        let duration = validate_duration(0, duration)?;
        Ok(Self {
            duration,
            event_observed,
            group: None,
        })
    }

    /// Attaches a group label.
    #[must_use]
    pub fn with_group<S>(mut self, group: S) -> Self
    where
        S: Into<String>,
    {
        self.group = Some(group.into());
        self
    }

    /// Returns `true` if the record is right-censored.
    #[must_use]
    pub fn is_censored(&self) -> bool {
        !self.event_observed
    }
}

/// Checks that a duration is finite and non-negative, folding `-0.0` into `0.0`.
pub(crate) fn validate_duration(index: usize, duration: f64) -> Result<f64, SurvivalError> {
    if !duration.is_finite() {
        return Err(InvalidInputKind::NonFiniteDuration { index, duration }.into());
    }
    if duration < 0.0 {
        return Err(InvalidInputKind::NegativeDuration { index, duration }.into());
    }
    Ok(duration + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_duration() {
        let err = Observation::new(-0.5, true).unwrap_err();
        assert_eq!(
            err,
            SurvivalError::InvalidInput(InvalidInputKind::NegativeDuration {
                index: 0,
                duration: -0.5
            })
        );
    }

    #[test]
    fn test_rejects_non_finite_duration() {
        assert!(Observation::new(f64::NAN, false).is_err());
        assert!(Observation::new(f64::INFINITY, true).is_err());
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        let obs = Observation::new(-0.0, true).unwrap();
        assert!(obs.duration.is_sign_positive());
    }

    #[test]
    fn test_group_is_optional_in_json() {
        let obs: Observation =
            serde_json::from_str(r#"{"duration": 3.0, "event_observed": false}"#).unwrap();
        assert_eq!(obs.group, None);
        assert!(obs.is_censored());

        let obs: Observation =
            serde_json::from_str(r#"{"duration": 3, "event_observed": true, "group": "WR"}"#)
                .unwrap();
        assert_eq!(obs.group.as_deref(), Some("WR"));
    }
}
