//! Error taxonomy for survival estimation.

/// Errors raised while building an event table or a survival curve.
///
/// All input-shape problems are reported while the event table is built, so a
/// failed call never leaves a partially computed curve behind.
///
/// An undefined median is not an error: [`KaplanMeierCurve::median`] returns
/// `None` instead.
///
/// [`KaplanMeierCurve::median`]: crate::kaplan_meier::KaplanMeierCurve::median
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SurvivalError {
    #[display("invalid input: {_0}")]
    InvalidInput(#[error(not(source))] InvalidInputKind),
    #[display("cannot build a survival curve from an empty event table")]
    EmptyCurve,
    #[display("confidence level {level} is outside the open interval (0, 1)")]
    InvalidConfidenceLevel { level: f64 },
}

/// The reason an observation collection was rejected.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum InvalidInputKind {
    #[display("observation collection is empty")]
    Empty,
    #[display("observation #{index} has negative duration {duration}")]
    NegativeDuration { index: usize, duration: f64 },
    #[display("observation #{index} has non-finite duration {duration}")]
    NonFiniteDuration { index: usize, duration: f64 },
    #[display("event table row #{index} is not strictly after the previous row")]
    UnorderedRows { index: usize },
    #[display("event table row #{index} has inconsistent risk-set counts")]
    InconsistentRow { index: usize },
}

impl From<InvalidInputKind> for SurvivalError {
    fn from(kind: InvalidInputKind) -> Self {
        Self::InvalidInput(kind)
    }
}
