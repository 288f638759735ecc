use crate::{
    confidence,
    config::EstimatorConfig,
    error::SurvivalError,
    event_table::EventTable,
    observation::Observation,
};

/// One step of a Kaplan-Meier curve, emitted at each timestamp with at least one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurvivalRow {
    /// Event timestamp.
    pub time: f64,
    /// Survival probability from this timestamp until the next step.
    pub survival_prob: f64,
    /// Greenwood variance, or `None` once the risk set has been exhausted.
    pub variance: Option<f64>,
    /// Lower pointwise confidence bound, `None` where the variance is undefined.
    pub lower: Option<f64>,
    /// Upper pointwise confidence bound, `None` where the variance is undefined.
    pub upper: Option<f64>,
    /// Number of subjects at risk just before this timestamp.
    pub at_risk: usize,
    /// Number of events at this timestamp.
    pub events: usize,
}

/// A `(timestamp, survival, lower, upper)` tuple for plotting collaborators.
pub type CurvePoint = (f64, f64, Option<f64>, Option<f64>);

/// Kaplan-Meier survival curve for survival analysis.
///
/// The Kaplan-Meier estimator is a non-parametric statistic used to estimate the survival
/// function from lifetime data. It accounts for censored data (observations where the event
/// of interest has not occurred by the end of the study period).
///
/// The curve is a right-continuous step function with one row per event
/// timestamp. It is immutable once built; rows are exposed read-only.
///
/// # Examples
///
/// ```
/// use careerspan_stats::{config::EstimatorConfig, event_table::EventTable,
///     kaplan_meier::KaplanMeierCurve};
///
/// // (duration, event_observed)
/// let table = EventTable::from_pairs(&[
///     (1.0, true), (1.0, false), (2.0, true),
///     (3.0, true), (3.0, false), (4.0, true),
/// ]).unwrap();
/// let curve = KaplanMeierCurve::fit(&table, &EstimatorConfig::default()).unwrap();
///
/// assert!((curve.predict(2.5) - 0.625).abs() < 1e-12);
/// assert_eq!(curve.median(), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KaplanMeierCurve {
    rows: Vec<SurvivalRow>,
    event_table: EventTable,
    config: EstimatorConfig,
    z: f64,
}

impl KaplanMeierCurve {
    /// Computes the Kaplan-Meier survival curve from an event table.
    ///
    /// The survival probability starts at 1 and is multiplied by
    /// `1 - events / at_risk` at each event timestamp. Greenwood's sum
    /// `Σ events / (at_risk · (at_risk - events))` is accumulated alongside.
    /// When every subject at risk experiences the event, survival drops to 0
    /// and the variance is reported as `None` from then on.
    ///
    /// # Errors
    ///
    /// * [`SurvivalError::InvalidConfidenceLevel`] if the configured level is outside `(0, 1)`
    /// * [`SurvivalError::EmptyCurve`] if the event table has no rows
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(event_table: &EventTable, config: &EstimatorConfig) -> Result<Self, SurvivalError> {
        config.validate()?;
        let z = confidence::z_multiplier(config.confidence_level)?;
        if event_table.is_empty() {
            return Err(SurvivalError::EmptyCurve);
        }

        let mut rows = vec![];
        let mut current_survival = 1.0;
        let mut greenwood_sum = Some(0.0);

        for row in event_table.rows() {
            if row.events == 0 {
                continue;
            }

            let at_risk = row.at_risk as f64;
            let events = row.events as f64;
            current_survival *= 1.0 - events / at_risk;

            greenwood_sum = greenwood_sum.and_then(|sum| {
                (row.at_risk > row.events).then(|| sum + events / (at_risk * (at_risk - events)))
            });

            let variance = greenwood_sum.map(|sum| current_survival * current_survival * sum);
            let (lower, upper) = greenwood_sum
                .map(|sum| confidence::bounds(config.ci_method, z, current_survival, sum))
                .unzip();

            rows.push(SurvivalRow {
                time: row.time,
                survival_prob: current_survival,
                variance,
                lower,
                upper,
                at_risk: row.at_risk,
                events: row.events,
            });
        }

        tracing::debug!(
            steps = rows.len(),
            final_survival = current_survival,
            "fitted Kaplan-Meier curve"
        );

        Ok(Self {
            rows,
            event_table: event_table.clone(),
            config: *config,
            z,
        })
    }

    /// Builds the event table for `observations` and fits the curve in one step.
    pub fn from_observations(
        observations: &[Observation],
        config: &EstimatorConfig,
    ) -> Result<Self, SurvivalError> {
        config.validate()?;
        let table = EventTable::from_observations(observations)?;
        Self::fit(&table, config)
    }

    /// Curve steps, one per event timestamp, in increasing time order.
    #[must_use]
    pub fn rows(&self) -> &[SurvivalRow] {
        &self.rows
    }

    /// The event table the curve was built from, including censoring-only timestamps.
    #[must_use]
    pub fn event_table(&self) -> &EventTable {
        &self.event_table
    }

    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The normal multiplier used for the confidence bounds.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.z
    }

    /// The last observed timestamp (event or censoring).
    ///
    /// [`predict`](Self::predict) extends the curve flat beyond this point;
    /// callers that need to treat such queries as unknown compare against it.
    #[must_use]
    pub fn timeline_end(&self) -> Option<f64> {
        self.event_table.last_time()
    }

    /// The curve as `(timestamp, survival, lower, upper)` tuples.
    #[must_use]
    pub fn points(&self) -> Vec<CurvePoint> {
        self.rows
            .iter()
            .map(|row| (row.time, row.survival_prob, row.lower, row.upper))
            .collect()
    }

    /// Returns the survival probability at a specific time.
    ///
    /// This method uses a step function: the survival probability remains constant
    /// between event times and decreases only when an event occurs.
    ///
    /// Returns `1.0` if the time is before the first event, the last computed
    /// probability if the time is beyond the last observation, and `NaN` for a
    /// `NaN` query.
    ///
    /// # Examples
    ///
    /// ```
    /// # use careerspan_stats::{config::EstimatorConfig, event_table::EventTable,
    /// #     kaplan_meier::KaplanMeierCurve};
    /// let table = EventTable::from_pairs(&[(10.0, true), (20.0, true)]).unwrap();
    /// let curve = KaplanMeierCurve::fit(&table, &EstimatorConfig::default()).unwrap();
    ///
    /// assert_eq!(curve.predict(5.0), 1.0);  // Before first event
    /// assert_eq!(curve.predict(15.0), 0.5); // After first event
    /// assert_eq!(curve.predict(99.0), 0.0); // Flat beyond the horizon
    /// ```
    #[must_use]
    pub fn predict(&self, time: f64) -> f64 {
        if time.is_nan() {
            return f64::NAN;
        }
        let idx = self.rows.partition_point(|row| row.time <= time);
        match idx.checked_sub(1) {
            Some(i) => self.rows[i].survival_prob,
            None => 1.0,
        }
    }

    /// Evaluates [`predict`](Self::predict) at each of `times`.
    #[must_use]
    pub fn predict_many(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.predict(t)).collect()
    }

    /// Returns the smallest timestamp at which survival drops to or below `p`.
    ///
    /// Returns `None` if the curve never reaches `p` or if `p` is outside `[0, 1]`.
    #[must_use]
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if !(0.0..=1.0).contains(&p) {
            return None;
        }
        first_time_at_or_below(&self.rows, p, |row| Some(row.survival_prob))
    }

    /// Returns the median survival time.
    ///
    /// The median survival time is the smallest time at which the survival
    /// probability drops to or below 50%. If the survival probability never
    /// reaches 50%, this method returns `None`; it never falls back to the last
    /// timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// # use careerspan_stats::{config::EstimatorConfig, event_table::EventTable,
    /// #     kaplan_meier::KaplanMeierCurve};
    /// let config = EstimatorConfig::default();
    /// let table = EventTable::from_pairs(&[(10.0, true), (20.0, true), (30.0, true)]).unwrap();
    /// let curve = KaplanMeierCurve::fit(&table, &config).unwrap();
    /// assert_eq!(curve.median(), Some(20.0));
    ///
    /// let table = EventTable::from_pairs(&[(10.0, true), (20.0, false), (30.0, false)]).unwrap();
    /// let curve = KaplanMeierCurve::fit(&table, &config).unwrap();
    /// assert_eq!(curve.median(), None);
    /// ```
    #[must_use]
    pub fn median(&self) -> Option<f64> {
        self.percentile(0.5)
    }

    /// Returns `(lower, upper)` bounds of the median survival time.
    ///
    /// The lower bound is the first time the lower confidence band falls to or
    /// below 0.5, the upper bound the first time the upper band does. Either
    /// is `None` if the band never gets there.
    #[must_use]
    pub fn median_confidence_interval(&self) -> (Option<f64>, Option<f64>) {
        let lower = first_time_at_or_below(&self.rows, 0.5, |row| row.lower);
        let upper = first_time_at_or_below(&self.rows, 0.5, |row| row.upper);
        (lower, upper)
    }
}

fn first_time_at_or_below<F>(rows: &[SurvivalRow], threshold: f64, value: F) -> Option<f64>
where
    F: Fn(&SurvivalRow) -> Option<f64>,
{
    rows.iter()
        .find(|row| value(row).is_some_and(|v| v <= threshold))
        .map(|row| row.time)
}
