use crate::{
    error::{InvalidInputKind, SurvivalError},
    observation::{Observation, validate_duration},
};

/// Risk-set bookkeeping at one distinct timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventTableRow {
    /// The timestamp this row describes.
    pub time: f64,
    /// Number of subjects with `duration >= time`, counted before any removal at `time`.
    pub at_risk: usize,
    /// Number of events observed at `time`.
    pub events: usize,
    /// Number of subjects censored at `time`.
    pub censored: usize,
}

impl EventTableRow {
    /// Number of subjects leaving the risk set at this timestamp.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.events + self.censored
    }
}

/// Per-timestamp risk sets, events and censorings for one group of observations.
///
/// Every distinct duration in the input gets a row, including timestamps that
/// only carry censorings. Rows are strictly increasing in time.
///
/// When an event and a censoring share a timestamp, the censored subject is
/// still counted in that row's risk set and leaves it afterwards together with
/// the event.
///
/// # Examples
///
/// ```
/// use careerspan_stats::event_table::EventTable;
///
/// // (duration, event_observed)
/// let table = EventTable::from_pairs(&[(5.0, true), (5.0, false), (8.0, true)]).unwrap();
///
/// let first = &table.rows()[0];
/// assert_eq!((first.time, first.at_risk, first.events, first.censored), (5.0, 3, 1, 1));
/// assert_eq!(table.rows()[1].at_risk, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EventTable {
    rows: Vec<EventTableRow>,
    total: usize,
}

impl EventTable {
    /// Builds the event table from a group of observations.
    ///
    /// Group labels are ignored; partition beforehand to build per-group tables.
    ///
    /// # Errors
    ///
    /// Returns [`SurvivalError::InvalidInput`] if the collection is empty or
    /// any duration is negative or not finite.
    pub fn from_observations(observations: &[Observation]) -> Result<Self, SurvivalError> {
        let data = observations
            .iter()
            .map(|obs| (obs.duration, obs.event_observed))
            .collect::<Vec<_>>();
        Self::from_data(data)
    }

    /// Builds the event table from `(duration, event_observed)` pairs.
    pub fn from_pairs(pairs: &[(f64, bool)]) -> Result<Self, SurvivalError> {
        Self::from_data(pairs.to_vec())
    }

    /// Wraps precomputed rows, checking the table invariants.
    ///
    /// Rows must be strictly increasing in time with finite, non-negative
    /// timestamps, must satisfy `events + censored <= at_risk`, and each risk
    /// set must equal the previous one minus the subjects removed before it.
    /// An empty row list is accepted; fitting a curve on it fails with
    /// [`SurvivalError::EmptyCurve`].
    pub fn from_rows(mut rows: Vec<EventTableRow>) -> Result<Self, SurvivalError> {
        for index in 0..rows.len() {
            rows[index].time = validate_duration(index, rows[index].time)?;
            let row = &rows[index];
            if row.removed() > row.at_risk {
                return Err(InvalidInputKind::InconsistentRow { index }.into());
            }
            if let Some(prev) = index.checked_sub(1).map(|i| &rows[i]) {
                if prev.time >= row.time {
                    return Err(InvalidInputKind::UnorderedRows { index }.into());
                }
                if prev.at_risk - prev.removed() != row.at_risk {
                    return Err(InvalidInputKind::InconsistentRow { index }.into());
                }
            }
        }
        let total = rows.first().map_or(0, |row| row.at_risk);
        Ok(Self { rows, total })
    }

    fn from_data(mut data: Vec<(f64, bool)>) -> Result<Self, SurvivalError> {
        if data.is_empty() {
            return Err(InvalidInputKind::Empty.into());
        }
        for (index, (duration, _)) in data.iter_mut().enumerate() {
            *duration = validate_duration(index, *duration)?;
        }

        data.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let total = data.len();
        let mut rows = vec![];

        let mut i = 0;
        while i < data.len() {
            let current_time = data[i].0;
            let at_risk = total - i;

            let mut events = 0;
            let mut censored = 0;
            let mut j = i;
            while j < data.len() && data[j].0.total_cmp(&current_time).is_eq() {
                if data[j].1 {
                    events += 1;
                } else {
                    censored += 1;
                }
                j += 1;
            }

            rows.push(EventTableRow {
                time: current_time,
                at_risk,
                events,
                censored,
            });

            i = j;
        }

        tracing::debug!(
            observations = total,
            timestamps = rows.len(),
            "built event table"
        );

        Ok(Self { rows, total })
    }

    #[must_use]
    pub fn rows(&self) -> &[EventTableRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of observations the table was built from.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Total number of observed events.
    #[must_use]
    pub fn total_events(&self) -> usize {
        self.rows.iter().map(|row| row.events).sum()
    }

    /// Total number of censored observations.
    #[must_use]
    pub fn total_censored(&self) -> usize {
        self.rows.iter().map(|row| row.censored).sum()
    }

    /// Timestamps with at least one observed event.
    pub fn event_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .filter(|row| row.events > 0)
            .map(|row| row.time)
    }

    /// Timestamps with at least one censored observation (censoring marks).
    pub fn censoring_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .filter(|row| row.censored > 0)
            .map(|row| row.time)
    }

    /// The largest timestamp in the table, i.e. the observation horizon.
    #[must_use]
    pub fn last_time(&self) -> Option<f64> {
        self.rows.last().map(|row| row.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<(f64, bool)> {
        vec![
            (1.0, true),
            (1.0, false),
            (2.0, true),
            (3.0, true),
            (3.0, false),
            (4.0, true),
        ]
    }

    #[test]
    fn test_scenario_table() {
        let table = EventTable::from_pairs(&scenario()).unwrap();
        let rows = table
            .rows()
            .iter()
            .map(|r| (r.time, r.at_risk, r.events, r.censored))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                (1.0, 6, 1, 1),
                (2.0, 4, 1, 0),
                (3.0, 3, 1, 1),
                (4.0, 1, 1, 0),
            ]
        );
        assert_eq!(table.total(), 6);
        assert_eq!(table.total_events(), 4);
        assert_eq!(table.total_censored(), 2);
    }

    #[test]
    fn test_tie_between_event_and_censoring() {
        // 10 subjects reach t=5: one event and one censoring there, 8 survive past it.
        let mut data = vec![(5.0, true), (5.0, false)];
        data.extend((0..8).map(|i| (6.0 + f64::from(i), true)));
        let table = EventTable::from_pairs(&data).unwrap();

        let at_5 = table.rows()[0];
        assert_eq!(at_5.time, 5.0);
        assert_eq!(at_5.at_risk, 10);
        assert_eq!(at_5.events, 1);
        assert_eq!(at_5.censored, 1);
        assert_eq!(at_5.removed(), 2);
        assert_eq!(table.rows()[1].at_risk, 8);
    }

    #[test]
    fn test_censoring_only_timestamps_are_kept() {
        let table = EventTable::from_pairs(&[(1.0, false), (2.0, true), (3.0, false)]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.event_times().collect::<Vec<_>>(), vec![2.0]);
        assert_eq!(table.censoring_times().collect::<Vec<_>>(), vec![1.0, 3.0]);
        assert_eq!(table.rows()[1].at_risk, 2);
        assert_eq!(table.last_time(), Some(3.0));
    }

    #[test]
    fn test_rows_are_strictly_increasing_and_consistent() {
        let table = EventTable::from_pairs(&[
            (4.0, true),
            (0.0, false),
            (2.5, true),
            (4.0, true),
            (2.5, false),
            (0.0, true),
        ])
        .unwrap();
        assert!(table.rows().windows(2).all(|w| w[0].time < w[1].time));
        for pair in table.rows().windows(2) {
            assert_eq!(pair[1].at_risk, pair[0].at_risk - pair[0].removed());
        }
        for row in table.rows() {
            assert!(row.removed() <= row.at_risk);
        }
    }

    #[test]
    fn test_signed_zero_shares_a_row() {
        let table = EventTable::from_pairs(&[(-0.0, true), (0.0, false)]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].removed(), 2);
    }

    #[test]
    fn test_from_rows_normalizes_signed_zero() {
        let rows = vec![EventTableRow {
            time: -0.0,
            at_risk: 2,
            events: 1,
            censored: 1,
        }];
        let table = EventTable::from_rows(rows).unwrap();
        assert!(table.rows()[0].time.is_sign_positive());
        assert_eq!(table, EventTable::from_pairs(&[(0.0, true), (0.0, false)]).unwrap());
    }

    #[test]
    fn test_from_rows_checks_invariants() {
        let table = EventTable::from_pairs(&scenario()).unwrap();
        let rebuilt = EventTable::from_rows(table.rows().to_vec()).unwrap();
        assert_eq!(rebuilt, table);

        let mut unordered = table.rows().to_vec();
        unordered.swap(0, 1);
        assert!(matches!(
            EventTable::from_rows(unordered),
            Err(SurvivalError::InvalidInput(InvalidInputKind::UnorderedRows { index: 1 }))
        ));

        let mut inconsistent = table.rows().to_vec();
        inconsistent[1].at_risk = 5;
        assert!(matches!(
            EventTable::from_rows(inconsistent),
            Err(SurvivalError::InvalidInput(InvalidInputKind::InconsistentRow { index: 1 }))
        ));

        let overfull = vec![EventTableRow {
            time: 1.0,
            at_risk: 1,
            events: 1,
            censored: 1,
        }];
        assert!(EventTable::from_rows(overfull).is_err());

        assert!(EventTable::from_rows(vec![]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert_eq!(
            EventTable::from_observations(&[]),
            Err(SurvivalError::InvalidInput(InvalidInputKind::Empty))
        );
    }

    #[test]
    fn test_invalid_duration_reports_index() {
        let err = EventTable::from_pairs(&[(1.0, true), (-2.0, false)]).unwrap_err();
        assert_eq!(
            err,
            SurvivalError::InvalidInput(InvalidInputKind::NegativeDuration {
                index: 1,
                duration: -2.0
            })
        );

        let err = EventTable::from_pairs(&[(f64::NAN, true)]).unwrap_err();
        assert!(matches!(
            err,
            SurvivalError::InvalidInput(InvalidInputKind::NonFiniteDuration { index: 0, .. })
        ));
    }
}
