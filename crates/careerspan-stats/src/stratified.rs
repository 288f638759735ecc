use std::collections::BTreeMap;

use crate::{
    config::EstimatorConfig, error::SurvivalError, kaplan_meier::KaplanMeierCurve,
    observation::Observation,
};

/// Independent Kaplan-Meier curves, one per group.
///
/// Groups are kept in key order, so repeated runs over the same input list
/// their curves in the same order.
///
/// # Examples
///
/// ```
/// use careerspan_stats::{config::EstimatorConfig, observation::Observation,
///     stratified::GroupedResult};
///
/// let observations = vec![
///     Observation::new(2.0, true).unwrap().with_group("RB"),
///     Observation::new(9.0, false).unwrap().with_group("QB"),
///     Observation::new(4.0, true).unwrap().with_group("QB"),
///     Observation::new(1.0, true).unwrap(),
/// ];
/// let result = GroupedResult::fit_by_label(&observations, &EstimatorConfig::default()).unwrap();
///
/// assert_eq!(result.labels().collect::<Vec<_>>(), vec!["QB", "RB"]);
/// assert_eq!(result.get("RB").unwrap().median(), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResult<K> {
    curves: BTreeMap<K, KaplanMeierCurve>,
}

/// Splits observations by key, dropping those whose key is `None`.
pub fn partition<K, F>(observations: &[Observation], mut group: F) -> BTreeMap<K, Vec<Observation>>
where
    K: Ord,
    F: FnMut(&Observation) -> Option<K>,
{
    let mut data_map: BTreeMap<K, Vec<Observation>> = BTreeMap::new();
    for obs in observations {
        if let Some(key) = group(obs) {
            data_map.entry(key).or_default().push(obs.clone());
        }
    }
    data_map
}

impl<K> GroupedResult<K>
where
    K: Ord,
{
    /// Partitions observations with `group` and fits one curve per group.
    ///
    /// Observations for which `group` returns `None` are dropped. Groups that
    /// end up with no observations never appear in the result.
    ///
    /// # Errors
    ///
    /// Fails as soon as any group fails to fit; no partial result is returned.
    pub fn fit_by<F>(
        observations: &[Observation],
        config: &EstimatorConfig,
        group: F,
    ) -> Result<Self, SurvivalError>
    where
        K: Clone,
        F: FnMut(&Observation) -> Option<K>,
    {
        let data_map = partition(observations, group);
        Self::fit_groups(&data_map, config)
    }

    /// Fits one curve per entry of an already partitioned map.
    ///
    /// Empty groups are skipped rather than reported as errors.
    pub fn fit_groups(
        data_map: &BTreeMap<K, Vec<Observation>>,
        config: &EstimatorConfig,
    ) -> Result<Self, SurvivalError>
    where
        K: Clone,
    {
        config.validate()?;

        tracing::debug!(groups = data_map.len(), "fitting stratified curves");

        let curves = data_map
            .iter()
            .filter(|(_, data)| !data.is_empty())
            .map(|(key, data)| {
                let curve = KaplanMeierCurve::from_observations(data, config)?;
                Ok((key.clone(), curve))
            })
            .collect::<Result<_, SurvivalError>>()?;

        Ok(Self { curves })
    }

    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&KaplanMeierCurve>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.curves.get(key)
    }
}

impl GroupedResult<String> {
    /// Stratifies by each observation's own group label, skipping unlabeled ones.
    pub fn fit_by_label(
        observations: &[Observation],
        config: &EstimatorConfig,
    ) -> Result<Self, SurvivalError> {
        Self::fit_by(observations, config, |obs| obs.group.clone())
    }

    /// Group labels in iteration order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }
}

impl<K> GroupedResult<K> {
    pub fn iter(&self) -> impl Iterator<Item = (&K, &KaplanMeierCurve)> {
        self.curves.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    #[must_use]
    pub fn into_map(self) -> BTreeMap<K, KaplanMeierCurve> {
        self.curves
    }
}

impl<'a, K> IntoIterator for &'a GroupedResult<K> {
    type Item = (&'a K, &'a KaplanMeierCurve);
    type IntoIter = std::collections::btree_map::Iter<'a, K, KaplanMeierCurve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidInputKind;

    fn scenario(group: &str) -> Vec<Observation> {
        [
            (1.0, true),
            (1.0, false),
            (2.0, true),
            (3.0, true),
            (3.0, false),
            (4.0, true),
        ]
        .into_iter()
        .map(|(d, e)| Observation::new(d, e).unwrap().with_group(group))
        .collect()
    }

    #[test]
    fn test_identical_groups_match_unstratified_curve() {
        let config = EstimatorConfig::default();
        let mut observations = scenario("A");
        observations.extend(scenario("B"));

        let unstratified = KaplanMeierCurve::from_observations(&scenario("A"), &config).unwrap();
        let result = GroupedResult::fit_by_label(&observations, &config).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("A"), Some(&unstratified));
        assert_eq!(result.get("B"), Some(&unstratified));
    }

    #[test]
    fn test_iteration_order_is_lexicographic() {
        let config = EstimatorConfig::default();
        let mut observations = scenario("WR");
        observations.extend(scenario("DB"));
        observations.extend(scenario("QB"));

        let result = GroupedResult::fit_by_label(&observations, &config).unwrap();
        assert_eq!(result.labels().collect::<Vec<_>>(), vec!["DB", "QB", "WR"]);
    }

    #[test]
    fn test_custom_key_and_filtered_groups() {
        let config = EstimatorConfig::default();
        let observations = scenario("A");

        // Split by whether the duration is even; drop duration 4 entirely.
        let result = GroupedResult::fit_by(&observations, &config, |obs| {
            #[expect(clippy::cast_possible_truncation)]
            let d = obs.duration as i64;
            (d != 4).then_some(d % 2 == 0)
        })
        .unwrap();

        assert_eq!(result.len(), 2);
        let even = result.get(&true).unwrap();
        assert_eq!(even.event_table().total(), 1);
        let odd = result.get(&false).unwrap();
        assert_eq!(odd.event_table().total(), 4);
    }

    #[test]
    fn test_unlabeled_observations_are_skipped() {
        let config = EstimatorConfig::default();
        let observations = vec![Observation::new(1.0, true).unwrap()];
        let result = GroupedResult::fit_by_label(&observations, &config).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_failing_group_fails_whole_run() {
        let config = EstimatorConfig::default();
        let mut observations = scenario("A");
        observations.push(Observation {
            duration: -1.0,
            event_observed: true,
            group: Some("B".to_owned()),
        });
        assert!(matches!(
            GroupedResult::fit_by_label(&observations, &config),
            Err(SurvivalError::InvalidInput(
                InvalidInputKind::NegativeDuration { .. }
            ))
        ));
    }

    #[test]
    fn test_invalid_confidence_level_is_rejected_up_front() {
        let config = EstimatorConfig::default().with_confidence_level(0.0);
        assert!(matches!(
            GroupedResult::fit_by_label(&[], &config),
            Err(SurvivalError::InvalidConfidenceLevel { .. })
        ));
    }
}
