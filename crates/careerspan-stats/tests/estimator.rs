use approx::assert_abs_diff_eq;
use careerspan_stats::{
    config::EstimatorConfig,
    error::{InvalidInputKind, SurvivalError},
    event_table::EventTable,
    kaplan_meier::KaplanMeierCurve,
    observation::Observation,
    stratified::GroupedResult,
};
use rand::{Rng as _, SeedableRng as _, seq::SliceRandom as _};
use rand_distr::{Distribution as _, Exp};
use rand_pcg::Pcg32;

fn scenario() -> Vec<Observation> {
    let durations = [1.0, 1.0, 2.0, 3.0, 3.0, 4.0];
    let events = [1, 0, 1, 1, 0, 1];
    durations
        .into_iter()
        .zip(events)
        .map(|(d, e)| Observation::new(d, e == 1).unwrap())
        .collect()
}

/// Career lengths in whole years, roughly a third still active.
fn synthetic_careers(rng: &mut Pcg32, n: usize) -> Vec<Observation> {
    let exp = Exp::new(0.25_f64).unwrap();
    (0..n)
        .map(|_| {
            let years = exp.sample(rng).ceil().min(25.0);
            let active = rng.random_bool(0.3);
            Observation::new(years, !active).unwrap()
        })
        .collect()
}

#[test]
fn scenario_end_to_end() {
    let curve = KaplanMeierCurve::from_observations(&scenario(), &EstimatorConfig::default())
        .unwrap();

    let table = curve.event_table();
    let rows = table
        .rows()
        .iter()
        .map(|r| (r.time, r.at_risk, r.events))
        .collect::<Vec<_>>();
    assert_eq!(
        rows,
        vec![(1.0, 6, 1), (2.0, 4, 1), (3.0, 3, 1), (4.0, 1, 1)]
    );

    assert_abs_diff_eq!(curve.predict(1.0), 0.8333, epsilon = 1e-4);
    assert_abs_diff_eq!(curve.predict(2.0), 0.625, epsilon = 1e-12);
    assert_abs_diff_eq!(curve.predict(3.0), 0.4167, epsilon = 1e-4);
    assert_eq!(curve.predict(4.0), 0.0);
    assert_eq!(curve.median(), Some(3.0));

    let points = curve.points();
    assert_eq!(points.len(), 4);
    assert_eq!(points[3], (4.0, 0.0, None, None));
}

#[test]
fn shuffled_input_gives_bit_identical_curves() {
    let mut rng = Pcg32::seed_from_u64(7);
    let mut observations = synthetic_careers(&mut rng, 500);
    let config = EstimatorConfig::default();
    let reference = KaplanMeierCurve::from_observations(&observations, &config).unwrap();

    for _ in 0..10 {
        observations.shuffle(&mut rng);
        let curve = KaplanMeierCurve::from_observations(&observations, &config).unwrap();
        assert_eq!(curve, reference);
        let bits = |c: &KaplanMeierCurve| {
            c.rows()
                .iter()
                .map(|r| (r.survival_prob.to_bits(), r.variance.map(f64::to_bits)))
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(&curve), bits(&reference));
    }
}

#[test]
fn uncensored_sample_matches_empirical_survival() {
    let mut rng = Pcg32::seed_from_u64(42);
    let exp = Exp::new(0.5_f64).unwrap();
    let durations = (0..300)
        .map(|_| (exp.sample(&mut rng) * 10.0).round() / 10.0)
        .collect::<Vec<f64>>();
    let observations = durations
        .iter()
        .map(|&d| Observation::new(d, true).unwrap())
        .collect::<Vec<_>>();
    let curve = KaplanMeierCurve::from_observations(&observations, &EstimatorConfig::default())
        .unwrap();

    for t in [0.0, 0.3, 1.0, 2.5, 4.0, 7.5, 100.0] {
        #[expect(clippy::cast_precision_loss)]
        let expected = durations.iter().filter(|&&d| d > t).count() as f64 / durations.len() as f64;
        assert_abs_diff_eq!(curve.predict(t), expected, epsilon = 1e-9);
    }
}

#[test]
fn tie_break_removes_event_and_censoring_together() {
    let mut pairs = vec![(5.0, true), (5.0, false)];
    pairs.extend((0..8).map(|i| (10.0 + f64::from(i), i % 2 == 0)));
    let table = EventTable::from_pairs(&pairs).unwrap();

    let at_5 = table.rows()[0];
    assert_eq!((at_5.at_risk, at_5.events, at_5.censored), (10, 1, 1));
    assert_eq!(table.rows()[1].at_risk, 8);

    let curve = KaplanMeierCurve::fit(&table, &EstimatorConfig::default()).unwrap();
    assert_abs_diff_eq!(curve.predict(5.0), 0.9, epsilon = 1e-12);
}

#[test]
fn all_censored_dataset() {
    let observations = (1..=5)
        .map(|d| Observation::new(f64::from(d), false).unwrap())
        .collect::<Vec<_>>();
    let curve = KaplanMeierCurve::from_observations(&observations, &EstimatorConfig::default())
        .unwrap();
    for t in [0.0, 1.0, 3.5, 5.0, 10.0] {
        assert_eq!(curve.predict(t), 1.0);
    }
    assert_eq!(curve.median(), None);
}

#[test]
fn stratified_runner_reproduces_unstratified_curve() {
    let config = EstimatorConfig::default();
    let mut rng = Pcg32::seed_from_u64(3);
    let careers = synthetic_careers(&mut rng, 120);
    let unstratified = KaplanMeierCurve::from_observations(&careers, &config).unwrap();

    let mut labeled = careers
        .iter()
        .cloned()
        .map(|obs| obs.with_group("DE"))
        .collect::<Vec<_>>();
    labeled.extend(careers.iter().cloned().map(|obs| obs.with_group("DT")));
    labeled.shuffle(&mut rng);

    let result = GroupedResult::fit_by_label(&labeled, &config).unwrap();
    assert_eq!(result.labels().collect::<Vec<_>>(), vec!["DE", "DT"]);
    for (_, curve) in &result {
        assert_eq!(curve, &unstratified);
    }
}

#[test]
fn empty_input_fails_before_any_arithmetic() {
    assert_eq!(
        KaplanMeierCurve::from_observations(&[], &EstimatorConfig::default()),
        Err(SurvivalError::InvalidInput(InvalidInputKind::Empty))
    );
}
