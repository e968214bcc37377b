use gcprand_core::{ColorLabel, Observation, classify, derive, normalize};
use gcprand_traits::RawReading;
use proptest::prelude::*;

proptest! {
    #[test]
    fn classify_is_total(x in any::<f64>()) {
        let label = classify(x);
        prop_assert!(ColorLabel::ALL.contains(&label));
    }

    #[test]
    fn derive_stays_below_one(x in 0.0f64..1.0) {
        let v = derive(x);
        prop_assert!((0.0..1.0).contains(&v), "derive({x}) = {v}");
    }

    #[test]
    fn normalize_stays_in_unit_interval(p in any::<f64>(), s in any::<f64>()) {
        let i = normalize(p, s);
        prop_assert!((0.0..=1.0).contains(&i), "normalize({p}, {s}) = {i}");
    }

    #[test]
    fn in_scale_readings_produce_consistent_observations(
        scale in 1e-3f64..1e6,
        frac in 0.0f64..=1.0,
    ) {
        let position = scale * frac;
        prop_assume!(position <= scale);
        let obs = Observation::from_reading(RawReading::new(position, scale), 0.0).unwrap();
        prop_assert!((0.0..=1.0).contains(&obs.index()));
        prop_assert_eq!(obs.color(), classify(obs.index()));
        prop_assert_eq!(obs.shifted_value(), derive(obs.index()));
    }

    #[test]
    fn above_scale_readings_are_rejected(scale in 1e-3f64..1e6, over in 1.0001f64..10.0) {
        prop_assert!(Observation::from_reading(RawReading::new(scale * over, scale), 0.0).is_err());
    }
}
