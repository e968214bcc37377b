#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary external-command output must either be rejected or flow through
// the pipeline with an index in [0, 1] and a shifted value no larger than 1.
fuzz_target!(|data: &str| {
    let Ok(reading) = gcprand_devices::command::parse_reading(data) else {
        return;
    };
    if let Ok(obs) = gcprand_core::Observation::from_reading(reading, 0.0) {
        assert!((0.0..=1.0).contains(&obs.index()));
        assert!((0.0..=1.0).contains(&obs.shifted_value()));
        assert_eq!(obs.color(), gcprand_core::classify(obs.index()));
    }
});
