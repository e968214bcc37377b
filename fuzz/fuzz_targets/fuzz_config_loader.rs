#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = toml::from_str::<gcprand_config::Config>(data) {
        let _ = cfg.validate();
        // The crate's loader must agree with a direct parse.
        assert_eq!(gcprand_config::load_toml(data).ok().as_ref(), Some(&cfg));
    }
});
