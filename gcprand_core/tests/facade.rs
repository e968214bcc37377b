use std::sync::atomic::AtomicBool;
use std::time::Duration;

use gcprand_core::mocks::ScriptedIndicator;
use gcprand_core::{AcquireCfg, ColorLabel, GatherParams, GcpDot, GcpError};
use gcprand_traits::{LightColor, LightSink, ManualClock};
use rstest::rstest;

fn dot(pairs: Vec<(f64, f64)>) -> (GcpDot<ScriptedIndicator, ManualClock>, ManualClock) {
    let clock = ManualClock::starting_at(1_700_000_000.0);
    let dot = GcpDot::new(
        ScriptedIndicator::readings(pairs),
        clock.clone(),
        AcquireCfg::default(),
    )
    .unwrap();
    (dot, clock)
}

#[test]
fn sample_appends_and_returns_latest() {
    let (mut dot, _) = dot(vec![(45.0, 450.0), (225.0, 450.0)]);
    let first = dot.sample().unwrap().clone();
    assert_eq!(first.color(), ColorLabel::Yellow);
    let second = dot.sample().unwrap().clone();
    assert_eq!(second.index(), 0.5);
    assert_eq!(second.color(), ColorLabel::Green);
    assert_eq!(dot.history().count(), 2);
    assert_eq!(dot.history().latest().unwrap(), &second);
}

#[test]
fn failed_sample_leaves_history_untouched() {
    let (mut dot, _) = dot(vec![(45.0, 450.0)]);
    dot.sample().unwrap();
    let err = dot.sample().unwrap_err();
    assert_eq!(err, GcpError::Acquisition("script exhausted".into()));
    assert_eq!(dot.history().count(), 1);
}

#[test]
fn history_keeps_only_in_scale_samples_in_time_order() {
    // Out-of-scale readings (NaN, negative, above the chart) interleaved with valid ones
    let (mut dot, clock) = dot(vec![
        (900.0, 450.0),
        (45.0, 450.0),
        (f64::NAN, 450.0),
        (-1.0, 450.0),
        (225.0, 450.0),
        (451.0, 450.0),
        (450.0, 450.0),
        (0.0, 450.0),
    ]);
    let samples = 4;
    for _ in 0..samples {
        dot.sample().unwrap();
        clock.advance(Duration::from_millis(500));
    }

    let all = dot.history().all();
    assert_eq!(all.len(), samples);
    assert_eq!(dot.history().count(), samples);
    let positions: Vec<f64> = all.iter().map(|o| o.raw_position()).collect();
    assert_eq!(positions, vec![45.0, 225.0, 450.0, 0.0]);
    assert!(
        all.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()),
        "timestamps out of order"
    );
    assert!(all.windows(2).all(|w| w[0].timestamp() < w[1].timestamp()));
    assert_eq!(dot.acquirer().resamples(), 4);
}

#[test]
fn draw_random_fresh_samples_every_time() {
    let (mut dot, _) = dot(vec![(45.0, 450.0), (5.0, 100.0)]);
    assert_eq!(dot.draw_random(true).unwrap(), 0.1);
    assert_eq!(dot.draw_random(true).unwrap(), 0.5);
    assert_eq!(dot.history().count(), 2);
}

#[test]
fn draw_random_on_empty_history_samples_once() {
    let (mut dot, _) = dot(vec![(45.0, 450.0), (5.0, 100.0)]);
    assert_eq!(dot.draw_random(false).unwrap(), 0.1);
    assert_eq!(dot.history().count(), 1);
    // history is non-empty now: no further samples
    for _ in 0..10 {
        assert_eq!(dot.draw_random(false).unwrap(), 0.1);
    }
    assert_eq!(dot.history().count(), 1);
}

#[test]
fn draw_random_reuses_stored_values() {
    let (mut dot, _) = dot(vec![(45.0, 450.0), (5.0, 100.0)]);
    dot.sample().unwrap();
    dot.sample().unwrap();
    for _ in 0..20 {
        let v = dot.draw_random(false).unwrap();
        assert!(v == 0.1 || v == 0.5, "{v}");
    }
    assert_eq!(dot.history().count(), 2);
}

#[test]
fn gather_flushes_on_cadence_and_sleeps_between_samples() {
    let (mut dot, clock) = dot(vec![(45.0, 450.0); 5]);
    let params = GatherParams {
        limit: 5,
        flush_every: 2,
        delay: Duration::from_secs(3),
    };
    let mut out = Vec::new();
    let report = dot.gather(&params, &mut out).unwrap();

    assert_eq!(report.samples, 5);
    assert_eq!(report.flushes, 2);
    assert!(!report.stopped_early);
    let text = String::from_utf8(out).unwrap();
    // two entries after sample 2, four after sample 4
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().all(|l| l == "0.1"));
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(3); 4]);
}

#[rstest]
#[case(1, 3, 3)]
#[case(3, 3, 1)]
#[case(4, 3, 0)]
fn gather_flush_count(#[case] flush_every: usize, #[case] limit: usize, #[case] flushes: usize) {
    let (mut dot, _) = dot(vec![(1.0, 2.0); limit]);
    let params = GatherParams {
        limit,
        flush_every,
        delay: Duration::ZERO,
    };
    let report = dot.gather(&params, &mut std::io::sink()).unwrap();
    assert_eq!(report.flushes, flushes);
}

#[test]
fn gather_aborts_on_first_failure() {
    let (mut dot, _) = dot(vec![(45.0, 450.0); 3]);
    let params = GatherParams {
        limit: 10,
        flush_every: 2,
        delay: Duration::ZERO,
    };
    let mut out = Vec::new();
    let err = dot.gather(&params, &mut out).unwrap_err();
    assert!(matches!(err, GcpError::Acquisition(_)));
    assert_eq!(dot.history().count(), 3);
    assert_eq!(String::from_utf8(out).unwrap(), "0.1\n0.1\n");
}

#[test]
fn gather_rejects_zero_flush_interval() {
    let (mut dot, _) = dot(vec![(45.0, 450.0)]);
    let params = GatherParams {
        limit: 1,
        flush_every: 0,
        delay: Duration::ZERO,
    };
    let err = dot.gather(&params, &mut std::io::sink()).unwrap_err();
    assert!(matches!(err, GcpError::Config(_)));
    assert!(dot.history().is_empty());
}

#[test]
fn gather_until_honors_shutdown_flag() {
    let (mut dot, _) = dot(vec![(45.0, 450.0); 3]);
    let stop = AtomicBool::new(true);
    let report = dot
        .gather_until(&GatherParams::default(), &mut std::io::sink(), &stop)
        .unwrap();
    assert_eq!(report.samples, 0);
    assert!(report.stopped_early);
    assert!(dot.history().is_empty());
}

struct BrokenLight;
impl LightSink for BrokenLight {
    fn apply(&mut self, _: &LightColor) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("bridge unreachable".into())
    }
}

#[derive(Default)]
struct RecordingLight(Vec<LightColor>);
impl LightSink for RecordingLight {
    fn apply(&mut self, c: &LightColor) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.0.push(*c);
        Ok(())
    }
}

#[test]
fn update_light_pushes_color_for_fresh_sample() {
    let (mut dot, _) = dot(vec![(225.0, 450.0)]);
    let mut light = RecordingLight::default();
    let update = dot.update_light(&mut light, 0.4, 0.4).unwrap();
    assert!(update.applied);
    assert_eq!(update.color, ColorLabel::Green);
    assert_eq!(light.0, vec![update.light]);
    assert_eq!(dot.history().count(), 1);
}

#[test]
fn update_light_survives_sink_failure() {
    let (mut dot, _) = dot(vec![(45.0, 450.0)]);
    let update = dot.update_light(&mut BrokenLight, 0.4, 0.4).unwrap();
    assert!(!update.applied);
    assert_eq!(dot.history().count(), 1);
}

#[test]
fn update_light_rejects_out_of_range_parameters() {
    let (mut dot, _) = dot(vec![(45.0, 450.0)]);
    let err = dot.update_light(&mut BrokenLight, 1.5, 0.4).unwrap_err();
    assert!(matches!(err, GcpError::Config(_)));
    assert!(dot.history().is_empty());
}
