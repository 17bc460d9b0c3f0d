//! Integration tests for the host glue: config files, recorded input streams
//! and the display tick driving a `WakeGuard` end to end.

use std::io::Write;

use chrono::{TimeZone, Utc};
use piggywaker_core::host::{read_inputs, PulseLog, SourceSwitch};
use piggywaker_core::{Config, DetectorState, Event, HostInput, StillnessDetector, WakeGuard};

fn guard_from(config: &Config) -> WakeGuard<SourceSwitch, PulseLog> {
    WakeGuard::new(
        StillnessDetector::new(config.detector),
        SourceSwitch::default(),
        PulseLog::default(),
    )
    .with_pulse_ms(config.alert.pulse_ms)
}

fn recorded_session() -> String {
    let mut lines = vec![r#"{"type":"gesture","gesture":"double_tap","at_ms":0}"#.to_string()];
    for i in 0..40u64 {
        lines.push(format!(
            r#"{{"type":"sample","x":0.0,"y":0.0,"z":9.8,"at_ms":{}}}"#,
            i * 100
        ));
    }
    lines.push(r#"{"type":"gesture","gesture":"long_press","at_ms":4000}"#.to_string());
    lines.join("\n")
}

#[test]
fn config_file_drives_detector_cadence() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[detector]\nstillness_ms = 2000\nalert_step_ms = 1000\n\n[alert]\npulse_ms = 600"
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    let mut guard = guard_from(&config);

    let mut events = Vec::new();
    for input in read_inputs(recorded_session().as_bytes()) {
        if let Some(event) = guard.apply(input.unwrap()).event {
            events.push(event);
        }
    }

    let alerts: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::StillnessAlert { at_ms, .. } => Some(*at_ms),
            _ => None,
        })
        .collect();
    // Gravity reads as motion until the filter settles at the tenth sample
    // (900 ms); alerts then need more than 2000 ms of stillness, repeating
    // every 1000 ms.
    assert_eq!(alerts, vec![3000]);
    assert_eq!(guard.actuator().pulses, vec![600]);
    assert!(matches!(
        events.last(),
        Some(Event::DetectorStopped { alerts_fired: 1 })
    ));
    assert_eq!(guard.detector().state(), DetectorState::Stopped);
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn background_pauses_delivery_but_not_the_stillness_clock() {
    let mut guard = guard_from(&Config::default());
    guard.apply(HostInput::Start { at_ms: 0 });
    for _ in 0..200 {
        guard.apply(HostInput::Sample(piggywaker_core::Sample::new(0.0, 0.0, 9.8, 0)));
    }
    guard.apply(HostInput::Background);
    assert!(!guard.source().enabled);

    // Coming back after a long absence alerts on the first sample.
    guard.apply(HostInput::Foreground);
    let outcome = guard.apply(HostInput::Sample(piggywaker_core::Sample::new(
        0.0, 0.0, 9.8, 60_000,
    )));
    assert!(outcome.reading.unwrap().alert_fired);
    assert!(matches!(outcome.event, Some(Event::StillnessAlert { .. })));
}

#[test]
fn tick_tracks_session_through_pause() {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap();
    let start_ms = start.timestamp_millis() as u64;
    let mut guard = guard_from(&Config::default());
    guard.start(start_ms);

    let display = guard.tick(&(start + chrono::Duration::seconds(90)));
    assert_eq!(display.elapsed.as_deref(), Some("00:01:30"));
    assert_eq!(display.clock, "22:01:30");

    guard.pause();
    let paused = guard.tick(&(start + chrono::Duration::seconds(120)));
    assert_eq!(paused.state, DetectorState::Paused);
    assert!(paused.elapsed.is_none());
    assert!(paused.acceleration.is_some());

    guard.resume(start_ms + 600_000);
    let resumed = guard.tick(&(start + chrono::Duration::seconds(605)));
    assert_eq!(resumed.elapsed.as_deref(), Some("00:10:05"));
}
