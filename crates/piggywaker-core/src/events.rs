use serde::{Deserialize, Serialize};

use crate::detector::DetectorState;

/// Every state change of the detector produces an Event.
/// Hosts print or forward them; the actuator reacts to `StillnessAlert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DetectorStarted {
        at_ms: u64,
    },
    DetectorPaused {
        /// Stillness reference frozen by the pause.
        reference_ms: u64,
        alerts_fired: u64,
    },
    DetectorResumed {
        at_ms: u64,
    },
    DetectorStopped {
        alerts_fired: u64,
    },
    /// The wearer has been still for longer than the configured window.
    StillnessAlert {
        at_ms: u64,
        /// Stillness measured against the reference before it advanced.
        still_for_ms: u64,
        magnitude: f64,
        /// 1-based count of alerts in the current session.
        alert_index: u64,
    },
    StateSnapshot {
        state: DetectorState,
        magnitude: f64,
        still_for_ms: u64,
        session_elapsed_ms: Option<u64>,
        alerts_fired: u64,
        at_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(Event::DetectorStarted { at_ms: 42 }).unwrap();
        assert_eq!(json["type"], "DetectorStarted");
        assert_eq!(json["at_ms"], 42);
    }

    #[test]
    fn snapshot_state_is_lowercase() {
        let event = Event::StateSnapshot {
            state: DetectorState::Paused,
            magnitude: 0.5,
            still_for_ms: 10,
            session_elapsed_ms: None,
            alerts_fired: 0,
            at_ms: 10,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["state"], "paused");
        assert!(json["session_elapsed_ms"].is_null());
    }
}
