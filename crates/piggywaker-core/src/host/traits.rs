/// The accelerometer subscription.
///
/// The guard enables it exactly while the detector runs and the host is in
/// the foreground, and disables it otherwise. Calls are never repeated for
/// the same transition.
pub trait SampleSource {
    /// Begin delivering samples.
    fn enable(&mut self);

    /// Stop delivering samples.
    fn disable(&mut self);
}

/// Whatever buzzes the wearer.
///
/// Fire and forget: an implementation lacking the permission or hardware to
/// vibrate may silently do nothing. The detector counts the alert either way.
pub trait AlertActuator {
    fn buzz(&mut self, pulse_ms: u64);
}

/// A source that only remembers whether it is switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSwitch {
    pub enabled: bool,
    /// Number of enable/disable calls received.
    pub toggles: u32,
}

impl SampleSource for SourceSwitch {
    fn enable(&mut self) {
        self.enabled = true;
        self.toggles += 1;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.toggles += 1;
    }
}

/// An actuator that records each requested pulse instead of vibrating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulseLog {
    pub pulses: Vec<u64>,
}

impl AlertActuator for PulseLog {
    fn buzz(&mut self, pulse_ms: u64) {
        self.pulses.push(pulse_ms);
    }
}
