mod display;
mod guard;
mod input;
mod traits;

pub use display::{format_acceleration, format_elapsed, StatusDisplay};
pub use guard::{Gesture, Outcome, WakeGuard, DEFAULT_PULSE_MS};
pub use input::{parse_line, read_inputs, HostInput};
pub use traits::{AlertActuator, PulseLog, SampleSource, SourceSwitch};
