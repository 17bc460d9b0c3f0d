//! Recorded host streams.
//!
//! One JSON object per line, tagged by `type`:
//!
//! ```text
//! {"type":"start","at_ms":0}
//! {"type":"sample","x":0.0,"y":0.1,"z":9.8,"at_ms":20}
//! {"type":"gesture","gesture":"double_tap","at_ms":900}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use super::guard::Gesture;
use crate::detector::Sample;
use crate::error::{CoreError, Result};

/// Anything a host can hand to a `WakeGuard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostInput {
    Sample(Sample),
    Start { at_ms: u64 },
    Pause,
    Resume { at_ms: u64 },
    Stop,
    Gesture { gesture: Gesture, at_ms: u64 },
    Background,
    Foreground,
}

/// Parse one line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<HostInput>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| CoreError::Input {
            line: line_no,
            message: e.to_string(),
        })
}

/// Lazily parse a stream of host inputs. Line numbers in errors are 1-based.
pub fn read_inputs<R: BufRead>(reader: R) -> impl Iterator<Item = Result<HostInput>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Ok(line) => parse_line(&line, idx + 1).transpose(),
            Err(e) => Some(Err(CoreError::Io(e))),
        })
}
