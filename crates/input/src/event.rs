use crate::keys::MoveKey;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A window-system-independent input event.
///
/// The desktop app translates winit events into these; the CLI reads them
/// from JSON traces. Both feed the same camera rig.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Start of a frame at `now` seconds.
    Tick { now: f64 },
    /// Look button pressed or released.
    Button { pressed: bool },
    /// Absolute cursor position in window pixels.
    Cursor { x: f32, y: f32 },
    /// Movement key pressed or released.
    Key { key: MoveKey, pressed: bool },
}

/// Errors from reading an input trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed trace: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a JSON array of input events.
pub fn parse_trace(json: &str) -> Result<Vec<InputEvent>, TraceError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON input trace from disk.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<InputEvent>, TraceError> {
    let data = std::fs::read_to_string(path.as_ref())?;
    parse_trace(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_variant() {
        let json = r#"[
            {"Tick": {"now": 0.016}},
            {"Button": {"pressed": true}},
            {"Cursor": {"x": 400.0, "y": 300.0}},
            {"Key": {"key": "Forward", "pressed": true}}
        ]"#;
        let events = parse_trace(json).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], InputEvent::Tick { now: 0.016 });
        assert_eq!(events[1], InputEvent::Button { pressed: true });
        assert_eq!(events[2], InputEvent::Cursor { x: 400.0, y: 300.0 });
        assert_eq!(
            events[3],
            InputEvent::Key {
                key: MoveKey::Forward,
                pressed: true
            }
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_trace("/nonexistent/trace.json").unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
    }

    #[test]
    fn empty_trace() {
        assert!(parse_trace("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_key() {
        let json = r#"[{"Key": {"key": "Jump", "pressed": true}}]"#;
        assert!(matches!(parse_trace(json), Err(TraceError::Json(_))));
    }
}
