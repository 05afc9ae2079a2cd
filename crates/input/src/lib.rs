//! Input layer: raw window events reduced to camera-ready quantities.
//!
//! # Invariants
//! - The first cursor sample after the look button goes down never yields a delta.
//! - Frame deltas are never negative.
//! - Nothing here touches the camera; callers apply the deltas.

pub mod clock;
pub mod event;
pub mod keys;
pub mod mouse;

pub use clock::FrameClock;
pub use event::{InputEvent, TraceError, load_trace, parse_trace};
pub use keys::{MoveKey, MoveKeys};
pub use mouse::{LookState, MouseLook};
