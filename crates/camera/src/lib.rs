//! Free-look camera driven by mouse look and held movement keys.
//!
//! # Invariants
//! - `front` is recomputed from yaw/pitch on every applied look delta and is unit length.
//! - Pitch is not clamped unless a limit is configured.
//! - Translation scales linearly with frame delta time.

mod camera;
mod lens;
mod rig;

pub use camera::{BASE_SPEED, FreeLookCamera, SENSITIVITY, front_from_angles};
pub use lens::Lens;
pub use rig::CameraRig;
