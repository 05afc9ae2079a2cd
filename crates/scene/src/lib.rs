//! Demo scenes and renderer-agnostic frame plans.
//!
//! # Invariants
//! - Scenes describe frames; they never touch a GPU.
//! - Every draw is the same 36-vertex cube with its own model matrix.
//! - Draw order in a plan is the order the backend issues draws.

mod mesh;
mod plan;
mod renderer;
mod scene;

pub use mesh::{CUBE_VERTEX_COUNT, Vertex, cube_vertices};
pub use plan::{DrawCall, FramePlan, Lighting, PipelineKind, TextureSlot};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{
    CUBE_POSITIONS, MARKER_SCALE, PLACEMENT_ROTATION_STEP, Scene, SceneKind, UnknownScene,
    light_orbit, placement_model,
};
