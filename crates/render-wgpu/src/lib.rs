//! wgpu render backend for the cube scenes.
//!
//! Executes a [`hellocube_scene::FramePlan`]: one uniform upload per frame,
//! one instance slot per draw, one 36-vertex draw per cube.
//!
//! # Invariants
//! - Renderer never mutates scene or camera state.
//! - GPU resources are created once and live until the renderer is dropped.
//! - Shader build failures surface as [`RenderError::Shader`], never a panic.

mod gpu;
mod shaders;

pub use gpu::{RenderError, WgpuRenderer};
