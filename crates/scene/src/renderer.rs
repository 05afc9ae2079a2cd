use crate::plan::{FramePlan, PipelineKind};

/// Renderer-agnostic interface. Backends consume a frame plan and produce output.
///
/// Renderers never mutate scene or camera state; everything they need is in
/// the plan.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, plan: &FramePlan) -> Self::Output;
}

/// Text renderer for frame plans.
///
/// Produces a human-readable listing of the matrices, lighting and draw calls.
/// Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, plan: &FramePlan) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Frame ({} draws) ===\n", plan.draws.len()));
        let [r, g, b, a] = plan.clear_color;
        out.push_str(&format!("Clear: ({r:.2}, {g:.2}, {b:.2}, {a:.2})\n"));

        let eye = plan.view.inverse().transform_point3(glam::Vec3::ZERO);
        out.push_str(&format!(
            "Eye: ({:.2}, {:.2}, {:.2})\n",
            eye.x, eye.y, eye.z
        ));

        let l = plan.lighting.light_pos;
        out.push_str(&format!("Light: ({:.2}, {:.2}, {:.2})\n", l.x, l.y, l.z));

        for (i, draw) in plan.draws.iter().enumerate() {
            let p = draw.model.transform_point3(glam::Vec3::ZERO);
            let pipeline = match draw.pipeline {
                PipelineKind::Textured => "textured",
                PipelineKind::Phong => "phong",
            };
            let texture = draw
                .texture
                .map(|t| t.file_name())
                .unwrap_or("-");
            out.push_str(&format!(
                "  [{i}] {pipeline} tex={texture} pos=({:.2}, {:.2}, {:.2})\n",
                p.x, p.y, p.z
            ));
        }

        out
    }
}
