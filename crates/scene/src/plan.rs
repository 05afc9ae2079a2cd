use glam::{Mat4, Vec3};

/// Shader pipeline a draw call runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Unlit, samples the bound texture.
    Textured,
    /// Ambient + diffuse + specular point lighting, flat object color.
    Phong,
}

/// Which loaded texture a draw call samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    Primary,
    Secondary,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 2] = [TextureSlot::Primary, TextureSlot::Secondary];

    /// File name the texture is read from, relative to the assets directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TextureSlot::Primary => "square.png",
            TextureSlot::Secondary => "square2.png",
        }
    }
}

/// Uniform inputs for the Phong pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub light_pos: Vec3,
    pub light_color: Vec3,
    pub object_color: Vec3,
    pub view_pos: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light_pos: Vec3::new(0.0, 0.25, 2.0),
            light_color: Vec3::ONE,
            object_color: Vec3::new(1.0, 0.5, 0.31),
            view_pos: Vec3::new(3.0, 3.0, 3.0),
        }
    }
}

/// One cube draw: 36 vertices with a model matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub pipeline: PipelineKind,
    pub texture: Option<TextureSlot>,
    pub model: Mat4,
}

/// Everything a backend needs to draw one frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub clear_color: [f64; 4],
    pub view: Mat4,
    pub projection: Mat4,
    pub lighting: Lighting,
    pub draws: Vec<DrawCall>,
}

impl FramePlan {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
