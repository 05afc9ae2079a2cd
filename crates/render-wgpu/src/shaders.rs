/// Uniforms and vertex stage shared by both cube shaders.
const COMMON: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    light_pos: vec4<f32>,
    view_pos: vec4<f32>,
    object_color: vec4<f32>,
    light_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) normal: vec3<f32>,
};

struct InstanceInput {
    @location(3) model_0: vec4<f32>,
    @location(4) model_1: vec4<f32>,
    @location(5) model_2: vec4<f32>,
    @location(6) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.uv = vertex.uv;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    return out;
}
"#;

const TEXTURED_FRAGMENT: &str = r#"
@group(1) @binding(0)
var t_color: texture_2d<f32>;
@group(1) @binding(1)
var s_color: sampler;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(t_color, s_color, in.uv);
}
"#;

const PHONG_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_color = uniforms.light_color.rgb;
    let norm = normalize(in.world_normal);
    let light_dir = normalize(uniforms.light_pos.xyz - in.world_pos);

    let ambient = 0.1 * light_color;
    let diffuse = max(dot(norm, light_dir), 0.0) * light_color;

    let view_dir = normalize(uniforms.view_pos.xyz - in.world_pos);
    let reflect_dir = reflect(-light_dir, norm);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), 256.0);
    let specular = 0.5 * spec * light_color;

    let result = (ambient + diffuse + specular) * uniforms.object_color.rgb;
    return vec4<f32>(result, 1.0);
}
"#;

/// WGSL for unlit textured cubes (and light markers).
pub fn textured_shader() -> String {
    format!("{COMMON}{TEXTURED_FRAGMENT}")
}

/// WGSL for the Phong-lit cube.
pub fn phong_shader() -> String {
    format!("{COMMON}{PHONG_FRAGMENT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shaders_share_vertex_stage() {
        for src in [textured_shader(), phong_shader()] {
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
    }

    #[test]
    fn only_textured_binds_a_texture() {
        assert!(textured_shader().contains("@group(1)"));
        assert!(!phong_shader().contains("@group(1)"));
    }
}
