use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use hellocube_assets::TextureImage;
use hellocube_scene::{DrawCall, FramePlan, PipelineKind, TextureSlot, Vertex};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

/// Most draws a single frame plan may issue.
const MAX_INSTANCES: u32 = 64;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_pos: [f32; 4],
    view_pos: [f32; 4],
    object_color: [f32; 4],
    light_color: [f32; 4],
}

impl Uniforms {
    fn from_plan(plan: &FramePlan) -> Self {
        let l = &plan.lighting;
        Self {
            view_proj: plan.view_projection().to_cols_array_2d(),
            light_pos: l.light_pos.extend(1.0).to_array(),
            view_pos: l.view_pos.extend(1.0).to_array(),
            object_color: l.object_color.extend(1.0).to_array(),
            light_color: l.light_color.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
}

impl From<Mat4> for InstanceData {
    fn from(model: Mat4) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
        }
    }
}

/// Errors from building the GPU side of a scene.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("shader build failed: {0}")]
    Shader(String),
    #[error("texture {0:?} was not uploaded")]
    MissingTexture(TextureSlot),
    #[error("mesh is empty")]
    EmptyMesh,
    #[error("draw {index} uses the textured pipeline without a texture")]
    Untextured { index: usize },
    #[error("frame plan has {count} draws, at most {max} are supported")]
    TooManyDraws { count: usize, max: u32 },
}

/// Check that every draw in `draws` can be issued: within the instance buffer
/// and, for textured draws, naming an uploaded texture.
fn check_draws(
    draws: &[DrawCall],
    uploaded: impl Fn(TextureSlot) -> bool,
) -> Result<(), RenderError> {
    if draws.len() > MAX_INSTANCES as usize {
        return Err(RenderError::TooManyDraws {
            count: draws.len(),
            max: MAX_INSTANCES,
        });
    }
    for (index, draw) in draws.iter().enumerate() {
        if draw.pipeline != PipelineKind::Textured {
            continue;
        }
        match draw.texture {
            None => return Err(RenderError::Untextured { index }),
            Some(slot) if !uploaded(slot) => return Err(RenderError::MissingTexture(slot)),
            Some(_) => {}
        }
    }
    Ok(())
}

/// wgpu renderer for cube scenes.
pub struct WgpuRenderer {
    textured_pipeline: wgpu::RenderPipeline,
    phong_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_groups: BTreeMap<TextureSlot, wgpu::BindGroup>,
    cube_vertex_buffer: wgpu::Buffer,
    cube_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    /// Build pipelines, upload the cube mesh and every texture in `textures`.
    ///
    /// Shader and pipeline validation errors are captured and returned rather
    /// than reaching wgpu's uncaptured-error handler.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        mesh: &[Vertex],
        textures: &[(TextureSlot, &TextureImage)],
    ) -> Result<Self, RenderError> {
        if mesh.is_empty() {
            return Err(RenderError::EmptyMesh);
        }

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                light_pos: [0.0; 4],
                view_pos: [0.0; 4],
                object_color: [1.0; 4],
                light_color: [1.0; 4],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let textured_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("textured_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let phong_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phong_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let textured_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("textured_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::textured_shader().into()),
        });
        let phong_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("phong_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::phong_shader().into()),
        });

        let textured_pipeline = cube_pipeline(
            device,
            "textured_pipeline",
            &textured_layout,
            &textured_shader,
            surface_format,
        );
        let phong_pipeline = cube_pipeline(
            device,
            "phong_pipeline",
            &phong_layout,
            &phong_shader,
            surface_format,
        );

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Shader(err.to_string()));
        }

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cube_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mut texture_bind_groups = BTreeMap::new();
        for (slot, image) in textures {
            let view = upload_texture(device, queue, image, slot.file_name());
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(slot.file_name()),
                layout: &texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
            texture_bind_groups.insert(*slot, bind_group);
        }

        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(mesh),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (MAX_INSTANCES as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Ok(Self {
            textured_pipeline,
            phong_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_groups,
            cube_vertex_buffer,
            cube_vertex_count: mesh.len() as u32,
            instance_buffer,
            depth_texture,
        })
    }

    /// Fail if any of `slots` has no uploaded texture.
    pub fn require_textures(&self, slots: &[TextureSlot]) -> Result<(), RenderError> {
        match slots
            .iter()
            .find(|s| !self.texture_bind_groups.contains_key(*s))
        {
            Some(slot) => Err(RenderError::MissingTexture(*slot)),
            None => Ok(()),
        }
    }

    /// Render one frame plan: clear, then one cube draw per plan entry in order.
    ///
    /// The plan is checked before anything is encoded; a draw that cannot be
    /// issued fails the whole frame.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) -> Result<(), RenderError> {
        check_draws(&plan.draws, |slot| self.texture_bind_groups.contains_key(&slot))?;

        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::from_plan(plan)),
        );

        let instances: Vec<InstanceData> = plan
            .draws
            .iter()
            .map(|d| InstanceData::from(d.model))
            .collect();

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = plan.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for (i, draw) in plan.draws.iter().enumerate() {
                match draw.pipeline {
                    PipelineKind::Textured => {
                        pass.set_pipeline(&self.textured_pipeline);
                        if let Some(bind_group) = draw
                            .texture
                            .and_then(|slot| self.texture_bind_groups.get(&slot))
                        {
                            pass.set_bind_group(1, bind_group, &[]);
                        }
                    }
                    PipelineKind::Phong => pass.set_pipeline(&self.phong_pipeline),
                }
                let i = i as u32;
                pass.draw(0..self.cube_vertex_count, i..i + 1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn cube_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                        2 => Float32x3,
                    ],
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// Upload an RGBA8 image as a sampled 2D texture.
fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &TextureImage,
    label: &str,
) -> wgpu::TextureView {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.pixels,
    );
    tracing::debug!("uploaded texture {label} ({}x{})", image.width, image.height);
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use hellocube_scene::Lighting;

    fn textured(slot: Option<TextureSlot>) -> DrawCall {
        DrawCall {
            pipeline: PipelineKind::Textured,
            texture: slot,
            model: Mat4::IDENTITY,
        }
    }

    #[test]
    fn instance_data_is_column_major() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let data = InstanceData::from(model);
        assert_eq!(data.model_3, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(data.model_0, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn uniforms_carry_lighting() {
        let plan = FramePlan {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            view: Mat4::IDENTITY,
            projection: Mat4::from_scale(Vec3::splat(2.0)),
            lighting: Lighting::default(),
            draws: Vec::new(),
        };
        let u = Uniforms::from_plan(&plan);
        assert_eq!(u.view_proj[0], [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(u.light_pos, [0.0, 0.25, 2.0, 1.0]);
        assert_eq!(u.object_color, [1.0, 0.5, 0.31, 1.0]);
        assert_eq!(u.view_pos, [3.0, 3.0, 3.0, 1.0]);
    }

    #[test]
    fn gpu_structs_match_shader_layout() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 64 + 4 * 16);
        assert_eq!(std::mem::size_of::<InstanceData>(), 64);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn draws_need_an_uploaded_texture() {
        let only_primary = |slot: TextureSlot| slot == TextureSlot::Primary;
        let ok = [
            textured(Some(TextureSlot::Primary)),
            DrawCall {
                pipeline: PipelineKind::Phong,
                texture: None,
                model: Mat4::IDENTITY,
            },
        ];
        assert!(check_draws(&ok, only_primary).is_ok());

        let missing = [textured(Some(TextureSlot::Secondary))];
        assert!(matches!(
            check_draws(&missing, only_primary),
            Err(RenderError::MissingTexture(TextureSlot::Secondary))
        ));

        let untextured = [textured(Some(TextureSlot::Primary)), textured(None)];
        assert!(matches!(
            check_draws(&untextured, only_primary),
            Err(RenderError::Untextured { index: 1 })
        ));
    }

    #[test]
    fn draws_beyond_instance_buffer_are_rejected() {
        let draws = vec![textured(Some(TextureSlot::Primary)); MAX_INSTANCES as usize + 1];
        assert!(matches!(
            check_draws(&draws, |_| true),
            Err(RenderError::TooManyDraws { count: 65, max: 64 })
        ));
        assert!(check_draws(&draws[1..], |_| true).is_ok());
    }
}
