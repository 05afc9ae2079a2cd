use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use hellocube_assets::{AssetDir, TextureImage};
use hellocube_camera::{CameraRig, FreeLookCamera};
use hellocube_input::{InputEvent, MoveKey};
use hellocube_render_wgpu::WgpuRenderer;
use hellocube_scene::{FramePlan, Scene, SceneKind, TextureSlot};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const WINDOW_TITLE: &str = "Cube";

#[derive(Parser)]
#[command(name = "hellocube-desktop", about = "Rotating and lit cube demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene to run: gallery, phong or orbit
    #[arg(long, default_value = "gallery")]
    scene: SceneKind,

    /// Directory containing square.png and square2.png
    #[arg(long, default_value = ".")]
    assets_dir: String,

    /// Clamp camera pitch to +/- this many degrees (unclamped by default)
    #[arg(long)]
    pitch_limit: Option<f32>,

    /// Show the camera overlay at startup (F1 toggles)
    #[arg(long)]
    hud: bool,
}

fn move_key(key: KeyCode) -> Option<MoveKey> {
    match key {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Back),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        _ => None,
    }
}

/// Scene, camera and timing state owned by the render loop.
struct AppState {
    scene: Scene,
    rig: CameraRig,
    started: Instant,
    show_hud: bool,
}

impl AppState {
    fn new(kind: SceneKind, pitch_limit: Option<f32>, show_hud: bool) -> Self {
        let camera = FreeLookCamera::default().with_pitch_limit(pitch_limit);
        Self {
            scene: Scene::new(kind),
            rig: CameraRig::new(camera, 0.0),
            started: Instant::now(),
            show_hud,
        }
    }

    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Forward input to the camera rig, but only for scenes that look through it.
    fn input(&mut self, event: InputEvent) {
        if self.scene.kind().uses_free_camera() {
            self.rig.handle(event);
        }
    }

    /// Look-button transition. `over_hud` presses belong to the overlay; releases
    /// always reach the rig so a drag that ends on the overlay still stops.
    fn look_button(&mut self, pressed: bool, over_hud: bool) {
        if pressed && over_hud {
            return;
        }
        self.input(InputEvent::Button { pressed });
    }

    /// The window lost focus: no key or button release will arrive for it.
    fn focus_lost(&mut self) {
        self.rig.keys.clear();
        self.input(InputEvent::Button { pressed: false });
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key) = move_key(key) {
            self.input(InputEvent::Key { key, pressed });
            return;
        }
        if pressed && key == KeyCode::F1 {
            self.show_hud = !self.show_hud;
        }
    }

    /// Advance timing, apply held keys, and describe the frame.
    fn frame(&mut self) -> FramePlan {
        let now = self.now();
        let dt = self.rig.frame(now);
        self.scene.plan(&self.rig.camera, now, dt)
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let cam = &self.rig.camera;
        egui::Window::new("Camera")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Scene: {}", self.scene.kind()));
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    cam.position.x, cam.position.y, cam.position.z
                ));
                ui.label(format!(
                    "Front: ({:.2}, {:.2}, {:.2})",
                    cam.front.x, cam.front.y, cam.front.z
                ));
                ui.label(format!("Yaw: {:.1}  Pitch: {:.1}", cam.yaw, cam.pitch));
                ui.label(format!("Frame: {:.1} ms", self.rig.clock.delta() * 1000.0));
                ui.separator();
                ui.small("F1: Toggle HUD | LMB drag: Look | WASD: Move");
            });
    }
}

struct GpuApp {
    state: AppState,
    textures: Vec<(TextureSlot, TextureImage)>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    /// Set when startup fails; the loop exits and `main` returns it.
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState, textures: Vec<(TextureSlot, TextureImage)>) -> Self {
        Self {
            state,
            textures,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            fatal: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("hellocube_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let kind = self.state.scene.kind();
        let textures: Vec<(TextureSlot, &TextureImage)> =
            self.textures.iter().map(|(slot, img)| (*slot, img)).collect();
        let renderer = WgpuRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            &kind.mesh(),
            &textures,
        )?;
        renderer.require_textures(kind.textures())?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let plan = self.state.frame();

        let (Some(surface), Some(device), Some(queue), Some(renderer)) =
            (&self.surface, &self.device, &self.queue, &self.renderer)
        else {
            return Ok(());
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(config) = &self.config {
                    surface.configure(device, config);
                }
                return Ok(());
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return Ok(());
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(device, queue, &view, &plan)?;
        self.paint_hud(&view);

        output.present();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        Ok(())
    }

    fn paint_hud(&mut self, view: &wgpu::TextureView) {
        let (
            Some(window),
            Some(device),
            Some(queue),
            Some(config),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            self.window.as_ref(),
            self.device.as_ref(),
            self.queue.as_ref(),
            self.config.as_ref(),
            self.egui_winit.as_mut(),
            self.egui_renderer.as_mut(),
        )
        else {
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hud_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("hud_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.fatal.is_some() {
            return;
        }

        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&mut self.egui_winit, &self.window) {
            (Some(egui_winit), Some(window)) => {
                egui_winit.on_window_event(window, &event).consumed && self.state.show_hud
            }
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state
                    .look_button(btn_state == ElementState::Pressed, consumed);
            }
            WindowEvent::Focused(false) => self.state.focus_lost(),
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    tracing::error!("render failed: {e:#}");
                    self.fatal = Some(e);
                    event_loop.exit();
                }
            }
            _ if consumed => {}
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.input(InputEvent::Cursor {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Decode every texture the scene samples. Any failure is fatal.
fn load_scene_textures(
    assets: &AssetDir,
    kind: SceneKind,
) -> Result<Vec<(TextureSlot, TextureImage)>> {
    kind.textures()
        .iter()
        .map(|&slot| {
            assets
                .load(slot.file_name())
                .map(|image| (slot, image))
                .map_err(|e| {
                    tracing::error!("{e}");
                    anyhow::Error::from(e)
                })
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("hellocube-desktop starting scene {}", cli.scene);

    let assets = AssetDir::new(&cli.assets_dir);
    tracing::debug!("textures from {}", assets.root().display());
    let textures = load_scene_textures(&assets, cli.scene)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let state = AppState::new(cli.scene, cli.pitch_limit, cli.hud);
    let mut app = GpuApp::new(state, textures);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_move_keys() {
        assert_eq!(move_key(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(move_key(KeyCode::KeyS), Some(MoveKey::Back));
        assert_eq!(move_key(KeyCode::KeyA), Some(MoveKey::Left));
        assert_eq!(move_key(KeyCode::KeyD), Some(MoveKey::Right));
        assert_eq!(move_key(KeyCode::Space), None);
    }

    #[test]
    fn fixed_scenes_ignore_camera_input() {
        let mut state = AppState::new(SceneKind::Phong, None, false);
        state.handle_key(KeyCode::KeyW, true);
        assert!(!state.rig.keys.any());

        let mut state = AppState::new(SceneKind::Gallery, None, false);
        state.handle_key(KeyCode::KeyW, true);
        assert!(state.rig.keys.forward);
    }

    #[test]
    fn f1_toggles_hud() {
        let mut state = AppState::new(SceneKind::Gallery, None, false);
        state.handle_key(KeyCode::F1, true);
        assert!(state.show_hud);
        state.handle_key(KeyCode::F1, false);
        assert!(state.show_hud);
        state.handle_key(KeyCode::F1, true);
        assert!(!state.show_hud);
    }

    #[test]
    fn release_over_hud_still_ends_the_drag() {
        let mut state = AppState::new(SceneKind::Gallery, None, true);
        state.look_button(true, false);
        state.input(InputEvent::Cursor { x: 100.0, y: 100.0 });
        state.input(InputEvent::Cursor { x: 110.0, y: 100.0 });
        assert!((state.rig.camera.yaw - (-89.0)).abs() < 1e-4);

        state.look_button(false, true);
        assert!(!state.rig.mouse.is_held());
        state.input(InputEvent::Cursor { x: 300.0, y: 50.0 });
        assert!((state.rig.camera.yaw - (-89.0)).abs() < 1e-4);
        assert_eq!(state.rig.camera.pitch, 0.0);
    }

    #[test]
    fn press_over_hud_does_not_start_a_drag() {
        let mut state = AppState::new(SceneKind::Gallery, None, true);
        state.look_button(true, true);
        assert!(!state.rig.mouse.is_held());
    }

    #[test]
    fn focus_loss_releases_keys_and_button() {
        let mut state = AppState::new(SceneKind::Gallery, None, false);
        state.handle_key(KeyCode::KeyW, true);
        state.look_button(true, false);
        state.focus_lost();
        assert!(!state.rig.keys.any());
        assert!(!state.rig.mouse.is_held());
    }

    #[test]
    fn cli_parses_scene() {
        let cli = Cli::try_parse_from(["hellocube-desktop", "--scene", "orbit"]).unwrap();
        assert_eq!(cli.scene, SceneKind::Orbit);
        assert!(Cli::try_parse_from(["hellocube-desktop", "--scene", "teapot"]).is_err());
    }
}
