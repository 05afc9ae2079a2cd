use crate::camera::FreeLookCamera;
use glam::Vec2;
use hellocube_input::{FrameClock, InputEvent, MouseLook, MoveKeys};

/// Camera plus the input state that drives it, owned by the render loop.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: FreeLookCamera,
    pub mouse: MouseLook,
    pub keys: MoveKeys,
    pub clock: FrameClock,
}

impl CameraRig {
    pub fn new(camera: FreeLookCamera, start: f64) -> Self {
        Self {
            camera,
            mouse: MouseLook::new(),
            keys: MoveKeys::new(),
            clock: FrameClock::new(start),
        }
    }

    /// Advance the frame clock to `now` and apply held keys. Returns the frame delta.
    pub fn frame(&mut self, now: f64) -> f32 {
        let dt = self.clock.tick(now);
        self.camera.translate(&self.keys, dt);
        dt
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Tick { now } => {
                self.frame(now);
            }
            InputEvent::Button { pressed } => self.mouse.set_button(pressed),
            InputEvent::Cursor { x, y } => {
                if let Some(delta) = self.mouse.cursor_moved(Vec2::new(x, y)) {
                    self.camera.look(delta);
                    tracing::trace!(
                        yaw = self.camera.yaw,
                        pitch = self.camera.pitch,
                        "camera look"
                    );
                }
            }
            InputEvent::Key { key, pressed } => self.keys.set(key, pressed),
        }
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(FreeLookCamera::default(), 0.0)
    }
}
