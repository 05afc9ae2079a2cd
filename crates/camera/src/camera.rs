use glam::{Mat4, Vec2, Vec3};
use hellocube_input::MoveKeys;

/// Units per second a held movement key moves the camera.
pub const BASE_SPEED: f32 = 2.5;
/// Degrees of yaw/pitch per pixel of cursor motion.
pub const SENSITIVITY: f32 = 0.1;

/// Look direction for the given yaw and pitch, both in degrees.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

/// First-person camera with yaw/pitch mouse look and WASD translation.
///
/// Angles are kept in degrees. `front` is cached and only changes when a look
/// delta is applied, so the initial `(0, 0, -1)` is exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeLookCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    /// Symmetric pitch bound in degrees. `None` leaves pitch unbounded.
    pub pitch_limit: Option<f32>,
}

impl Default for FreeLookCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            speed: BASE_SPEED,
            sensitivity: SENSITIVITY,
            pitch_limit: None,
        }
    }
}

impl FreeLookCamera {
    pub fn with_pitch_limit(mut self, limit: Option<f32>) -> Self {
        self.pitch_limit = limit.map(f32::abs);
        self
    }

    /// Unit vector perpendicular to both `front` and `up`.
    pub fn strafe(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Apply a raw cursor delta (pixels, Y up) to yaw and pitch and rebuild `front`.
    pub fn look(&mut self, delta: Vec2) {
        let offset = delta * self.sensitivity;
        self.yaw += offset.x;
        self.pitch += offset.y;
        if let Some(limit) = self.pitch_limit {
            self.pitch = self.pitch.clamp(-limit, limit);
        }
        self.front = front_from_angles(self.yaw, self.pitch);
    }

    /// Move along `front` and the strafe vector for every held key.
    ///
    /// Left adds the strafe vector and right subtracts it; since
    /// `front x up` points to the camera's right, "left" moves right.
    pub fn translate(&mut self, keys: &MoveKeys, dt: f32) {
        let step = self.speed * dt;
        if keys.forward {
            self.position += self.front * step;
        }
        if keys.back {
            self.position -= self.front * step;
        }
        if keys.left {
            self.position += self.strafe() * step;
        }
        if keys.right {
            self.position -= self.strafe() * step;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }
}
