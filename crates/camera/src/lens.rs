use glam::Mat4;

/// Perspective projection parameters. Field of view is vertical, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 10.0,
        }
    }
}

impl Lens {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn near_and_far_planes_map_to_depth_range() {
        let proj = Lens::default().projection_matrix();
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -10.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
