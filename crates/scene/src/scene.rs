use crate::mesh::{Vertex, cube_vertices};
use crate::plan::{DrawCall, FramePlan, Lighting, PipelineKind, TextureSlot};
use glam::{Mat4, Vec3};
use hellocube_camera::{FreeLookCamera, Lens};
use std::fmt;
use std::str::FromStr;

/// Fixed cube placements for the gallery scene.
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.0),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Radians of Y rotation added per gallery placement index.
pub const PLACEMENT_ROTATION_STEP: f32 = 20.0;

/// Uniform scale of the light marker cube.
pub const MARKER_SCALE: f32 = 0.2;

/// Fixed eye for the scenes that don't use the free-look camera.
const FIXED_EYE: Vec3 = Vec3::new(3.0, 3.0, 3.0);

const WHITE: [f64; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

/// Model matrix for gallery placement `index`: rotate about Y, after translating.
pub fn placement_model(index: usize, offset: Vec3) -> Mat4 {
    Mat4::from_rotation_y(index as f32 * PLACEMENT_ROTATION_STEP) * Mat4::from_translation(offset)
}

/// Light position at `time` seconds on its elliptical orbit around the lit cube.
pub fn light_orbit(time: f64) -> Vec3 {
    Vec3::new(
        (2.0 * time.sin()) as f32,
        -0.25,
        (1.5 * time.cos()) as f32,
    )
}

/// The three demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneKind {
    /// Ten textured cubes viewed through the free-look camera.
    #[default]
    Gallery,
    /// Phong-lit cube with an orbiting light marker.
    Phong,
    /// Spinning textured cube carrying a marker cube.
    Orbit,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [SceneKind::Gallery, SceneKind::Phong, SceneKind::Orbit];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Gallery => "gallery",
            SceneKind::Phong => "phong",
            SceneKind::Orbit => "orbit",
        }
    }

    /// Whether mouse look and movement keys affect the view.
    pub fn uses_free_camera(self) -> bool {
        matches!(self, SceneKind::Gallery)
    }

    /// Textures that must be loaded before the scene can render.
    pub fn textures(self) -> &'static [TextureSlot] {
        match self {
            SceneKind::Gallery => &[TextureSlot::Primary],
            SceneKind::Phong => &[TextureSlot::Secondary],
            SceneKind::Orbit => &[TextureSlot::Primary, TextureSlot::Secondary],
        }
    }

    /// Cube geometry used by every draw in this scene.
    pub fn mesh(self) -> Vec<Vertex> {
        match self {
            SceneKind::Gallery => cube_vertices(0.5, 0.5),
            SceneKind::Phong => cube_vertices(0.5, 1.0),
            SceneKind::Orbit => cube_vertices(1.0, 1.0),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scene {0:?} (expected gallery, phong or orbit)")]
pub struct UnknownScene(pub String);

impl FromStr for SceneKind {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScene(s.to_string()))
    }
}

/// A running scene: its kind plus whatever it accumulates between frames.
#[derive(Debug, Clone)]
pub struct Scene {
    kind: SceneKind,
    lens: Lens,
    spin: f32,
}

impl Scene {
    pub fn new(kind: SceneKind) -> Self {
        tracing::debug!("scene {kind} created");
        Self {
            kind,
            lens: Lens::default(),
            spin: 0.0,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    /// Accumulated spin angle of the orbit scene, in radians.
    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// Build the plan for one frame. `time` is seconds since start, `dt` the
    /// frame delta. The camera is only consulted by free-look scenes.
    pub fn plan(&mut self, camera: &FreeLookCamera, time: f64, dt: f32) -> FramePlan {
        let projection = self.lens.projection_matrix();
        let fixed_view = Mat4::look_at_rh(FIXED_EYE, Vec3::ZERO, Vec3::Y);

        match self.kind {
            SceneKind::Gallery => FramePlan {
                clear_color: WHITE,
                view: camera.view_matrix(),
                projection,
                lighting: Lighting::default(),
                draws: CUBE_POSITIONS
                    .iter()
                    .enumerate()
                    .map(|(i, offset)| DrawCall {
                        pipeline: PipelineKind::Textured,
                        texture: Some(TextureSlot::Primary),
                        model: placement_model(i, *offset),
                    })
                    .collect(),
            },
            SceneKind::Phong => {
                let light = light_orbit(time);
                FramePlan {
                    clear_color: BLACK,
                    view: fixed_view,
                    projection,
                    lighting: Lighting {
                        light_pos: light,
                        view_pos: FIXED_EYE,
                        ..Lighting::default()
                    },
                    draws: vec![
                        DrawCall {
                            pipeline: PipelineKind::Phong,
                            texture: None,
                            model: Mat4::IDENTITY,
                        },
                        DrawCall {
                            pipeline: PipelineKind::Textured,
                            texture: Some(TextureSlot::Secondary),
                            model: Mat4::from_translation(light)
                                * Mat4::from_scale(Vec3::splat(MARKER_SCALE)),
                        },
                    ],
                }
            }
            SceneKind::Orbit => {
                self.spin += dt;
                let model = Mat4::from_rotation_y(self.spin);
                FramePlan {
                    clear_color: BLACK,
                    view: fixed_view,
                    projection,
                    lighting: Lighting::default(),
                    draws: vec![
                        DrawCall {
                            pipeline: PipelineKind::Textured,
                            texture: Some(TextureSlot::Primary),
                            model,
                        },
                        DrawCall {
                            pipeline: PipelineKind::Textured,
                            texture: Some(TextureSlot::Secondary),
                            model: model
                                * Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0))
                                * Mat4::from_scale(Vec3::splat(MARKER_SCALE)),
                        },
                    ],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn scene_names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), kind);
        }
        assert_eq!("PHONG".parse::<SceneKind>().unwrap(), SceneKind::Phong);
        assert!("teapot".parse::<SceneKind>().is_err());
    }

    #[test]
    fn gallery_draws_every_placement() {
        let mut scene = Scene::new(SceneKind::Gallery);
        let plan = scene.plan(&FreeLookCamera::default(), 0.0, 0.016);
        assert_eq!(plan.draws.len(), CUBE_POSITIONS.len());
        assert_eq!(plan.clear_color, WHITE);
        assert!(plan.draws.iter().all(|d| d.pipeline == PipelineKind::Textured
            && d.texture == Some(TextureSlot::Primary)));
        // Index 0 has no rotation and sits at the origin.
        assert_eq!(plan.draws[0].model, Mat4::IDENTITY);
    }

    #[test]
    fn placement_rotates_after_translating() {
        let m = placement_model(1, Vec3::new(1.0, 0.0, 0.0));
        let p = m.transform_point3(Vec3::ZERO);
        let expected = Mat4::from_rotation_y(20.0).transform_point3(Vec3::X);
        assert!(approx(p, expected));
        // Rotation about Y keeps the distance from the Y axis.
        assert!((Vec3::new(p.x, 0.0, p.z).length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn gallery_view_follows_camera() {
        let mut scene = Scene::new(SceneKind::Gallery);
        let mut cam = FreeLookCamera::default();
        cam.position = Vec3::new(1.0, 2.0, 3.0);
        let plan = scene.plan(&cam, 0.0, 0.0);
        assert_eq!(plan.view, cam.view_matrix());
    }

    #[test]
    fn phong_marker_tracks_light() {
        let mut scene = Scene::new(SceneKind::Phong);
        let t = 1.3;
        let plan = scene.plan(&FreeLookCamera::default(), t, 0.0);
        let light = light_orbit(t);
        assert_eq!(plan.lighting.light_pos, light);
        assert_eq!(plan.lighting.view_pos, FIXED_EYE);
        assert_eq!(plan.draws.len(), 2);
        assert_eq!(plan.draws[0].pipeline, PipelineKind::Phong);
        assert_eq!(plan.draws[0].texture, None);
        let marker = plan.draws[1];
        assert_eq!(marker.texture, Some(TextureSlot::Secondary));
        assert!(approx(marker.model.transform_point3(Vec3::ZERO), light));
        assert!(approx(
            marker.model.transform_vector3(Vec3::X),
            Vec3::new(MARKER_SCALE, 0.0, 0.0)
        ));
    }

    #[test]
    fn light_orbit_is_an_ellipse() {
        assert!(approx(light_orbit(0.0), Vec3::new(0.0, -0.25, 1.5)));
        let quarter = light_orbit(std::f64::consts::FRAC_PI_2);
        assert!(approx(quarter, Vec3::new(2.0, -0.25, 0.0)));
    }

    #[test]
    fn phong_ignores_free_camera() {
        let mut scene = Scene::new(SceneKind::Phong);
        let mut cam = FreeLookCamera::default();
        let a = scene.plan(&cam, 0.5, 0.0);
        cam.position = Vec3::new(9.0, 9.0, 9.0);
        let b = scene.plan(&cam, 0.5, 0.0);
        assert_eq!(a.view, b.view);
    }

    #[test]
    fn orbit_spin_accumulates() {
        let mut scene = Scene::new(SceneKind::Orbit);
        let cam = FreeLookCamera::default();
        scene.plan(&cam, 0.0, 0.25);
        let plan = scene.plan(&cam, 0.0, 0.5);
        assert!((scene.spin() - 0.75).abs() < 1e-6);
        assert_eq!(plan.draws[0].model, Mat4::from_rotation_y(0.75));
    }

    #[test]
    fn orbit_marker_rides_the_cube() {
        let mut scene = Scene::new(SceneKind::Orbit);
        let cam = FreeLookCamera::default();
        let plan = scene.plan(&cam, 0.0, std::f32::consts::FRAC_PI_2);
        let marker = plan.draws[1].model.transform_point3(Vec3::ZERO);
        // A quarter turn about Y carries (0, 0, -3) to (-3, 0, 0).
        assert!(approx(marker, Vec3::new(-3.0, 0.0, 0.0)));
    }

    #[test]
    fn scene_textures_cover_draws() {
        let cam = FreeLookCamera::default();
        for kind in SceneKind::ALL {
            let mut scene = Scene::new(kind);
            let plan = scene.plan(&cam, 0.0, 0.0);
            for draw in &plan.draws {
                if let Some(slot) = draw.texture {
                    assert!(kind.textures().contains(&slot), "{kind} misses {slot:?}");
                }
            }
        }
    }

    #[test]
    fn only_gallery_uses_free_camera() {
        assert!(SceneKind::Gallery.uses_free_camera());
        assert!(!SceneKind::Phong.uses_free_camera());
        assert!(!SceneKind::Orbit.uses_free_camera());
    }
}
