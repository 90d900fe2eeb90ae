use glam::{Mat4, Vec3};

use crate::types::CameraOptions;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PerspectiveCamera {
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    eye: Vec3,
}

impl PerspectiveCamera {
    pub fn new(options: CameraOptions, aspect: f32) -> Self {
        Self {
            fov_y: options.fov_degrees.to_radians(),
            aspect: sanitize_aspect(aspect),
            near: options.near,
            far: options.far,
            eye: Vec3::new(0.0, 0.0, options.distance),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y)
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

/// Mesh transform: uniform scale, then rotation about Y, then about X.
pub(crate) fn model_matrix(scale: f32, rotation: [f32; 2]) -> Mat4 {
    Mat4::from_rotation_x(rotation[0])
        * Mat4::from_rotation_y(rotation[1])
        * Mat4::from_scale(Vec3::splat(scale))
}
