use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use scrollfx::{Parameter, UniformValues};

use crate::camera::{model_matrix, PerspectiveCamera};

/// CPU mirror of the `SceneParams` block declared in `compile.rs`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct SceneUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub frequency: f32,
    pub amplitude: f32,
    pub density: f32,
    pub strength: f32,
    pub deep_purple: f32,
    pub opacity: f32,
    pub _padding: [f32; 2],
}

impl SceneUniforms {
    pub fn new(camera: &PerspectiveCamera, parameters: &UniformValues) -> Self {
        let mut uniforms = Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            ..Self::zeroed()
        };
        uniforms.set_camera(camera);
        uniforms.set_parameters(parameters);
        uniforms
    }

    pub fn set_camera(&mut self, camera: &PerspectiveCamera) {
        self.projection = camera.projection().to_cols_array_2d();
        self.view = camera.view().to_cols_array_2d();
    }

    pub fn set_model(&mut self, scale: f32, rotation: [f32; 2]) {
        self.model = model_matrix(scale, rotation).to_cols_array_2d();
    }

    pub fn set_parameters(&mut self, parameters: &UniformValues) {
        for (parameter, value) in parameters.iter() {
            let slot = match parameter {
                Parameter::Frequency => &mut self.frequency,
                Parameter::Amplitude => &mut self.amplitude,
                Parameter::Density => &mut self.density,
                Parameter::Strength => &mut self.strength,
                Parameter::DeepPurple => &mut self.deep_purple,
                Parameter::Opacity => &mut self.opacity,
            };
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CameraOptions;
    use scrollfx::Settings;
    use std::mem::{offset_of, size_of};

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(offset_of!(SceneUniforms, projection), 0);
        assert_eq!(offset_of!(SceneUniforms, view), 64);
        assert_eq!(offset_of!(SceneUniforms, model), 128);
        assert_eq!(offset_of!(SceneUniforms, frequency), 192);
        assert_eq!(offset_of!(SceneUniforms, amplitude), 196);
        assert_eq!(offset_of!(SceneUniforms, density), 200);
        assert_eq!(offset_of!(SceneUniforms, strength), 204);
        assert_eq!(offset_of!(SceneUniforms, deep_purple), 208);
        assert_eq!(offset_of!(SceneUniforms, opacity), 212);
        assert_eq!(offset_of!(SceneUniforms, _padding), 216);
        assert_eq!(size_of::<SceneUniforms>(), 224);
        assert_eq!(size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn parameters_land_in_their_slots() {
        let camera = PerspectiveCamera::new(CameraOptions::default(), 1.6);
        let initial = Settings::default().initial_uniforms();
        let uniforms = SceneUniforms::new(&camera, &initial);
        assert_eq!(uniforms.frequency, initial.get(Parameter::Frequency));
        assert_eq!(uniforms.amplitude, initial.get(Parameter::Amplitude));
        assert_eq!(uniforms.density, initial.get(Parameter::Density));
        assert_eq!(uniforms.strength, initial.get(Parameter::Strength));
        assert_eq!(uniforms.deep_purple, initial.get(Parameter::DeepPurple));
        assert_eq!(uniforms.opacity, initial.get(Parameter::Opacity));
    }
}
