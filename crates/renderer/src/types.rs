use scrollfx::{DriverOptions, Settings};

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Adapter selection hint forwarded to `wgpu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    #[default]
    Low,
    High,
}

/// What we learned about the adapter `wgpu` handed us.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    pub fn is_software(&self) -> bool {
        matches!(self.device_type, wgpu::DeviceType::Cpu)
    }
}

/// Icosphere tessellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshOptions {
    pub radius: f32,
    /// Number of extra subdivisions along each icosahedron edge.
    pub detail: u32,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 64,
        }
    }
}

/// Perspective camera placed on the +Z axis looking at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptions {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 10.0,
            distance: 2.5,
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the CLI flags and scene file: window size, GPU
/// preferences, the mesh and camera, and everything the scroll driver needs.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in logical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    pub antialiasing: Antialiasing,
    pub gpu_power: GpuPowerPreference,
    pub mesh: MeshOptions,
    pub camera: CameraOptions,
    pub driver: DriverOptions,
    pub settings: Settings,
    /// Section titles, top to bottom.
    pub sections: Vec<String>,
    /// Logical pixels scrolled per mouse-wheel line.
    pub wheel_line: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 800),
            title: "wirescroll".to_string(),
            antialiasing: Antialiasing::default(),
            gpu_power: GpuPowerPreference::default(),
            mesh: MeshOptions::default(),
            camera: CameraOptions::default(),
            driver: DriverOptions::default(),
            settings: Settings::default(),
            sections: vec!["Logma".into(), "Naos".into(), "Chara".into()],
            wheel_line: 100.0,
        }
    }
}
