//! Renderer crate for wirescroll.
//!
//! The crate glues the winit window, the `wgpu` line-list pipeline and the
//! scroll choreography from `scrollfx` together. The overall flow is:
//!
//! ```text
//!   CLI / sceneconfig
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!                          │                                   │
//!          wheel / keys ───┴─▶ ScrollDriver::scroll_by         ├─▶ ScrollDriver::frame
//!                                                              └─▶ GpuState::render ─▶ UBO
//! ```
//!
//! `WindowState` owns all GPU resources (surface, device, pipeline, mesh
//! buffers, uniforms) together with the scroll driver, while `Renderer` is the
//! thin entry point handed a fully resolved [`RendererConfig`]. The icosphere
//! is displaced in a GLSL vertex shader compiled through naga, and coloured
//! with a cosine palette blended additively.

mod camera;
mod compile;
mod gpu;
mod mesh;
mod types;
mod window;

use anyhow::Result;

pub use types::{
    AdapterProfile, Antialiasing, CameraOptions, GpuPowerPreference, MeshOptions, RendererConfig,
};

/// Entry point that owns the configuration for one page session.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks until it is closed.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            antialiasing = ?self.config.antialiasing,
            gpu_power = ?self.config.gpu_power,
            detail = self.config.mesh.detail,
            "starting renderer"
        );
        window::run(&self.config)
    }
}
