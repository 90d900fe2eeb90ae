//! GPU side of the renderer.
//!
//! - `context` owns the wgpu instance, adapter, device and surface, and
//!   reconfigures the swapchain when the window resizes.
//! - `pipeline` compiles the GLSL stages into a line-list pipeline with
//!   additive blending.
//! - `uniforms` mirrors the `SceneParams` block written every frame.
//! - `state` glues everything together and exposes the `GpuState` API used by
//!   `window`.

mod context;
mod pipeline;
mod state;
pub(crate) mod uniforms;

pub(crate) use state::GpuState;
