//! Scroll choreography for the wirescroll page.
//!
//! Nothing in this crate touches the GPU. The window layer feeds it page
//! offsets, cursor positions and viewport sizes; it hands back a
//! [`FrameState`] per frame describing the mesh transform and the values of
//! the six scroll-driven shader uniforms.
//!
//! ```text
//!   wheel / keys ──▶ ScrollDriver::scroll_to ──▶ running flag (one per frame)
//!                                                     │
//!   redraw ──▶ ScrollDriver::frame ──▶ scroll animations ─▶ tweens
//!                       │
//!                       └─▶ SmoothScroll::update (hard → soft)
//! ```

mod driver;
mod scroll;
mod sections;
mod settings;
mod tween;
mod viewport;

pub use driver::{DriverOptions, FrameState, ScrollDriver};
pub use scroll::{ScrollState, SmoothScroll, DEFAULT_EASE, DEFAULT_SNAP};
pub use sections::{Section, SectionLayout};
pub use settings::{Parameter, ParameterError, Setting, Settings, UniformValues};
pub use tween::{Animated, Easing, UnknownEasing};
pub use viewport::Viewport;
