use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use scrollfx::{ScrollDriver, SectionLayout, Viewport};
use tracing::{debug, error, info, warn};
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::types::RendererConfig;

/// Logical pixels moved by one arrow-key press.
const ARROW_STEP: f32 = 40.0;
/// Share of the viewport height moved by Page Up/Down and Space.
const PAGE_FRACTION: f32 = 0.875;

#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    ScrollBy(f32),
    Top,
    Bottom,
    Exit,
}

fn key_action(key: &Key, shift: bool, viewport_height: f32) -> Option<KeyAction> {
    let page = viewport_height * PAGE_FRACTION;
    match key {
        Key::Named(NamedKey::ArrowDown) => Some(KeyAction::ScrollBy(ARROW_STEP)),
        Key::Named(NamedKey::ArrowUp) => Some(KeyAction::ScrollBy(-ARROW_STEP)),
        Key::Named(NamedKey::PageDown) => Some(KeyAction::ScrollBy(page)),
        Key::Named(NamedKey::PageUp) => Some(KeyAction::ScrollBy(-page)),
        Key::Named(NamedKey::Space) if shift => Some(KeyAction::ScrollBy(-page)),
        Key::Named(NamedKey::Space) => Some(KeyAction::ScrollBy(page)),
        Key::Named(NamedKey::Home) => Some(KeyAction::Top),
        Key::Named(NamedKey::End) => Some(KeyAction::Bottom),
        Key::Named(NamedKey::Escape) => Some(KeyAction::Exit),
        _ => None,
    }
}

/// Converts a wheel event into a page offset delta in logical pixels.
/// Positive values move down the page.
fn wheel_offset(delta: MouseScrollDelta, wheel_line: f32, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -lines * wheel_line,
        MouseScrollDelta::PixelDelta(position) => {
            -(position.to_logical::<f64>(scale_factor).y as f32)
        }
    }
}

fn viewport_for(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical = size.to_logical::<f32>(scale_factor);
    Viewport::new(logical.width, logical.height)
}

/// Window, GPU resources and scroll state for one running page.
///
/// `gpu` is declared before `window` so the surface is dropped first.
struct WindowState {
    gpu: GpuState,
    window: Arc<Window>,
    driver: ScrollDriver,
    title: String,
    wheel_line: f32,
    scale_factor: f64,
    shift: bool,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let scale_factor = window.scale_factor();
        let viewport = viewport_for(size, scale_factor);
        let gpu = GpuState::new(window.as_ref(), size, viewport.aspect(), config)?;
        let profile = gpu.adapter_profile();
        if profile.is_software() {
            warn!(
                adapter = %profile.name,
                backend = ?profile.backend,
                "software rasterizer detected; consider lowering mesh.detail"
            );
        }

        let layout = SectionLayout::new(
            config.sections.iter().cloned(),
            config.driver.section_height,
        );
        let driver = ScrollDriver::new(
            config.driver.clone(),
            config.settings.clone(),
            layout,
            viewport,
        );
        info!(
            width = viewport.width,
            height = viewport.height,
            scale_factor,
            sections = config.sections.len(),
            limit = driver.limit(),
            "scroll page ready"
        );

        Ok(Self {
            gpu,
            window,
            driver,
            title: config.title.clone(),
            wheel_line: config.wheel_line,
            scale_factor,
            shift: false,
        })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            debug!("ignoring zero-sized resize");
            return;
        }
        let viewport = viewport_for(new_size, self.scale_factor);
        self.driver.resize(viewport);
        self.gpu.resize(new_size, viewport.aspect());
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta) {
        let offset = wheel_offset(delta, self.wheel_line, self.scale_factor);
        if offset != 0.0 {
            self.driver.scroll_by(offset);
        }
    }

    /// Returns true when the key asks the window to close.
    fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if event.state != ElementState::Pressed {
            return false;
        }
        let height = self.driver.viewport().height;
        match key_action(&event.logical_key, self.shift, height) {
            Some(KeyAction::ScrollBy(delta)) => {
                self.driver.scroll_by(delta);
            }
            Some(KeyAction::Top) => {
                self.driver.scroll_to(0.0);
            }
            Some(KeyAction::Bottom) => {
                let limit = self.driver.limit();
                self.driver.scroll_to(limit);
            }
            Some(KeyAction::Exit) => return !event.repeat,
            None => {}
        }
        false
    }

    fn handle_cursor(&mut self, position: PhysicalPosition<f64>) {
        let logical = position.to_logical::<f32>(self.scale_factor);
        self.driver
            .pointer_moved(logical.x, logical.y, Instant::now());
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.driver.frame(Instant::now());
        if frame.section_changed {
            if let Some(section) = frame.section.as_ref() {
                info!(index = section.index + 1, title = %section.title, "section entered");
                self.window
                    .set_title(&format!("{} · {}", self.title, section.label()));
            }
        }
        self.gpu.render(&frame)
    }
}

pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(width as f64, height as f64))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, config)
        .context("failed to initialise window renderer")?;
    state.window().request_redraw();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    info!("window close requested");
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => state.resize(new_size),
                WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                    state.scale_factor = scale_factor;
                    let size = state.window().inner_size();
                    state.resize(size);
                }
                WindowEvent::ModifiersChanged(modifiers) => {
                    state.shift = modifiers.state().shift_key();
                }
                WindowEvent::MouseWheel { delta, .. } => state.handle_wheel(delta),
                WindowEvent::KeyboardInput { event, .. } => {
                    if state.handle_key(&event) {
                        info!("escape pressed; closing window");
                        elwt.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => state.handle_cursor(position),
                WindowEvent::RedrawRequested => match state.render_frame() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        debug!("surface lost or outdated; reconfiguring");
                        let size = state.window().inner_size();
                        if size == state.gpu.size() {
                            state.gpu.recover_surface();
                        } else {
                            state.resize(size);
                        }
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("surface out of memory; exiting");
                        elwt.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        warn!("surface timeout; retrying next frame");
                    }
                    Err(other) => {
                        warn!(error = ?other, "surface error; retrying next frame");
                    }
                },
                _ => {}
            }
        }
        Event::AboutToWait => {
            state.window().request_redraw();
            elwt.set_control_flow(ControlFlow::Wait);
        }
        Event::LoopExiting => {
            info!("tearing down renderer");
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_pages_scroll_by_fixed_steps() {
        let down = key_action(&Key::Named(NamedKey::ArrowDown), false, 800.0);
        assert_eq!(down, Some(KeyAction::ScrollBy(40.0)));
        let up = key_action(&Key::Named(NamedKey::ArrowUp), false, 800.0);
        assert_eq!(up, Some(KeyAction::ScrollBy(-40.0)));
        let page = key_action(&Key::Named(NamedKey::PageDown), false, 800.0);
        assert_eq!(page, Some(KeyAction::ScrollBy(700.0)));
    }

    #[test]
    fn shift_space_scrolls_up() {
        let forward = key_action(&Key::Named(NamedKey::Space), false, 400.0);
        let back = key_action(&Key::Named(NamedKey::Space), true, 400.0);
        assert_eq!(forward, Some(KeyAction::ScrollBy(350.0)));
        assert_eq!(back, Some(KeyAction::ScrollBy(-350.0)));
    }

    #[test]
    fn navigation_and_exit_keys() {
        assert_eq!(
            key_action(&Key::Named(NamedKey::Home), false, 800.0),
            Some(KeyAction::Top)
        );
        assert_eq!(
            key_action(&Key::Named(NamedKey::End), false, 800.0),
            Some(KeyAction::Bottom)
        );
        assert_eq!(
            key_action(&Key::Named(NamedKey::Escape), false, 800.0),
            Some(KeyAction::Exit)
        );
        assert_eq!(key_action(&Key::Character("a".into()), false, 800.0), None);
    }

    #[test]
    fn wheel_lines_and_pixels_map_to_offsets() {
        let lines = wheel_offset(MouseScrollDelta::LineDelta(0.0, -2.0), 100.0, 1.0);
        assert_eq!(lines, 200.0);
        let pixels = wheel_offset(
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 60.0)),
            100.0,
            2.0,
        );
        assert_eq!(pixels, -30.0);
    }

    #[test]
    fn viewport_uses_logical_size() {
        let viewport = viewport_for(PhysicalSize::new(2560, 1600), 2.0);
        assert_eq!(viewport.width, 1280.0);
        assert_eq!(viewport.height, 800.0);
    }
}
