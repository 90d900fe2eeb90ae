use std::f32::consts::{PI, TAU};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::scroll::{SmoothScroll, DEFAULT_EASE, DEFAULT_SNAP};
use crate::sections::{Section, SectionLayout};
use crate::settings::{Parameter, Settings, UniformValues};
use crate::tween::{Animated, Easing};
use crate::viewport::Viewport;

/// Tunables for [`ScrollDriver`].
#[derive(Debug, Clone, PartialEq)]
pub struct DriverOptions {
    /// Fraction of the remaining scroll distance eased per frame.
    pub ease: f32,
    /// Distance below which the eased offset snaps to its goal.
    pub snap: f32,
    /// Mesh rotation around Y added every frame, in radians.
    pub spin: f32,
    /// Length of uniform and rotation tweens.
    pub tween: Duration,
    pub easing: Easing,
    /// Mesh scale applied while the viewport is taller than it is wide.
    pub portrait_scale: f32,
    /// Height of each section in viewport heights.
    pub section_height: f32,
    /// Let the cursor position drive the displacement uniforms.
    pub pointer: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            ease: DEFAULT_EASE,
            snap: DEFAULT_SNAP,
            spin: 0.01,
            tween: Duration::from_millis(500),
            easing: Easing::default(),
            portrait_scale: 0.75,
            section_height: 1.0,
            pointer: false,
        }
    }
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    /// Mesh rotation around X and Y, in radians.
    pub rotation: [f32; 2],
    pub scale: f32,
    pub uniforms: UniformValues,
    pub soft_offset: f32,
    pub normalized: f32,
    pub section: Option<Section>,
    /// True on the first frame a new section becomes active.
    pub section_changed: bool,
}

/// Couples the page scroll position to the mesh transform and shader uniforms.
pub struct ScrollDriver {
    options: DriverOptions,
    settings: Settings,
    layout: SectionLayout,
    scroll: SmoothScroll,
    offset: f32,
    rotation_x: Animated,
    rotation_y: f32,
    uniforms: Vec<Animated>,
    scale: f32,
    active_section: Option<usize>,
}

impl ScrollDriver {
    pub fn new(
        options: DriverOptions,
        settings: Settings,
        layout: SectionLayout,
        viewport: Viewport,
    ) -> Self {
        let initial = settings.initial_uniforms();
        let uniforms = Parameter::ALL
            .iter()
            .map(|parameter| Animated::new(initial.get(*parameter)))
            .collect();
        let scroll = SmoothScroll::new(viewport, options.ease, options.snap);
        let mut driver = Self {
            options,
            settings,
            layout,
            scroll,
            offset: 0.0,
            rotation_x: Animated::new(0.0),
            rotation_y: 0.0,
            uniforms,
            scale: 1.0,
            active_section: None,
        };
        driver.resize(viewport);
        driver
    }

    pub fn viewport(&self) -> Viewport {
        self.scroll.viewport()
    }

    /// Raw page offset, the equivalent of the document scroll position.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn limit(&self) -> f32 {
        self.scroll.state().limit
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let content_height = self.layout.content_height(viewport);
        self.scroll.on_resize(viewport, content_height);
        self.offset = self.offset.clamp(0.0, self.limit());
        self.scale = if viewport.is_portrait() {
            self.options.portrait_scale
        } else {
            1.0
        };
        debug!(
            width = viewport.width,
            height = viewport.height,
            aspect = viewport.aspect(),
            limit = self.limit(),
            scale = self.scale,
            "viewport resized"
        );
    }

    /// Moves the page to `offset`. Returns true when a scroll animation was
    /// scheduled for the next frame.
    pub fn scroll_to(&mut self, offset: f32) -> bool {
        if !offset.is_finite() {
            return false;
        }
        let clamped = offset.clamp(0.0, self.limit());
        if clamped == self.offset {
            return false;
        }
        self.offset = clamped;
        self.on_scroll()
    }

    pub fn scroll_by(&mut self, delta: f32) -> bool {
        self.scroll_to(self.offset + delta)
    }

    /// Scroll event hook: queues at most one scroll animation per frame.
    pub fn on_scroll(&mut self) -> bool {
        let scheduled = self.scroll.state_mut().request_animation();
        if scheduled {
            trace!(offset = self.offset, "scroll animation scheduled");
        }
        scheduled
    }

    pub fn animation_pending(&self) -> bool {
        self.scroll.state().running
    }

    /// Cursor hook for pointer mode; positions are in logical pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32, now: Instant) {
        if !self.options.pointer {
            return;
        }
        let viewport = self.viewport();
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return;
        }
        let horizontal = (x / viewport.width) * 4.0;
        let vertical = (y / viewport.height) * 2.0;
        debug!(horizontal, vertical, "pointer moved");
        self.tween_parameter(Parameter::Frequency, horizontal, now);
        self.tween_parameter(Parameter::Amplitude, horizontal, now);
        self.tween_parameter(Parameter::Density, vertical, now);
        self.tween_parameter(Parameter::Strength, vertical, now);
    }

    /// Advances one frame: spins the mesh, eases the scroll offset, runs any
    /// queued scroll animation and samples every tween.
    pub fn frame(&mut self, now: Instant) -> FrameState {
        self.rotation_y = (self.rotation_y + self.options.spin).rem_euclid(TAU);
        let soft_offset = self.scroll.update(self.offset);

        // The animation reads `hard`, so it runs after this frame's sample.
        if self.animation_pending() {
            self.update_scroll_animations(now);
        }

        let viewport = self.viewport();
        let section = self.layout.active(soft_offset, viewport).cloned();
        let index = section.as_ref().map(|section| section.index);
        let section_changed = index != self.active_section;
        self.active_section = index;

        let mut uniforms = UniformValues::zeroed();
        for (parameter, value) in Parameter::ALL.iter().zip(self.uniforms.iter_mut()) {
            uniforms.set(*parameter, value.advance(now));
        }

        FrameState {
            rotation: [self.rotation_x.advance(now), self.rotation_y],
            scale: self.scale,
            uniforms,
            soft_offset,
            normalized: self.scroll.state().normalized,
            section,
            section_changed,
        }
    }

    fn update_scroll_animations(&mut self, now: Instant) {
        let normalized = self.scroll.refresh_normalized();
        let duration = self.options.tween;
        let easing = self.options.easing;
        self.rotation_x
            .animate_to(normalized * PI, now, duration, easing);
        for (parameter, value) in self.settings.map(normalized) {
            self.tween_parameter(parameter, value, now);
        }
        self.scroll.state_mut().finish_animation();
        trace!(normalized, "scroll animation started");
    }

    fn tween_parameter(&mut self, parameter: Parameter, target: f32, now: Instant) {
        let duration = self.options.tween;
        let easing = self.options.easing;
        self.uniforms[parameter.index()].animate_to(target, now, duration, easing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> ScrollDriver {
        ScrollDriver::new(
            DriverOptions::default(),
            Settings::default(),
            SectionLayout::new(["Logma", "Naos", "Chara"], 1.0),
            Viewport::new(1280.0, 800.0),
        )
    }

    #[test]
    fn starts_at_initial_uniforms() {
        let mut driver = driver();
        let frame = driver.frame(Instant::now());
        assert_eq!(frame.uniforms, Settings::default().initial_uniforms());
        assert_eq!(frame.rotation[0], 0.0);
        assert_eq!(frame.section.unwrap().title, "Logma");
        assert!(frame.section_changed);
    }

    #[test]
    fn many_scroll_events_schedule_one_animation() {
        let mut driver = driver();
        assert!(driver.scroll_by(10.0));
        assert!(!driver.scroll_by(10.0));
        assert!(!driver.scroll_by(10.0));
        assert!(driver.animation_pending());

        driver.frame(Instant::now());
        assert!(!driver.animation_pending());
        assert!(driver.scroll_by(10.0));
    }

    #[test]
    fn unchanged_offset_fires_no_scroll() {
        let mut driver = driver();
        assert!(!driver.scroll_to(0.0));
        assert!(!driver.scroll_by(-50.0));
        assert!(!driver.animation_pending());
    }

    #[test]
    fn non_finite_scroll_targets_are_ignored() {
        let mut driver = driver();
        driver.scroll_to(300.0);
        assert!(!driver.scroll_to(f32::NAN));
        assert!(!driver.scroll_by(f32::NEG_INFINITY));
        assert_eq!(driver.offset(), 300.0);

        let frame = driver.frame(Instant::now());
        assert!(frame.soft_offset.is_finite());
        assert!(frame.normalized.is_finite());
    }

    #[test]
    fn uniforms_reach_end_values_at_bottom() {
        let mut driver = driver();
        let start = Instant::now();
        driver.scroll_to(driver.limit());
        driver.frame(start);

        let settled = driver.frame(start + Duration::from_secs(1));
        let settings = Settings::default();
        for (parameter, setting) in settings.iter() {
            assert_eq!(settled.uniforms.get(parameter), setting.end, "{parameter}");
        }
        assert_eq!(settled.normalized, 1.0);
        assert!((settled.rotation[0] - PI).abs() < 1e-6);
    }

    #[test]
    fn spin_advances_every_frame() {
        let mut driver = driver();
        let now = Instant::now();
        let first = driver.frame(now).rotation[1];
        let second = driver.frame(now).rotation[1];
        assert!((second - first - 0.01).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_limit_and_scale() {
        let mut driver = driver();
        driver.scroll_to(1600.0);
        assert_eq!(driver.limit(), 1600.0);

        driver.resize(Viewport::new(400.0, 600.0));
        assert_eq!(driver.limit(), 1200.0);
        assert_eq!(driver.offset(), 1200.0);
        assert_eq!(driver.scale(), 0.75);
        assert!((driver.viewport().aspect() - 400.0 / 600.0).abs() < 1e-6);

        driver.resize(Viewport::new(1000.0, 500.0));
        assert_eq!(driver.scale(), 1.0);
        assert_eq!(driver.limit(), 1000.0);
    }

    #[test]
    fn pointer_is_ignored_unless_enabled() {
        let mut driver = driver();
        let now = Instant::now();
        driver.pointer_moved(640.0, 400.0, now);
        let frame = driver.frame(now + Duration::from_secs(1));
        assert_eq!(frame.uniforms.get(Parameter::Frequency), 0.0);
    }

    #[test]
    fn pointer_drives_displacement_uniforms() {
        let mut driver = ScrollDriver::new(
            DriverOptions {
                pointer: true,
                ..DriverOptions::default()
            },
            Settings::default(),
            SectionLayout::new(["Logma"], 1.0),
            Viewport::new(1000.0, 500.0),
        );
        let now = Instant::now();
        driver.pointer_moved(500.0, 250.0, now);
        let frame = driver.frame(now + Duration::from_secs(1));
        assert_eq!(frame.uniforms.get(Parameter::Frequency), 2.0);
        assert_eq!(frame.uniforms.get(Parameter::Amplitude), 2.0);
        assert_eq!(frame.uniforms.get(Parameter::Density), 1.0);
        assert_eq!(frame.uniforms.get(Parameter::Strength), 1.0);
    }

    #[test]
    fn section_changes_once_when_crossing_boundary() {
        let mut driver = driver();
        let now = Instant::now();
        driver.frame(now);
        driver.scroll_to(800.0);
        let mut changes = 0;
        let mut last = None;
        for _ in 0..1_000 {
            let frame = driver.frame(now);
            if frame.section_changed {
                changes += 1;
            }
            last = frame.section;
        }
        assert_eq!(changes, 1);
        assert_eq!(last.unwrap().title, "Naos");
    }
}
