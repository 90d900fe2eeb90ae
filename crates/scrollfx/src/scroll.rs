use crate::viewport::Viewport;

pub const DEFAULT_EASE: f32 = 0.05;
pub const DEFAULT_SNAP: f32 = 0.01;

/// Page scroll bookkeeping shared between the scroll handler and the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    /// Raw page offset, clamped to `[0, limit]`.
    pub hard: f32,
    /// Eased offset chasing `hard`.
    pub soft: f32,
    /// Fraction of the remaining distance covered per update.
    pub ease: f32,
    /// Total content height.
    pub height: f32,
    /// Maximum scrollable distance (content height minus viewport height).
    pub limit: f32,
    /// `hard / limit`, captured when a scroll animation runs.
    pub normalized: f32,
    /// Set while a scroll animation is queued for the next frame.
    pub running: bool,
}

impl ScrollState {
    pub fn new(ease: f32) -> Self {
        Self {
            ease,
            ..Self::default()
        }
    }

    /// Marks a scroll animation as in flight. Returns `false` when one is
    /// already queued, in which case the caller must not schedule another.
    pub fn request_animation(&mut self) -> bool {
        if self.running {
            false
        } else {
            self.running = true;
            true
        }
    }

    pub fn finish_animation(&mut self) {
        self.running = false;
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            hard: 0.0,
            soft: 0.0,
            ease: DEFAULT_EASE,
            height: 0.0,
            limit: 0.0,
            normalized: 0.0,
            running: false,
        }
    }
}

/// Samples the page offset every frame and eases toward it.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    viewport: Viewport,
    state: ScrollState,
    snap: f32,
}

impl SmoothScroll {
    pub fn new(viewport: Viewport, ease: f32, snap: f32) -> Self {
        Self {
            viewport,
            state: ScrollState::new(ease.clamp(f32::EPSILON, 1.0)),
            snap: snap.max(0.0),
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ScrollState {
        &mut self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_sizes(&mut self, content_height: f32) {
        self.state.height = content_height.max(0.0);
        self.state.limit = (self.state.height - self.viewport.height).max(0.0);
    }

    pub fn on_resize(&mut self, viewport: Viewport, content_height: f32) {
        self.viewport = viewport;
        self.set_sizes(content_height);
    }

    /// Clamps `raw_offset` into the scrollable range and advances the eased
    /// offset one step toward it. Returns the new eased offset.
    /// Non-finite offsets keep the previous goal.
    pub fn update(&mut self, raw_offset: f32) -> f32 {
        let state = &mut self.state;
        if raw_offset.is_finite() {
            state.hard = raw_offset.clamp(0.0, state.limit);
        }
        state.soft += (state.hard - state.soft) * state.ease;

        if (state.hard - state.soft).abs() < self.snap {
            state.soft = state.hard;
        }
        if state.soft < self.snap && state.hard < self.snap {
            state.soft = 0.0;
        }
        state.soft
    }

    /// Position of `hard` within the scrollable range, always in `[0, 1]`.
    pub fn normalized(&self) -> f32 {
        if self.state.limit > 0.0 {
            (self.state.hard / self.state.limit).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Recomputes and stores [`ScrollState::normalized`].
    pub fn refresh_normalized(&mut self) -> f32 {
        let normalized = self.normalized();
        self.state.normalized = normalized;
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroller() -> SmoothScroll {
        let viewport = Viewport::new(1280.0, 800.0);
        let mut scroll = SmoothScroll::new(viewport, DEFAULT_EASE, DEFAULT_SNAP);
        scroll.set_sizes(2400.0);
        scroll
    }

    #[test]
    fn limit_excludes_visible_viewport() {
        let scroll = scroller();
        assert_eq!(scroll.state().height, 2400.0);
        assert_eq!(scroll.state().limit, 1600.0);
    }

    #[test]
    fn short_content_has_zero_limit() {
        let mut scroll = scroller();
        scroll.set_sizes(300.0);
        assert_eq!(scroll.state().limit, 0.0);
        scroll.update(50.0);
        assert_eq!(scroll.state().hard, 0.0);
        assert_eq!(scroll.normalized(), 0.0);
    }

    #[test]
    fn hard_offset_is_clamped() {
        let mut scroll = scroller();
        scroll.update(-40.0);
        assert_eq!(scroll.state().hard, 0.0);
        scroll.update(9000.0);
        assert_eq!(scroll.state().hard, 1600.0);
    }

    #[test]
    fn easing_converges_monotonically_and_settles() {
        let mut scroll = scroller();
        let mut previous = scroll.state().soft;
        let mut settled_after = None;
        for step in 0..2_000 {
            let soft = scroll.update(1200.0);
            assert!(soft >= previous, "soft regressed at step {step}");
            assert!(soft <= 1200.0);
            previous = soft;
            if soft == 1200.0 {
                settled_after = Some(step);
                break;
            }
        }
        assert!(settled_after.is_some(), "soft never reached hard");

        let settled = *scroll.state();
        for _ in 0..10 {
            scroll.update(1200.0);
        }
        assert_eq!(*scroll.state(), settled);
    }

    #[test]
    fn easing_back_to_top_snaps_to_zero() {
        let mut scroll = scroller();
        for _ in 0..500 {
            scroll.update(800.0);
        }
        let mut previous = scroll.state().soft;
        for _ in 0..2_000 {
            let soft = scroll.update(0.0);
            assert!(soft <= previous);
            previous = soft;
        }
        assert_eq!(scroll.state().soft, 0.0);
    }

    #[test]
    fn normalized_stays_in_unit_range() {
        let mut scroll = scroller();
        let limit = scroll.state().limit;
        for step in 0..=32 {
            let raw = limit * step as f32 / 32.0;
            scroll.update(raw);
            let normalized = scroll.normalized();
            assert!((0.0..=1.0).contains(&normalized));
        }
        scroll.update(limit);
        assert_eq!(scroll.refresh_normalized(), 1.0);
        assert_eq!(scroll.state().normalized, 1.0);
    }

    #[test]
    fn non_finite_offsets_keep_previous_goal() {
        let mut scroll = scroller();
        scroll.update(400.0);
        scroll.update(f32::NAN);
        scroll.update(f32::INFINITY);
        assert_eq!(scroll.state().hard, 400.0);
        assert!(scroll.state().soft.is_finite());

        let soft = scroll.update(50.0);
        assert!(soft.is_finite());
        assert_eq!(scroll.state().hard, 50.0);
    }

    #[test]
    fn resize_recomputes_limit() {
        let mut scroll = scroller();
        scroll.on_resize(Viewport::new(800.0, 1000.0), 3000.0);
        assert_eq!(scroll.viewport().height, 1000.0);
        assert_eq!(scroll.state().limit, 2000.0);
    }

    #[test]
    fn animation_request_is_guarded() {
        let mut state = ScrollState::default();
        assert!(state.request_animation());
        assert!(!state.request_animation());
        state.finish_animation();
        assert!(state.request_animation());
    }
}
