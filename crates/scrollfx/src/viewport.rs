/// Logical window dimensions, refreshed on every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Width over height; a degenerate viewport reports a square aspect.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.width < self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_tracks_dimensions() {
        let viewport = Viewport::new(1600.0, 900.0);
        assert!((viewport.aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert!(!viewport.is_portrait());

        let portrait = Viewport::new(400.0, 800.0);
        assert!((portrait.aspect() - 0.5).abs() < 1e-6);
        assert!(portrait.is_portrait());
    }

    #[test]
    fn minimised_window_keeps_finite_aspect() {
        let viewport = Viewport::new(0.0, 0.0);
        assert_eq!(viewport.aspect(), 1.0);
    }
}
