use crate::viewport::Viewport;

/// A titled, full-viewport block of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub index: usize,
    pub title: String,
}

impl Section {
    /// One-based label shown while the section is in view, e.g. `02 · Naos`.
    pub fn label(&self) -> String {
        format!("{:02} · {}", self.index + 1, self.title)
    }
}

/// Vertical stack of sections making up the scrollable content.
#[derive(Debug, Clone)]
pub struct SectionLayout {
    sections: Vec<Section>,
    section_height: f32,
}

impl SectionLayout {
    /// `section_height` is measured in viewport heights.
    pub fn new<I, S>(titles: I, section_height: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sections = titles
            .into_iter()
            .enumerate()
            .map(|(index, title)| Section {
                index,
                title: title.into(),
            })
            .collect();
        Self {
            sections,
            section_height: section_height.max(f32::EPSILON),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn content_height(&self, viewport: Viewport) -> f32 {
        self.sections.len() as f32 * self.section_height * viewport.height
    }

    /// Section whose block contains the middle of the viewport at `offset`.
    pub fn active(&self, offset: f32, viewport: Viewport) -> Option<&Section> {
        if self.sections.is_empty() {
            return None;
        }
        let block = self.section_height * viewport.height;
        if block <= 0.0 {
            return self.sections.first();
        }
        let probe = offset.max(0.0) + viewport.height * 0.5;
        let index = (probe / block).floor() as usize;
        self.sections.get(index.min(self.sections.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SectionLayout {
        SectionLayout::new(["Logma", "Naos", "Chara"], 1.0)
    }

    #[test]
    fn labels_are_one_based() {
        let layout = layout();
        assert_eq!(layout.sections()[0].label(), "01 · Logma");
        assert_eq!(layout.sections()[2].label(), "03 · Chara");
    }

    #[test]
    fn content_spans_every_section() {
        let viewport = Viewport::new(1280.0, 800.0);
        assert_eq!(layout().content_height(viewport), 2400.0);
    }

    #[test]
    fn active_section_follows_offset() {
        let layout = layout();
        let viewport = Viewport::new(1280.0, 800.0);
        assert_eq!(layout.active(0.0, viewport).unwrap().title, "Logma");
        assert_eq!(layout.active(399.0, viewport).unwrap().title, "Logma");
        assert_eq!(layout.active(400.0, viewport).unwrap().title, "Naos");
        assert_eq!(layout.active(1600.0, viewport).unwrap().title, "Chara");
        assert_eq!(layout.active(99_999.0, viewport).unwrap().title, "Chara");
    }

    #[test]
    fn empty_layout_has_no_active_section() {
        let layout = SectionLayout::new(Vec::<String>::new(), 1.0);
        assert!(layout.active(0.0, Viewport::default()).is_none());
        assert_eq!(layout.content_height(Viewport::default()), 0.0);
    }
}
