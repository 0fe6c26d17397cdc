// Vertical scroll state of a context's content area.
//
// The context owns this; factories only get told the resulting offset and
// scrollbar geometry.

use crate::native::ScrollbarGeometry;

/// Lines (or pixels, depending on the toolkit) scrolled per wheel notch.
pub const WHEEL_STEP: i32 = 3;

#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    /// Current offset from the top of the content
    offset: u16,

    /// Total content height
    total: u16,

    /// Visible height
    viewport: u16,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update content and viewport dimensions, clamping the offset.
    pub fn update_dimensions(&mut self, total: u16, viewport: u16) {
        self.total = total;
        self.viewport = viewport;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let target = (self.offset as i32 + delta).clamp(0, self.max_offset() as i32);
        self.offset = target as u16;
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Content overflows the viewport
    pub fn needs_scrollbar(&self) -> bool {
        self.total > self.viewport
    }

    /// Thumb position, or `None` when everything fits.
    pub fn geometry(&self) -> Option<ScrollbarGeometry> {
        if !self.needs_scrollbar() || self.total == 0 {
            return None;
        }
        let total = self.total as f32;
        let first = self.offset as f32 / total;
        let last = (self.offset as f32 + self.viewport as f32) / total;
        Some(ScrollbarGeometry {
            first,
            last: last.min(1.0),
        })
    }

    fn max_offset(&self) -> u16 {
        self.total.saturating_sub(self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrollbar_hidden_when_content_fits() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(50, 100);
        assert!(!scroll.needs_scrollbar());
        assert!(scroll.geometry().is_none());
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut scroll = ScrollState::new();
        scroll.update_dimensions(300, 100);
        scroll.scroll_by(-10);
        assert_eq!(scroll.offset(), 0);
        scroll.scroll_by(1000);
        assert_eq!(scroll.offset(), 200);

        let geometry = scroll.geometry().unwrap();
        assert!((geometry.first - 200.0 / 300.0).abs() < f32::EPSILON);
        assert!((geometry.last - 1.0).abs() < f32::EPSILON);

        // content shrinking pulls the offset back
        scroll.update_dimensions(150, 100);
        assert_eq!(scroll.offset(), 50);
    }
}
