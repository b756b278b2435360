//! Viewport geometry: read-only layout queries against section anchors.

use serde::{Deserialize, Serialize};

use crate::error::StoryError;

/// Bounding box of an anchor, relative to the viewport's top edge, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Leading (top) edge.
    pub top: f64,
    /// Trailing (bottom) edge.
    pub bottom: f64,
}

impl Rect {
    /// Creates a rect from its leading and trailing edges.
    #[must_use]
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// True once the trailing edge has scrolled above the viewport's top.
    #[must_use]
    pub fn is_scrolled_past(&self) -> bool {
        self.bottom < 0.0
    }

    /// True when the leading edge sits above the viewport midline while the
    /// trailing edge is still on screen.
    #[must_use]
    pub fn crosses_midline(&self, viewport_height: f64) -> bool {
        self.top < viewport_height * 0.5 && self.bottom > 0.0
    }
}

/// Document-level scroll geometry sampled on a scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportGeometry {
    /// Current vertical scroll offset of the document.
    pub scroll_top: f64,
    /// Height of the visible viewport.
    pub viewport_height: f64,
    /// Total scrollable height of the document.
    pub document_height: f64,
}

impl ViewportGeometry {
    /// Overall scroll progress in `[0, 1]`.
    ///
    /// Non-finite inputs and documents that fit inside the viewport yield `0`.
    #[must_use]
    pub fn scroll_progress(&self) -> f64 {
        let range = self.document_height - self.viewport_height;
        if !range.is_finite() || !self.scroll_top.is_finite() || range <= 0.0 {
            return 0.0;
        }
        (self.scroll_top / range).clamp(0.0, 1.0)
    }
}

/// Read-only access to the host's layout.
pub trait Viewport {
    /// Samples the document scroll geometry.
    fn geometry(&self) -> ViewportGeometry;

    /// Returns the bounding box of a section's anchor element.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::MissingAnchor` if the anchor is not registered.
    fn anchor_rect(&self, section_id: &str) -> Result<Rect, StoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_progress_is_ratio_of_scrollable_range() {
        let geometry = ViewportGeometry {
            scroll_top: 500.0,
            viewport_height: 1000.0,
            document_height: 3000.0,
        };
        assert!((geometry.scroll_progress() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_scroll_progress_clamps_overscroll() {
        let geometry = ViewportGeometry {
            scroll_top: 2600.0,
            viewport_height: 1000.0,
            document_height: 3000.0,
        };
        assert!((geometry.scroll_progress() - 1.0).abs() < f64::EPSILON);

        let bounced = ViewportGeometry {
            scroll_top: -40.0,
            ..geometry
        };
        assert!(bounced.scroll_progress().abs() < f64::EPSILON);
    }

    #[test]
    fn test_scroll_progress_is_zero_when_document_fits() {
        let geometry = ViewportGeometry {
            scroll_top: 0.0,
            viewport_height: 900.0,
            document_height: 600.0,
        };
        assert!(geometry.scroll_progress().abs() < f64::EPSILON);
    }

    #[test]
    fn test_rect_crosses_midline() {
        assert!(Rect::new(300.0, 1300.0).crosses_midline(1000.0));
        assert!(!Rect::new(600.0, 1600.0).crosses_midline(1000.0));
        assert!(!Rect::new(-1200.0, -10.0).crosses_midline(1000.0));
    }

    #[test]
    fn test_rect_scrolled_past_uses_trailing_edge() {
        assert!(Rect::new(-900.0, -1.0).is_scrolled_past());
        assert!(!Rect::new(-900.0, 0.0).is_scrolled_past());
    }
}
