//! Test viewport: a settable `Viewport` implementation for tests.

use std::collections::HashMap;

use storyscroll_core::error::StoryError;
use storyscroll_core::geometry::{Rect, Viewport, ViewportGeometry};

/// A viewport whose geometry and anchors are set directly by the test.
#[derive(Debug, Clone)]
pub struct FakeViewport {
    geometry: ViewportGeometry,
    anchors: HashMap<String, Rect>,
}

impl FakeViewport {
    /// A viewport scrolled to the top, with no anchors registered.
    #[must_use]
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            geometry: ViewportGeometry {
                scroll_top: 0.0,
                viewport_height,
                document_height,
            },
            anchors: HashMap::new(),
        }
    }

    /// Builder form of [`FakeViewport::scroll_to`].
    #[must_use]
    pub fn scrolled_to(mut self, scroll_top: f64) -> Self {
        self.scroll_to(scroll_top);
        self
    }

    /// Builder form of [`FakeViewport::set_anchor`].
    #[must_use]
    pub fn with_anchor(mut self, section_id: &str, rect: Rect) -> Self {
        self.set_anchor(section_id, rect);
        self
    }

    /// Sets the document scroll offset.
    pub fn scroll_to(&mut self, scroll_top: f64) {
        self.geometry.scroll_top = scroll_top;
    }

    /// Registers or moves an anchor.
    pub fn set_anchor(&mut self, section_id: &str, rect: Rect) {
        self.anchors.insert(section_id.to_owned(), rect);
    }

    /// Unregisters an anchor.
    pub fn remove_anchor(&mut self, section_id: &str) {
        self.anchors.remove(section_id);
    }
}

impl Viewport for FakeViewport {
    fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    fn anchor_rect(&self, section_id: &str) -> Result<Rect, StoryError> {
        self.anchors
            .get(section_id)
            .copied()
            .ok_or_else(|| StoryError::MissingAnchor(section_id.to_owned()))
    }
}
