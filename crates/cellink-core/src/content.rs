//! Surface and text-content geometry capability.

use kurbo::Size;

/// Geometry of the drawing surface and its underlying text content.
///
/// The host adapts whatever editor or viewer it owns to this interface.
/// Hosts without addressable content return `None` from the line lookups;
/// anchors then never populate and strokes fall back to plain proportional
/// rendering.
pub trait ContentGeometry: Send + Sync {
    /// Current pixel rectangle of the drawing region.
    fn rect(&self) -> Size;

    /// Pixel offset of the top edge of a text line.
    fn line_top(&self, line: u32) -> Option<f64>;

    /// Index of the text line whose vertical position is closest to the
    /// given pixel coordinate.
    fn line_at(&self, top: f64, left: f64) -> Option<u32>;
}

/// Fixed-size surface with uniformly spaced lines.
///
/// Used in tests and by headless hosts without a real content model.
#[derive(Debug, Clone)]
pub struct FixedGeometry {
    pub size: Size,
    pub line_height: f64,
}

impl FixedGeometry {
    pub fn new(size: Size, line_height: f64) -> Self {
        Self { size, line_height }
    }
}

impl ContentGeometry for FixedGeometry {
    fn rect(&self) -> Size {
        self.size
    }

    fn line_top(&self, line: u32) -> Option<f64> {
        if self.line_height <= 0.0 {
            return None;
        }
        Some(line as f64 * self.line_height)
    }

    fn line_at(&self, top: f64, _left: f64) -> Option<u32> {
        if self.line_height <= 0.0 {
            return None;
        }
        Some((top.max(0.0) / self.line_height).floor() as u32)
    }
}
