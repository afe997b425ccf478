//! Standalone SVG export for stroke collections.
//!
//! Produces an overlay sized to the largest recorded basis rectangle, for
//! embedding over a static rendering of the annotated content.

use cellink_core::stroke::Stroke;
use std::fmt::Write;

/// Intrinsic dimension used when no stroke recorded basis dims.
const DEFAULT_DIM: f64 = 1000.0;

/// Minimum rendered line width in pixels.
const MIN_STROKE_WIDTH: f64 = 1.0;

/// An exported overlay and its intrinsic pixel size.
#[derive(Debug, Clone)]
pub struct SvgOverlay {
    /// Complete `<svg>` element.
    pub markup: String,
    /// Intrinsic width in CSS pixels.
    pub width: f64,
    /// Intrinsic height in CSS pixels.
    pub height: f64,
}

/// Render strokes into a standalone SVG.
///
/// The viewport spans the largest basis rectangle recorded by any stroke;
/// strokes drawn against a smaller basis are scaled up into it. Returns
/// `None` for an empty collection.
pub fn strokes_to_svg(strokes: &[Stroke]) -> Option<SvgOverlay> {
    if strokes.is_empty() {
        return None;
    }

    let mut width = strokes
        .iter()
        .filter_map(|s| s.basis.as_ref()?.width)
        .fold(0.0, f64::max);
    let mut height = strokes
        .iter()
        .filter_map(|s| s.basis.as_ref()?.height)
        .fold(0.0, f64::max);
    if width <= 0.0 {
        width = DEFAULT_DIM;
    }
    if height <= 0.0 {
        height = DEFAULT_DIM;
    }

    let mut markup = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" preserveAspectRatio=\"none\" \
         viewBox=\"0 0 {width:.2} {height:.2}\" width=\"{width:.2}\" height=\"{height:.2}\">"
    );

    for stroke in strokes {
        if stroke.points.is_empty() {
            continue;
        }

        let basis = stroke.basis.as_ref();
        let basis_w = basis
            .and_then(|b| b.width)
            .filter(|w| *w > 0.0)
            .unwrap_or(width);
        let basis_h = basis
            .and_then(|b| b.height)
            .filter(|h| *h > 0.0)
            .unwrap_or(height);
        let scale_x = width / basis_w;
        let scale_y = height / basis_h;
        let stroke_width = (stroke.width * basis_w).max(MIN_STROKE_WIDTH) * scale_x;

        let mut path = String::new();
        for (i, p) in stroke.points.iter().enumerate() {
            let x = p.x * basis_w * scale_x;
            let y = p.y * basis_h * scale_y;
            let command = if i == 0 { "M" } else { " L" };
            let _ = write!(path, "{command} {x:.2} {y:.2}");
        }

        let rgba = stroke.color_value().to_rgba8();
        let _ = write!(
            markup,
            "<path d=\"{path}\" fill=\"none\" \
             stroke=\"#{:02x}{:02x}{:02x}\" stroke-linecap=\"round\" stroke-linejoin=\"round\" \
             stroke-opacity=\"{:.3}\" stroke-width=\"{stroke_width:.2}\"/>",
            rgba.r,
            rgba.g,
            rgba.b,
            stroke.effective_alpha(),
        );
    }

    markup.push_str("</svg>");
    Some(SvgOverlay {
        markup,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellink_core::stroke::{Basis, Tool};
    use kurbo::{Point, Size};

    fn stroke_with_basis(size: Size) -> Stroke {
        let mut stroke = Stroke::new(Tool::Pen, "#f00", 0.01);
        stroke.basis = Some(Basis::capture(size));
        stroke.push_point(Point::new(0.0, 0.0));
        stroke.push_point(Point::new(0.5, 0.5));
        stroke
    }

    #[test]
    fn test_empty_collection_exports_nothing() {
        assert!(strokes_to_svg(&[]).is_none());
    }

    #[test]
    fn test_viewport_spans_largest_basis() {
        let strokes = [
            stroke_with_basis(Size::new(400.0, 100.0)),
            stroke_with_basis(Size::new(600.0, 80.0)),
        ];
        let svg = strokes_to_svg(&strokes).unwrap();
        assert_eq!(svg.width, 600.0);
        assert_eq!(svg.height, 100.0);
        assert!(svg.markup.contains("viewBox=\"0 0 600.00 100.00\""));
    }

    #[test]
    fn test_default_dims_without_basis() {
        let mut stroke = stroke_with_basis(Size::new(1.0, 1.0));
        stroke.basis = None;
        let svg = strokes_to_svg(&[stroke]).unwrap();
        assert_eq!(svg.width, DEFAULT_DIM);
        assert_eq!(svg.height, DEFAULT_DIM);
    }

    #[test]
    fn test_path_scales_into_viewport() {
        let strokes = [
            stroke_with_basis(Size::new(400.0, 100.0)),
            stroke_with_basis(Size::new(800.0, 100.0)),
        ];
        let svg = strokes_to_svg(&strokes).unwrap();
        // The 400px-basis stroke's midpoint (0.5) scales to 400 of 800.
        assert!(svg.markup.contains("M 0.00 0.00 L 400.00 50.00"));
        assert!(svg.markup.ends_with("</svg>"));
    }

    #[test]
    fn test_stroke_style_attributes() {
        let svg = strokes_to_svg(&[stroke_with_basis(Size::new(400.0, 100.0))]).unwrap();
        assert!(svg.markup.contains("stroke=\"#ff0000\""));
        assert!(svg.markup.contains("stroke-opacity=\"1.000\""));
        assert!(svg.markup.contains("stroke-linecap=\"round\""));
        // width 0.01 * 400 = 4px at scale 1.
        assert!(svg.markup.contains("stroke-width=\"4.00\""));
    }

    #[test]
    fn test_pointless_strokes_are_skipped() {
        let mut empty = stroke_with_basis(Size::new(400.0, 100.0));
        empty.points.clear();
        let svg = strokes_to_svg(&[empty]).unwrap();
        assert!(!svg.markup.contains("<path"));
    }
}
