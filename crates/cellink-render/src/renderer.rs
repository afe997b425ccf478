//! Stroke-to-draw-command rendering.

use cellink_core::content::ContentGeometry;
use cellink_core::stroke::Stroke;
use kurbo::{Point, Size};
use peniko::Color;

/// A single polyline draw command in surface pixels.
///
/// The host executes these against its 2D surface with round caps and
/// joins; a one-point polyline degenerates to a dot under round caps.
#[derive(Debug, Clone)]
pub struct Polyline {
    /// Path points in surface pixels.
    pub points: Vec<Point>,
    /// Line width in surface pixels.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
    /// Stroke opacity in [0, 1].
    pub alpha: f64,
}

/// Context for a single render pass.
pub struct RenderContext<'a> {
    /// Committed strokes, in paint order.
    pub strokes: &'a [Stroke],
    /// Live pixel rectangle of the surface.
    pub live_size: Size,
    /// Content geometry for anchor-line correction.
    pub geometry: Option<&'a dyn ContentGeometry>,
    /// In-progress stroke, drawn on top of the committed collection.
    pub in_progress: Option<&'a Stroke>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(strokes: &'a [Stroke], live_size: Size) -> Self {
        Self {
            strokes,
            live_size,
            geometry: None,
            in_progress: None,
        }
    }

    /// Attach content geometry for anchor correction.
    pub fn with_geometry(mut self, geometry: &'a dyn ContentGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Include a live preview stroke.
    pub fn with_in_progress(mut self, stroke: &'a Stroke) -> Self {
        self.in_progress = Some(stroke);
        self
    }
}

/// Convert the context's strokes into draw commands, committed collection
/// first, the in-progress stroke painted last.
pub fn render_strokes(ctx: &RenderContext) -> Vec<Polyline> {
    ctx.strokes
        .iter()
        .chain(ctx.in_progress)
        .filter_map(|stroke| render_stroke(stroke, ctx))
        .collect()
}

fn render_stroke(stroke: &Stroke, ctx: &RenderContext) -> Option<Polyline> {
    if stroke.points.is_empty() {
        return None;
    }

    let (basis_w, basis_h) = basis_dims(stroke, ctx.live_size);
    let delta_y = anchor_delta(stroke, basis_h, ctx.live_size, ctx.geometry).unwrap_or(0.0);

    let points = stroke
        .points
        .iter()
        .map(|p| Point::new(p.x * basis_w, p.y * basis_h + delta_y))
        .collect();

    Some(Polyline {
        points,
        width: stroke.width * basis_w,
        color: stroke.color_value(),
        alpha: stroke.effective_alpha(),
    })
}

/// Basis pixel dimensions, falling back to the live rectangle when the
/// stroke predates basis capture or recorded degenerate dims.
fn basis_dims(stroke: &Stroke, live: Size) -> (f64, f64) {
    let basis = stroke.basis.as_ref();
    let width = basis
        .and_then(|b| b.width)
        .filter(|w| *w > 0.0)
        .unwrap_or(live.width);
    let height = basis
        .and_then(|b| b.height)
        .filter(|h| *h > 0.0)
        .unwrap_or(live.height);
    (width, height)
}

/// Vertical shift tracking content reflow: the anchor line's current top
/// minus its recorded top, both in pixels.
///
/// Skipped when the live rectangle is shorter than the basis height; the
/// stroke then renders at its raw position, tolerating the distortion
/// rather than guessing a correction.
fn anchor_delta(
    stroke: &Stroke,
    basis_h: f64,
    live: Size,
    geometry: Option<&dyn ContentGeometry>,
) -> Option<f64> {
    let geometry = geometry?;
    let basis = stroke.basis.as_ref()?;
    let line = basis.anchor_line?;
    let original_top = basis.anchor_line_top? * basis_h;
    if live.height < basis_h {
        return None;
    }
    let current_top = geometry.line_top(line)?;
    Some(current_top - original_top)
}
