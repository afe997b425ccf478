//! CellInk Render Library
//!
//! Pure data-to-draw-commands rendering for ink overlays: the host hands
//! the commands to whatever 2D surface it owns. Also ships a standalone
//! SVG exporter for static output.

pub mod renderer;
pub mod svg;

pub use renderer::{render_strokes, Polyline, RenderContext};
pub use svg::{strokes_to_svg, SvgOverlay};
