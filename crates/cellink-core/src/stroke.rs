//! Stroke records and the basis that anchors them to a pixel rectangle.

use kurbo::{Point, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Metadata key the whole stroke collection is stored under.
pub const OVERLAY_KEY: &str = "overlay_v1";

/// Default normalized line thickness for new strokes.
pub const DEFAULT_STROKE_WIDTH: f64 = 0.003;

/// Default stroke color.
pub const DEFAULT_COLOR: &str = "#000";

/// Drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Highlighter,
}

impl Tool {
    /// Opacity used when a stroke does not carry its own alpha.
    pub fn default_alpha(self) -> f64 {
        match self {
            Tool::Pen => 1.0,
            Tool::Highlighter => 0.3,
        }
    }
}

/// The pixel rectangle (and optional text-line anchor) a stroke's
/// normalized coordinates are computed against.
///
/// Captured once at the first point of a stroke and frozen afterwards,
/// except `min_y`/`max_y` which track the stroke's own vertical extent as
/// points are appended, and the anchor pair which is bound once on stroke
/// completion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basis {
    /// Surface width in pixels at stroke creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Surface height in pixels at stroke creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Lowest normalized y reached by the stroke's points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_y: Option<f64>,
    /// Highest normalized y reached by the stroke's points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_y: Option<f64>,
    /// Index of the text line the stroke is pinned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_line: Option<u32>,
    /// The anchor line's top offset at creation, normalized against
    /// `height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_line_top: Option<f64>,
}

impl Basis {
    /// Capture a basis from the live surface rectangle at stroke start.
    pub fn capture(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..Self::default()
        }
    }

    /// Widen the tracked vertical extent as a point is appended.
    pub fn extend(&mut self, y: f64) {
        self.min_y = Some(self.min_y.map_or(y, |m| m.min(y)));
        self.max_y = Some(self.max_y.map_or(y, |m| m.max(y)));
    }

    /// A copy with `min_y`/`max_y` recomputed from a surviving sub-run.
    /// All other fields, the anchor included, are preserved.
    pub fn refit(&self, points: &[Point]) -> Self {
        let mut basis = self.clone();
        basis.min_y = points.iter().map(|p| p.y).reduce(f64::min);
        basis.max_y = points.iter().map(|p| p.y).reduce(f64::max);
        basis
    }

    /// Vertical center of the tracked extent, in normalized units.
    pub fn center_y(&self) -> Option<f64> {
        Some((self.min_y? + self.max_y?) / 2.0)
    }
}

/// Points are stored as `[x, y]` pairs on the wire.
mod point_pairs {
    use kurbo::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error> {
        let pairs: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Point>, D::Error> {
        let pairs = Vec::<[f64; 2]>::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

/// A single freehand stroke in normalized coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Tool the stroke was drawn with.
    #[serde(default)]
    pub tool: Tool,
    /// CSS-style hex color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Line thickness, normalized to the basis width.
    #[serde(default = "default_width")]
    pub width: f64,
    /// Opacity override; the tool default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    /// Path points, normalized to the basis rectangle.
    #[serde(default, with = "point_pairs")]
    pub points: Vec<Point>,
    /// Rectangle the points were normalized against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<Basis>,
}

impl Stroke {
    /// Create an empty stroke for the given tool and style.
    pub fn new(tool: Tool, color: impl Into<String>, width: f64) -> Self {
        Self {
            tool,
            color: color.into(),
            width,
            alpha: None,
            points: Vec::new(),
            basis: None,
        }
    }

    /// Append a point, extending the basis extent when one is present.
    pub fn push_point(&mut self, point: Point) {
        if let Some(basis) = &mut self.basis {
            basis.extend(point.y);
        }
        self.points.push(point);
    }

    /// Effective opacity: the stroke's own alpha clamped to [0, 1], or the
    /// tool default.
    pub fn effective_alpha(&self) -> f64 {
        self.alpha
            .map(|a| a.clamp(0.0, 1.0))
            .unwrap_or_else(|| self.tool.default_alpha())
    }

    /// The stroke color parsed to a concrete RGBA value.
    pub fn color_value(&self) -> Color {
        parse_color(&self.color)
    }

    /// A survivor stroke carrying this stroke's style and the given run of
    /// points, with the basis extent refit to the run.
    pub fn with_run(&self, points: Vec<Point>) -> Self {
        Self {
            tool: self.tool,
            color: self.color.clone(),
            width: self.width,
            alpha: self.alpha,
            basis: self.basis.as_ref().map(|b| b.refit(&points)),
            points,
        }
    }
}

/// Parse a CSS-style hex color (`#rgb`, `#rrggbb`, `#rrggbbaa`).
///
/// Anything unparseable falls back to opaque black; stored blobs are never
/// a reason to fail a render.
pub fn parse_color(color: &str) -> Color {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return Color::from_rgba8(0, 0, 0, 255);
        }
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                return Color::from_rgba8(r, g, b, 255);
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                return Color::from_rgba8(r, g, b, 255);
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                return Color::from_rgba8(r, g, b, a);
            }
            _ => {}
        }
    }
    Color::from_rgba8(0, 0, 0, 255)
}

/// The full stroke collection stored under [`OVERLAY_KEY`].
///
/// Paint order is array order: later strokes paint over earlier ones. The
/// collection is owned by the external store; engine code reads a fresh
/// copy for every mutation and writes the full replacement back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverlayDocument {
    #[serde(default)]
    pub strokes: Vec<Stroke>,
}

impl OverlayDocument {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized stroke.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Number of strokes.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
