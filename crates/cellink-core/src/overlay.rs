//! Overlay manager: the draw/erase operation surface for one overlay.

use crate::content::ContentGeometry;
use crate::eraser::{erase_document, EraseSweep};
use crate::store::{ChangeNotice, MetadataStore, StoreResult};
use crate::stroke::{Basis, OverlayDocument, Stroke, Tool};
use crate::sync::OverlaySync;
use kurbo::Point;
use log::debug;
use std::sync::Arc;

/// Drives one overlay surface: accumulates the in-progress stroke, commits
/// finished strokes through the synchronizer, and runs the eraser.
///
/// Pointer events arrive strictly ordered and each handler runs to
/// completion before the next, so every read-modify-write below is
/// internally consistent even though the store itself may be shared with
/// other actors.
pub struct OverlayManager {
    sync: OverlaySync,
    geometry: Option<Arc<dyn ContentGeometry>>,
    active: Option<Stroke>,
    render_requested: bool,
}

impl OverlayManager {
    /// Create a manager over the given store.
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self {
            sync: OverlaySync::new(store),
            geometry: None,
            active: None,
            render_requested: false,
        }
    }

    /// Attach a content geometry capability. Without one, strokes carry no
    /// basis and anchors never populate.
    pub fn with_geometry(mut self, geometry: Arc<dyn ContentGeometry>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Start a stroke at the given normalized point.
    pub fn begin_stroke(&mut self, point: Point, tool: Tool, color: impl Into<String>, width: f64) {
        let mut stroke = Stroke::new(tool, color, width);
        if let Some(geometry) = &self.geometry {
            stroke.basis = Some(Basis::capture(geometry.rect()));
        }
        stroke.push_point(point);
        self.active = Some(stroke);
        self.render_requested = true;
    }

    /// Append a point to the in-progress stroke. Ignored while no stroke
    /// is active.
    pub fn extend_stroke(&mut self, point: Point) {
        if let Some(stroke) = &mut self.active {
            stroke.push_point(point);
            self.render_requested = true;
        }
    }

    /// Finish the in-progress stroke, bind its anchor line, and persist it
    /// as the last element of the collection. No-op without an active
    /// stroke.
    pub fn commit_stroke(&mut self) -> StoreResult<()> {
        let Some(mut stroke) = self.active.take() else {
            return Ok(());
        };
        self.bind_anchor(&mut stroke);
        let mut document = self.sync.read();
        document.push(stroke);
        self.sync.write(&document)?;
        debug!("Committed stroke; collection now holds {} strokes", document.len());
        self.render_requested = true;
        Ok(())
    }

    /// Pointer-cancel commits exactly like pointer-up: partial work up to
    /// the cancel point is kept, there is no rollback path.
    pub fn cancel_stroke(&mut self) -> StoreResult<()> {
        self.commit_stroke()
    }

    /// Erase around one contact event; `previous` is the last processed
    /// contact, sweeping a segment between the two. The collection is
    /// re-read and fully rewritten, but only when something was actually
    /// within radius.
    pub fn erase_at(&mut self, point: Point, previous: Option<Point>) -> StoreResult<()> {
        let sweep = match previous {
            Some(previous) => EraseSweep::swept(point, previous),
            None => EraseSweep::at(point),
        };
        let mut document = self.sync.read();
        if erase_document(&mut document, &sweep) {
            self.sync.write(&document)?;
            self.render_requested = true;
            debug!(
                "Erase at ({:.3}, {:.3}) left {} strokes",
                point.x,
                point.y,
                document.len()
            );
        }
        Ok(())
    }

    /// Replace the stored collection with an empty one.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        self.sync.write(&OverlayDocument::new())?;
        self.render_requested = true;
        Ok(())
    }

    /// React to an externally-sourced change notification: request a
    /// re-render when it concerns the overlay key, without touching the
    /// stroke data itself.
    pub fn handle_change(&mut self, notice: &ChangeNotice) {
        if self.sync.matches(notice) {
            self.render_requested = true;
        }
    }

    /// The stroke currently being drawn, for live preview rendering.
    pub fn in_progress(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Whether a stroke is currently being drawn.
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// Drain the pending redraw request. The host polls this after every
    /// event it forwards.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }

    /// Current stroke collection, freshly read from the store.
    pub fn strokes(&self) -> OverlayDocument {
        self.sync.read()
    }

    /// The underlying synchronizer.
    pub fn sync(&self) -> &OverlaySync {
        &self.sync
    }

    /// Pin a finished stroke to the text line nearest its vertical center,
    /// recording that line's top offset normalized against basis height.
    fn bind_anchor(&self, stroke: &mut Stroke) {
        let Some(geometry) = &self.geometry else {
            return;
        };
        let Some(basis) = &mut stroke.basis else {
            return;
        };
        let Some(height) = basis.height.filter(|h| *h > 0.0) else {
            return;
        };
        let Some(center) = basis.center_y() else {
            return;
        };
        let Some(line) = geometry.line_at(center * height, 0.0) else {
            return;
        };
        let Some(top) = geometry.line_top(line) else {
            return;
        };
        basis.anchor_line = Some(line);
        basis.anchor_line_top = Some(top / height);
    }
}
