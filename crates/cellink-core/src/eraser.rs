//! Partial erasure: splits strokes into surviving runs around an eraser
//! contact, instead of deleting whole strokes.

use crate::geometry::{dist_sq, point_segment_dist_sq, segment_segment_dist_sq};
use crate::stroke::{OverlayDocument, Stroke};
use kurbo::Point;

/// Minimum effective eraser radius, in normalized units. Keeps thin
/// strokes erasable regardless of their rendered thickness.
pub const BASE_ERASE_RADIUS: f64 = 0.02;

/// Multiplier mapping a stroke's width to its erase radius.
pub const ERASE_WIDTH_FACTOR: f64 = 6.0;

/// Bisection steps when clipping a segment against the erase region.
const CLIP_STEPS: u32 = 24;

/// One eraser contact event.
///
/// `previous` is the last processed contact point; together they form a
/// swept segment so strokes jumped over between move events are still
/// caught. A drag is a sequence of these, applied one read-modify-write at
/// a time.
#[derive(Debug, Clone, Copy)]
pub struct EraseSweep {
    pub point: Point,
    pub previous: Option<Point>,
}

impl EraseSweep {
    /// A stationary contact.
    pub fn at(point: Point) -> Self {
        Self {
            point,
            previous: None,
        }
    }

    /// A contact swept from the previously processed point.
    pub fn swept(point: Point, previous: Point) -> Self {
        Self {
            point,
            previous: Some(previous),
        }
    }

    /// Whether `p` lies inside the erase region for the given squared
    /// radius: within radius of the contact, of the previous contact, or
    /// of the segment between them.
    fn contains(&self, p: Point, radius_sq: f64) -> bool {
        if dist_sq(p, self.point) <= radius_sq {
            return true;
        }
        match self.previous {
            Some(prev) => {
                dist_sq(p, prev) <= radius_sq
                    || point_segment_dist_sq(p, prev, self.point) <= radius_sq
            }
            None => false,
        }
    }

    /// Whether the segment `a`→`b` passes through the erase region even
    /// though both endpoints may sit outside it.
    fn crosses(&self, a: Point, b: Point, radius_sq: f64) -> bool {
        let start = self.previous.unwrap_or(self.point);
        segment_segment_dist_sq(a, b, start, self.point) <= radius_sq
    }
}

/// Effective erase radius for a stroke.
pub fn erase_radius(stroke: &Stroke) -> f64 {
    BASE_ERASE_RADIUS.max(stroke.width * ERASE_WIDTH_FACTOR)
}

/// Result of erasing against a single stroke.
#[derive(Debug)]
pub enum EraseOutcome {
    /// Nothing within radius; the stroke passes through unmodified.
    Untouched,
    /// Zero or more surviving sub-strokes replace the original.
    Split(Vec<Stroke>),
}

/// Find the point where the segment from `outside` to `inside` enters the
/// erase region, by bisection. The result stays strictly outside, so a
/// repeated erase at the same spot leaves it alone.
fn clip_toward(outside: Point, inside: Point, sweep: &EraseSweep, radius_sq: f64) -> Point {
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    for _ in 0..CLIP_STEPS {
        let mid = (lo + hi) / 2.0;
        let p = Point::lerp(outside, inside, mid);
        if sweep.contains(p, radius_sq) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Point::lerp(outside, inside, lo)
}

/// Erase against one stroke, splitting it into maximal surviving runs.
///
/// A point is removed when it lies inside the erase region. Kept points
/// form runs; a run also breaks between two kept neighbors whose
/// connecting segment is swept through. Where an erased stretch has kept
/// neighbors on both sides, the adjoining runs are extended with clipped
/// boundary points so the surviving ink ends at the erase radius rather
/// than at the nearest sample. A stretch touching either end of the stroke
/// is dropped without clipping, which is what keeps a two-point stroke
/// from leaving single-sample debris. Runs shorter than two points are
/// discarded.
pub fn erase_stroke(stroke: &Stroke, sweep: &EraseSweep) -> EraseOutcome {
    let points = &stroke.points;
    let n = points.len();
    let radius_sq = erase_radius(stroke).powi(2);

    let removed: Vec<bool> = points.iter().map(|&p| sweep.contains(p, radius_sq)).collect();

    // Mid-segment sweeps between kept neighbors.
    let cut_after: Vec<bool> = (0..n.saturating_sub(1))
        .map(|i| !removed[i] && !removed[i + 1] && sweep.crosses(points[i], points[i + 1], radius_sq))
        .collect();

    if !removed.iter().any(|&r| r) && !cut_after.iter().any(|&c| c) {
        return EraseOutcome::Untouched;
    }

    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut i = 0;
    while i < n {
        if removed[i] {
            let start = i;
            while i < n && removed[i] {
                i += 1;
            }
            // `start > 0` can only hold after a kept point, so `current`
            // ends with points[start - 1] here.
            let interior = start > 0 && i < n;
            if interior {
                current.push(clip_toward(points[start - 1], points[start], sweep, radius_sq));
                runs.push(std::mem::take(&mut current));
                current.push(clip_toward(points[i], points[i - 1], sweep, radius_sq));
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(points[i]);
            if i + 1 < n && cut_after[i] {
                runs.push(std::mem::take(&mut current));
            }
            i += 1;
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    let survivors = runs
        .into_iter()
        .filter(|run| run.len() >= 2)
        .map(|run| stroke.with_run(run))
        .collect();
    EraseOutcome::Split(survivors)
}

/// Erase against every stroke in the collection, rebuilding it in paint
/// order with each affected stroke replaced by its surviving runs.
///
/// Returns whether anything changed; `false` means the caller can skip the
/// store write and the re-render entirely.
pub fn erase_document(document: &mut OverlayDocument, sweep: &EraseSweep) -> bool {
    let mut changed = false;
    let mut rebuilt = Vec::with_capacity(document.strokes.len());
    for stroke in document.strokes.drain(..) {
        match erase_stroke(&stroke, sweep) {
            EraseOutcome::Untouched => rebuilt.push(stroke),
            EraseOutcome::Split(survivors) => {
                changed = true;
                rebuilt.extend(survivors);
            }
        }
    }
    document.strokes = rebuilt;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Basis, Tool, DEFAULT_STROKE_WIDTH};
    use kurbo::Size;

    fn vertical_stroke(ys: &[f64]) -> Stroke {
        let mut stroke = Stroke::new(Tool::Pen, "#000", DEFAULT_STROKE_WIDTH);
        stroke.basis = Some(Basis::capture(Size::new(640.0, 480.0)));
        for &y in ys {
            stroke.push_point(Point::new(0.0, y));
        }
        stroke
    }

    #[test]
    fn test_radius_floor_for_thin_strokes() {
        let thin = Stroke::new(Tool::Pen, "#000", 0.001);
        assert_eq!(erase_radius(&thin), BASE_ERASE_RADIUS);

        let thick = Stroke::new(Tool::Highlighter, "#ff0", 0.01);
        assert!((erase_radius(&thick) - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_untouched_stroke_keeps_identity() {
        let stroke = vertical_stroke(&[0.0, 0.5, 1.0]);
        let sweep = EraseSweep::at(Point::new(0.9, 0.5));
        assert!(matches!(erase_stroke(&stroke, &sweep), EraseOutcome::Untouched));

        let mut document = OverlayDocument::new();
        document.push(stroke);
        assert!(!erase_document(&mut document, &sweep));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_split_into_two_runs_around_contact() {
        let stroke = vertical_stroke(&[0.0, 0.5, 1.0]);
        let radius = erase_radius(&stroke);
        let sweep = EraseSweep::at(Point::new(0.0, 0.5));

        let EraseOutcome::Split(survivors) = erase_stroke(&stroke, &sweep) else {
            panic!("contact on a point must modify the stroke");
        };
        assert_eq!(survivors.len(), 2);

        let first = &survivors[0];
        let second = &survivors[1];
        assert!(first.points.len() >= 2);
        assert!(second.points.len() >= 2);

        // The surviving ink ends just outside the erase radius.
        let first_end = first.points.last().unwrap().y;
        let second_start = second.points.first().unwrap().y;
        assert!(first.points.iter().all(|p| p.y <= 0.5 - radius + 1e-6));
        assert!((first_end - (0.5 - radius)).abs() < 1e-4);
        assert!(second.points.iter().all(|p| p.y >= 0.5 + radius - 1e-6));
        assert!((second_start - (0.5 + radius)).abs() < 1e-4);

        // Style and basis carry over; the extent is refit per run.
        assert_eq!(first.tool, Tool::Pen);
        let basis = first.basis.as_ref().unwrap();
        assert_eq!(basis.min_y, Some(0.0));
        assert!((basis.max_y.unwrap() - (0.5 - radius)).abs() < 1e-4);
    }

    #[test]
    fn test_two_point_stroke_leaves_no_debris() {
        // Contact within radius of either endpoint wipes the whole stroke.
        let stroke = vertical_stroke(&[0.0, 0.3]);
        for contact in [Point::new(0.0, 0.005), Point::new(0.0, 0.295)] {
            let EraseOutcome::Split(survivors) = erase_stroke(&stroke, &EraseSweep::at(contact)) else {
                panic!("contact near an endpoint must modify the stroke");
            };
            assert!(survivors.is_empty());
        }
    }

    #[test]
    fn test_mid_segment_sweep_breaks_long_segment() {
        // Both endpoints sit outside the radius, but the eraser sweeps
        // straight through the middle of the connecting segment.
        let stroke = vertical_stroke(&[0.0, 1.0]);
        let sweep = EraseSweep::swept(Point::new(0.01, 0.5), Point::new(-0.01, 0.5));

        let EraseOutcome::Split(survivors) = erase_stroke(&stroke, &sweep) else {
            panic!("swept-through segment must modify the stroke");
        };
        // Each side collapses to a single sample and is dropped.
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_mid_segment_sweep_splits_dense_stroke() {
        let ys: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        let stroke = vertical_stroke(&ys);
        let sweep = EraseSweep::swept(Point::new(0.1, 0.5), Point::new(-0.1, 0.5));

        let EraseOutcome::Split(survivors) = erase_stroke(&stroke, &sweep) else {
            panic!("sweep across a dense stroke must modify it");
        };
        assert_eq!(survivors.len(), 2);
        assert!(survivors[0].points.iter().all(|p| p.y < 0.5));
        assert!(survivors[1].points.iter().all(|p| p.y > 0.5));
    }

    #[test]
    fn test_swept_segment_catches_jumped_points() {
        // The contact points themselves are far from the stroke; only the
        // swept segment between them passes through its middle sample.
        let stroke = vertical_stroke(&[0.45, 0.5, 0.55]);
        let radius = erase_radius(&stroke);
        let sweep = EraseSweep::swept(Point::new(0.4, 0.5), Point::new(-0.4, 0.5));

        let EraseOutcome::Split(survivors) = erase_stroke(&stroke, &sweep) else {
            panic!("swept segment must catch points it jumps over");
        };
        assert_eq!(survivors.len(), 2);
        assert!(survivors[0].points.iter().all(|p| p.y <= 0.5 - radius + 1e-6));
        assert!(survivors[1].points.iter().all(|p| p.y >= 0.5 + radius - 1e-6));
    }

    #[test]
    fn test_repeat_erase_is_idempotent() {
        let ys: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        let mut document = OverlayDocument::new();
        document.push(vertical_stroke(&ys));

        let sweep = EraseSweep::at(Point::new(0.0, 0.5));
        assert!(erase_document(&mut document, &sweep));
        let after_first = document.clone();

        // Everything within radius is already gone; nothing changes and
        // the caller is told not to rewrite.
        assert!(!erase_document(&mut document, &sweep));
        assert_eq!(document, after_first);
    }

    #[test]
    fn test_erase_document_preserves_order() {
        let mut document = OverlayDocument::new();
        document.push(vertical_stroke(&[0.0, 0.25, 0.5, 0.75, 1.0]));
        let mut untouched = vertical_stroke(&[0.0, 0.5, 1.0]);
        untouched.color = "#f00".to_string();
        for p in &mut untouched.points {
            p.x = 0.5;
        }
        document.push(untouched);

        assert!(erase_document(&mut document, &EraseSweep::at(Point::new(0.0, 0.5))));
        // The split runs of the first stroke come before the untouched one.
        assert_eq!(document.len(), 3);
        assert_eq!(document.strokes[0].color, "#000");
        assert_eq!(document.strokes[1].color, "#000");
        assert_eq!(document.strokes[2].color, "#f00");
    }

    #[test]
    fn test_single_point_stroke_is_wiped_or_kept() {
        let dot = vertical_stroke(&[0.5]);

        let miss = EraseSweep::at(Point::new(0.5, 0.5));
        assert!(matches!(erase_stroke(&dot, &miss), EraseOutcome::Untouched));

        let hit = EraseSweep::at(Point::new(0.0, 0.5));
        let EraseOutcome::Split(survivors) = erase_stroke(&dot, &hit) else {
            panic!("direct hit must modify the dot");
        };
        assert!(survivors.is_empty());
    }
}
