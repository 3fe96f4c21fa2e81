// Copyright (c) 2024 Mike Tsao

use crate::types::{SpanUid, BEATS_PER_SECTION};
use core::ops::Range;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// A chord placed on a section's beat grid. It occupies the beats
/// `start_beat..start_beat + duration`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordSpan {
    #[allow(missing_docs)]
    pub id: SpanUid,
    /// A chord symbol such as `Am` or `F#dim`.
    pub name: String,
    /// First beat, relative to the start of the section (or of the whole
    /// timeline, once flattened for export).
    pub start_beat: usize,
    /// Length in beats. Always at least one.
    pub duration: usize,
}
impl ChordSpan {
    /// Creates a span, bumping a zero duration up to one beat.
    pub fn new_with(id: SpanUid, name: &str, start_beat: usize, duration: usize) -> Self {
        Self {
            id,
            name: name.to_string(),
            start_beat,
            duration: duration.max(1),
        }
    }

    /// The beat right after this span ends.
    pub fn end_beat(&self) -> usize {
        self.start_beat + self.duration
    }

    #[allow(missing_docs)]
    pub fn extent(&self) -> Range<usize> {
        self.start_beat..self.end_beat()
    }

    /// Whether this span is sounding on `beat`.
    pub fn covers(&self, beat: usize) -> bool {
        self.extent().contains(&beat)
    }

    /// Whether this span shares any beat with `other`.
    pub fn overlaps(&self, other: &ChordSpan) -> bool {
        self.start_beat < other.end_beat() && other.start_beat < self.end_beat()
    }

    /// Same span, different identity.
    pub fn clone_with_id(&self, id: SpanUid) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    /// Moves one edge of the span to `new_boundary` (a beat index within the
    /// section), clamping so the span stays inside the section and at least
    /// one beat long. Dragging the left edge keeps the right edge where it
    /// was. Neighboring spans aren't consulted, so the result may overlap
    /// them.
    pub fn resize(&mut self, edge: ResizeEdge, new_boundary: isize) {
        match edge {
            ResizeEdge::Right => {
                let max_duration = BEATS_PER_SECTION.saturating_sub(self.start_beat).max(1);
                let wanted = new_boundary - self.start_beat as isize;
                self.duration = wanted.clamp(1, max_duration as isize) as usize;
            }
            ResizeEdge::Left => {
                let end = self.end_beat();
                let new_start = new_boundary.clamp(0, end as isize - 1) as usize;
                self.start_beat = new_start;
                self.duration = end - new_start;
            }
        }
    }
}

/// Which end of a [ChordSpan] is being dragged.
#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    /// Moves the start; the end stays put.
    Left,
    /// Moves the end; the start stays put.
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::{assert_ge, assert_le};
    use strum::IntoEnumIterator;

    fn span(start: usize, duration: usize) -> ChordSpan {
        ChordSpan::new_with(SpanUid(1), "C", start, duration)
    }

    #[test]
    fn extents() {
        let s = span(4, 3);
        assert_eq!(s.extent(), 4..7);
        assert!(!s.covers(3));
        assert!(s.covers(4));
        assert!(s.covers(6));
        assert!(!s.covers(7));

        assert!(s.overlaps(&span(6, 4)));
        assert!(!s.overlaps(&span(7, 4)));
        assert!(!s.overlaps(&span(0, 4)));
        assert_eq!(span(0, 0).duration, 1, "zero durations become one beat");
    }

    #[test]
    fn right_edge_resize_clamps() {
        let mut s = span(10, 2);
        s.resize(ResizeEdge::Right, 14);
        assert_eq!((s.start_beat, s.duration), (10, 4));

        s.resize(ResizeEdge::Right, 40);
        assert_eq!(s.duration, 6, "can't run past the end of the section");

        s.resize(ResizeEdge::Right, 3);
        assert_eq!(s.duration, 1, "can't shrink below one beat");
    }

    #[test]
    fn left_edge_resize_keeps_right_boundary() {
        let mut s = span(4, 4);
        s.resize(ResizeEdge::Left, 2);
        assert_eq!((s.start_beat, s.duration), (2, 6));

        s.resize(ResizeEdge::Left, -5);
        assert_eq!((s.start_beat, s.duration), (0, 8));

        s.resize(ResizeEdge::Left, 12);
        assert_eq!((s.start_beat, s.duration), (7, 1), "stops one beat short of the end");
    }

    #[test]
    fn resize_never_leaves_the_section() {
        for start in 0..BEATS_PER_SECTION {
            for duration in 1..=(BEATS_PER_SECTION - start) {
                for edge in ResizeEdge::iter() {
                    for boundary in -20..40 {
                        let mut s = span(start, duration);
                        s.resize(edge, boundary);
                        assert_ge!(s.duration, 1);
                        assert_le!(s.end_beat(), BEATS_PER_SECTION);
                    }
                }
            }
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_string(&span(2, 3)).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"C","startBeat":2,"duration":3}"#);
    }
}
