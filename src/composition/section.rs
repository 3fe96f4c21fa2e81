// Copyright (c) 2024 Mike Tsao

use super::ChordSpan;
use crate::types::{SectionUid, SpanUid, SpanUidFactory, BEATS_PER_SECTION};
use serde::{Deserialize, Serialize};

/// A fixed-length block of the timeline: [BEATS_PER_SECTION] beats holding
/// [ChordSpan]s in the order they were added.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[allow(missing_docs)]
    pub id: SectionUid,
    /// The placed chords. Order is insertion order, not beat order.
    pub chords: Vec<ChordSpan>,
}
impl Section {
    /// An empty section.
    pub fn new_with(id: SectionUid) -> Self {
        Self {
            id,
            chords: Vec::default(),
        }
    }

    /// Always [BEATS_PER_SECTION].
    pub const fn beat_count(&self) -> usize {
        BEATS_PER_SECTION
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// The first span (in insertion order) that covers `beat`.
    pub fn span_covering(&self, beat: usize) -> Option<&ChordSpan> {
        self.chords.iter().find(|c| c.covers(beat))
    }

    /// The first span (in insertion order) that starts exactly on `beat`.
    /// This is what the transport plays.
    pub fn span_starting_at(&self, beat: usize) -> Option<&ChordSpan> {
        self.chords.iter().find(|c| c.start_beat == beat)
    }

    #[allow(missing_docs)]
    pub fn span(&self, id: SpanUid) -> Option<&ChordSpan> {
        self.chords.iter().find(|c| c.id == id)
    }

    #[allow(missing_docs)]
    pub fn span_mut(&mut self, id: SpanUid) -> Option<&mut ChordSpan> {
        self.chords.iter_mut().find(|c| c.id == id)
    }

    /// Replaces the span that has the same id as `span`. Returns whether
    /// anything was replaced.
    pub fn replace_span(&mut self, span: ChordSpan) -> bool {
        if let Some(existing) = self.span_mut(span.id) {
            *existing = span;
            true
        } else {
            false
        }
    }

    /// Removes the span with the given id, if present.
    pub fn remove_span(&mut self, id: SpanUid) -> Option<ChordSpan> {
        let index = self.chords.iter().position(|c| c.id == id)?;
        Some(self.chords.remove(index))
    }

    /// Copies of this section's spans, each with a freshly minted id.
    pub fn spans_with_fresh_ids(&self, uid_factory: &SpanUidFactory) -> Vec<ChordSpan> {
        self.chords
            .iter()
            .map(|c| c.clone_with_id(uid_factory.mint_next()))
            .collect()
    }

    /// Whether any two spans share a beat. Resizing can produce this.
    pub fn has_overlaps(&self) -> bool {
        self.chords.iter().enumerate().any(|(i, a)| {
            self.chords
                .iter()
                .skip(i + 1)
                .any(|b| a.overlaps(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section() -> Section {
        let mut s = Section::new_with(SectionUid(1));
        s.chords.push(ChordSpan::new_with(SpanUid(1), "C", 0, 4));
        s.chords.push(ChordSpan::new_with(SpanUid(2), "G", 8, 2));
        s
    }

    #[test]
    fn lookups() {
        let s = section();
        assert_eq!(s.beat_count(), 16);
        assert_eq!(s.span_covering(3).map(|c| c.id), Some(SpanUid(1)));
        assert!(s.span_covering(4).is_none());
        assert_eq!(s.span_covering(9).map(|c| c.id), Some(SpanUid(2)));
        assert_eq!(s.span_starting_at(8).map(|c| c.id), Some(SpanUid(2)));
        assert!(s.span_starting_at(9).is_none());
    }

    #[test]
    fn replace_and_remove() {
        let mut s = section();
        let mut g = s.span(SpanUid(2)).unwrap().clone();
        g.name = "Gm".to_string();
        assert!(s.replace_span(g));
        assert_eq!(s.span(SpanUid(2)).unwrap().name, "Gm");
        assert!(!s.replace_span(ChordSpan::new_with(SpanUid(99), "D", 0, 1)));

        assert!(s.remove_span(SpanUid(1)).is_some());
        assert!(s.remove_span(SpanUid(1)).is_none());
        assert_eq!(s.chords.len(), 1);
    }

    #[test]
    fn fresh_ids() {
        let s = section();
        let factory = SpanUidFactory::default();
        factory.notify_externally_minted_uid(&SpanUid(2));
        let copies = s.spans_with_fresh_ids(&factory);
        assert_eq!(copies.len(), 2);
        assert!(copies.iter().all(|c| c.id != SpanUid(1) && c.id != SpanUid(2)));
        assert_eq!(copies[1].name, "G");
        assert_eq!(copies[1].start_beat, 8);
    }

    #[test]
    fn overlap_detection() {
        let mut s = section();
        assert!(!s.has_overlaps());
        s.chords.push(ChordSpan::new_with(SpanUid(3), "F", 3, 2));
        assert!(s.has_overlaps());
    }
}
