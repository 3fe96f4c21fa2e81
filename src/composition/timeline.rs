// Copyright (c) 2024 Mike Tsao

use super::{ChordSpan, Section};
use crate::{
    types::{BeatPosition, SectionUid, UidFactories, BEATS_PER_SECTION},
    util::Rng,
};

/// The song: an ordered, never-empty list of [Section]s.
///
/// Every method here is total. Indices that don't name a section make the
/// operation a no-op, reported through the `bool` or [Option] return value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeline {
    sections: Vec<Section>,
}
impl Timeline {
    /// A timeline with a single empty section.
    pub fn new_with(uids: &UidFactories) -> Self {
        Self {
            sections: vec![Section::new_with(uids.sections.mint_next())],
        }
    }

    /// Adopts the given sections as-is. An empty list gets one empty section
    /// so the timeline is never empty.
    pub fn from_sections(sections: Vec<Section>, uids: &UidFactories) -> Self {
        if sections.is_empty() {
            Self::new_with(uids)
        } else {
            Self { sections }
        }
    }

    /// Deep copies `sections`, minting new ids for everything.
    pub fn sections_with_fresh_ids(sections: &[Section], uids: &UidFactories) -> Vec<Section> {
        sections
            .iter()
            .map(|s| Section {
                id: uids.sections.mint_next(),
                chords: s.spans_with_fresh_ids(&uids.spans),
            })
            .collect()
    }

    #[allow(missing_docs)]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[allow(missing_docs)]
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[allow(missing_docs)]
    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Number of sections. Never zero.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; present for API symmetry with [Timeline::len()].
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of addressable beats across all sections.
    pub fn total_beats(&self) -> usize {
        self.sections.len() * BEATS_PER_SECTION
    }

    /// Whether any section holds at least one chord.
    pub fn has_chords(&self) -> bool {
        self.sections.iter().any(|s| !s.is_empty())
    }

    /// The span that starts at the given global beat, if any.
    pub fn span_starting_at(&self, position: BeatPosition) -> Option<&ChordSpan> {
        self.section(position.section_index)?
            .span_starting_at(position.beat_in_section)
    }


    /// Every span, with its start beat offset into global beats, in section
    /// order. This is what the MIDI encoder consumes.
    pub fn flatten(&self) -> Vec<ChordSpan> {
        self.sections
            .iter()
            .enumerate()
            .flat_map(|(i, s)| {
                s.chords.iter().map(move |c| ChordSpan {
                    start_beat: c.start_beat + i * BEATS_PER_SECTION,
                    ..c.clone()
                })
            })
            .collect()
    }

    /// Appends an empty section.
    pub fn add_section(&mut self, uids: &UidFactories) -> SectionUid {
        let section = Section::new_with(uids.sections.mint_next());
        let id = section.id;
        self.sections.push(section);
        id
    }

    /// Removes a section unless it is the last one.
    pub fn remove_section(&mut self, index: usize) -> Option<Section> {
        if self.sections.len() <= 1 || index >= self.sections.len() {
            return None;
        }
        Some(self.sections.remove(index))
    }

    /// Inserts a deep copy of the section right after it.
    pub fn duplicate_section(&mut self, index: usize, uids: &UidFactories) -> Option<SectionUid> {
        let original = self.sections.get(index)?;
        let copy = Section {
            id: uids.sections.mint_next(),
            chords: original.spans_with_fresh_ids(&uids.spans),
        };
        let id = copy.id;
        self.sections.insert(index + 1, copy);
        Some(id)
    }

    /// Randomly reassigns the chord names among the section's spans. Every
    /// span keeps its position and length.
    pub fn shuffle_section_chords(&mut self, index: usize, rng: &mut Rng) -> bool {
        let Some(section) = self.sections.get_mut(index) else {
            return false;
        };
        if section.is_empty() {
            return false;
        }
        let mut names: Vec<String> = section.chords.iter().map(|c| c.name.clone()).collect();
        rng.shuffle(&mut names);
        section
            .chords
            .iter_mut()
            .zip(names)
            .for_each(|(chord, name)| chord.name = name);
        true
    }

    /// Replaces the section's spans wholesale.
    pub fn replace_section_spans(&mut self, index: usize, spans: Vec<ChordSpan>) -> bool {
        if let Some(section) = self.sections.get_mut(index) {
            section.chords = spans;
            true
        } else {
            false
        }
    }

    /// Lays `chords` into the section as equal-width, back-to-back spans
    /// starting at beat zero. Width is `BEATS_PER_SECTION / chords.len()`,
    /// rounded down; leftover beats at the end stay empty. An empty list
    /// clears the section, and anything past the sixteenth chord is dropped.
    pub fn apply_progression<S: AsRef<str>>(
        &mut self,
        index: usize,
        chords: &[S],
        uids: &UidFactories,
    ) -> bool {
        if index >= self.sections.len() {
            return false;
        }
        let chords = &chords[..chords.len().min(BEATS_PER_SECTION)];
        let width = if chords.is_empty() {
            0
        } else {
            BEATS_PER_SECTION / chords.len()
        };
        let spans = chords
            .iter()
            .enumerate()
            .map(|(i, name)| {
                ChordSpan::new_with(uids.spans.mint_next(), name.as_ref(), i * width, width)
            })
            .collect();
        self.replace_section_spans(index, spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts_and_widths(t: &Timeline, index: usize) -> Vec<(String, usize, usize)> {
        t.section(index)
            .unwrap()
            .chords
            .iter()
            .map(|c| (c.name.clone(), c.start_beat, c.duration))
            .collect()
    }

    #[test]
    fn starts_with_one_section() {
        let uids = UidFactories::default();
        let t = Timeline::new_with(&uids);
        assert_eq!(t.len(), 1);
        assert_eq!(t.total_beats(), 16);
        assert!(!t.has_chords());

        let t = Timeline::from_sections(Vec::default(), &uids);
        assert_eq!(t.len(), 1, "never empty");
    }

    #[test]
    fn last_section_cannot_be_removed() {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        let before = t.clone();
        assert!(t.remove_section(0).is_none());
        assert_eq!(t, before);

        t.add_section(&uids);
        assert!(t.remove_section(5).is_none());
        assert!(t.remove_section(0).is_some());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn apply_progression_lays_equal_widths() {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        assert!(t.apply_progression(0, &["C", "G", "Am", "F"], &uids));
        assert_eq!(
            starts_and_widths(&t, 0),
            vec![
                ("C".to_string(), 0, 4),
                ("G".to_string(), 4, 4),
                ("Am".to_string(), 8, 4),
                ("F".to_string(), 12, 4)
            ]
        );

        // 16 / 5 = 3, leaving beat 15 empty.
        assert!(t.apply_progression(0, &["C", "G", "Am", "Em", "F"], &uids));
        let spans = starts_and_widths(&t, 0);
        assert_eq!(spans.len(), 5);
        assert_eq!(spans[4], ("F".to_string(), 12, 3));
        assert!(t.section(0).unwrap().span_covering(15).is_none());

        let too_many: Vec<String> = (0..20).map(|i| format!("C{i}")).collect();
        assert!(t.apply_progression(0, &too_many, &uids));
        assert_eq!(t.section(0).unwrap().chords.len(), 16);
        assert!(t.section(0).unwrap().chords.iter().all(|c| c.duration == 1));

        let none: [&str; 0] = [];
        assert!(t.apply_progression(0, &none, &uids));
        assert!(t.section(0).unwrap().is_empty());

        assert!(!t.apply_progression(3, &["C"], &uids));
    }

    #[test]
    fn duplicate_inserts_after_with_fresh_ids() {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        t.add_section(&uids);
        t.apply_progression(0, &["C", "G"], &uids);

        let new_id = t.duplicate_section(0, &uids).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.section(1).unwrap().id, new_id);
        assert_eq!(starts_and_widths(&t, 0), starts_and_widths(&t, 1));
        let original_ids: Vec<_> = t.section(0).unwrap().chords.iter().map(|c| c.id).collect();
        assert!(t
            .section(1)
            .unwrap()
            .chords
            .iter()
            .all(|c| !original_ids.contains(&c.id)));
        assert!(t.section(2).unwrap().is_empty());

        assert!(t.duplicate_section(7, &uids).is_none());
    }

    #[test]
    fn shuffle_moves_names_only() {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        let mut rng = Rng::new_with_seed(1234);
        assert!(!t.shuffle_section_chords(0, &mut rng), "empty section");

        let names = ["C", "D", "E", "F", "G", "A", "B", "Bb"];
        t.apply_progression(0, &names, &uids);
        let before = starts_and_widths(&t, 0);
        assert!(t.shuffle_section_chords(0, &mut rng));
        let after = starts_and_widths(&t, 0);

        let positions = |v: &Vec<(String, usize, usize)>| -> Vec<(usize, usize)> {
            v.iter().map(|(_, s, d)| (*s, *d)).collect()
        };
        assert_eq!(positions(&before), positions(&after));
        let mut sorted_after: Vec<String> = after.iter().map(|(n, _, _)| n.clone()).collect();
        sorted_after.sort();
        let mut sorted_before: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        sorted_before.sort();
        assert_eq!(sorted_after, sorted_before);
    }

    #[test]
    fn flatten_offsets_by_section() {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        t.add_section(&uids);
        t.apply_progression(0, &["C"], &uids);
        t.apply_progression(1, &["G", "F"], &uids);

        let flat: Vec<(String, usize, usize)> = t
            .flatten()
            .into_iter()
            .map(|c| (c.name, c.start_beat, c.duration))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("C".to_string(), 0, 16),
                ("G".to_string(), 16, 8),
                ("F".to_string(), 24, 8)
            ]
        );
        assert_eq!(
            t.span_starting_at(BeatPosition::from_global_beat(24))
                .map(|c| c.name.as_str()),
            Some("F")
        );
    }

    #[test]
    fn fresh_id_copy_is_independent() {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        t.apply_progression(0, &["C", "G"], &uids);
        let mut copy = Timeline::from_sections(
            Timeline::sections_with_fresh_ids(t.sections(), &uids),
            &uids,
        );
        assert_ne!(copy.section(0).unwrap().id, t.section(0).unwrap().id);
        assert_ne!(
            copy.section(0).unwrap().chords[0].id,
            t.section(0).unwrap().chords[0].id
        );

        copy.section_mut(0).unwrap().chords[0].name = "Dm".to_string();
        assert_eq!(t.section(0).unwrap().chords[0].name, "C");
    }
}
