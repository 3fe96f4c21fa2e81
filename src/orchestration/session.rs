// Copyright (c) 2024 Mike Tsao

use super::{JsonFilePlaylistStore, MemoryPlaylistStore, Playlist, PlaylistStore};
use crate::{
    composition::{ChordSpan, Progression, ResizeEdge, Section, Timeline},
    midi::{MidiEncoder, MidiExport},
    playback::{PlaybackCursor, PlaysAudio, ProvidesTimeline, Tick, TimelineSnapshot, Transport},
    theory::{ResolvesPitches, TriadResolver},
    types::{PlaylistUid, SectionUid, SpanUid, Tempo, UidFactories, BEATS_PER_SECTION},
    util::{Rng, Settings},
};
use derivative::Derivative;
use log::{error, info};

/// The span the user has open for editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditTarget {
    #[allow(missing_docs)]
    pub section_index: usize,
    #[allow(missing_docs)]
    pub span_id: SpanUid,
}

/// An edge drag in progress. The span's geometry at the start of the drag is
/// kept so that every step is computed from it rather than accumulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragState {
    #[allow(missing_docs)]
    pub section_index: usize,
    #[allow(missing_docs)]
    pub span_id: SpanUid,
    #[allow(missing_docs)]
    pub edge: ResizeEdge,
    #[allow(missing_docs)]
    pub original_start_beat: usize,
    #[allow(missing_docs)]
    pub original_duration: usize,
}

/// A live editing session: the timeline and tempo being worked on, the
/// transport playing them, and everything the editor remembers between
/// gestures (clipboard, open chord, drag in progress, saved playlists).
///
/// Every operation is total. Indices or ids that don't match anything leave
/// the session unchanged, and the return value says so.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Session {
    settings: Settings,
    uids: UidFactories,

    timeline: Timeline,
    tempo: Tempo,
    transport: Transport,

    clipboard: Option<Vec<ChordSpan>>,
    edit_target: Option<EditTarget>,
    drag: Option<DragState>,

    playlists: Vec<Playlist>,
    store: Box<dyn PlaylistStore>,

    rng: Rng,
    #[derivative(Debug = "ignore")]
    resolver: Box<dyn ResolvesPitches + Send + Sync>,
    encoder: MidiEncoder,
}
impl Default for Session {
    fn default() -> Self {
        Self::new_with(Settings::default(), Box::<MemoryPlaylistStore>::default())
    }
}
impl ProvidesTimeline for Session {
    fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn tempo(&self) -> Tempo {
        self.tempo
    }
}
impl Session {
    /// Starts a session with one empty section at the configured tempo, and
    /// whatever playlists `store` already holds.
    pub fn new_with(settings: Settings, store: Box<dyn PlaylistStore>) -> Self {
        let uids = UidFactories::default();
        let playlists = store.load().unwrap_or_default();
        playlists
            .iter()
            .for_each(|p| uids.playlists.notify_externally_minted_uid(&p.id));

        Self {
            timeline: Timeline::new_with(&uids),
            tempo: settings.default_bpm(),
            transport: Transport::new_with_volume(settings.chord_volume()),
            clipboard: None,
            edit_target: None,
            drag: None,
            playlists,
            store,
            rng: Rng::default(),
            resolver: Box::<TriadResolver>::default(),
            encoder: MidiEncoder::default(),
            settings,
            uids,
        }
    }

    /// Starts a session whose playlists live in the settings' playlist
    /// directory.
    pub fn new_from_settings(settings: Settings) -> Self {
        let store = JsonFilePlaylistStore::new_in_dir(&settings.playlist_directory());
        Self::new_with(settings, Box::new(store))
    }

    /// Replaces the random source used by shuffle and generate.
    pub fn with_rng(mut self, rng: Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Replaces the chord-to-pitch strategy used for playback and export.
    pub fn with_resolver(mut self, resolver: Box<dyn ResolvesPitches + Send + Sync>) -> Self {
        self.resolver = resolver;
        self
    }

    #[allow(missing_docs)]
    pub fn with_encoder(mut self, encoder: MidiEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[allow(missing_docs)]
    pub fn sections(&self) -> &[Section] {
        self.timeline.sections()
    }

    /// Changes the tempo. Takes effect on the next tick if playing.
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
    }

    // Indices shift under these, so they can't survive structural edits.
    fn forget_gestures(&mut self) {
        self.edit_target = None;
        self.drag = None;
    }

    /// Appends an empty section.
    pub fn add_section(&mut self) -> SectionUid {
        self.timeline.add_section(&self.uids)
    }

    /// Removes a section. Refuses to remove the last one. Stops playback.
    pub fn remove_section(&mut self, index: usize) -> bool {
        if self.timeline.len() <= 1 || index >= self.timeline.len() {
            return false;
        }
        self.stop_playback();
        self.forget_gestures();
        self.timeline.remove_section(index).is_some()
    }

    /// Inserts a copy of the section (with new ids) right after it.
    pub fn duplicate_section(&mut self, index: usize) -> Option<SectionUid> {
        let id = self.timeline.duplicate_section(index, &self.uids)?;
        self.forget_gestures();
        Some(id)
    }

    /// Reassigns the section's chord names at random, keeping every span's
    /// position and length.
    pub fn shuffle_section_chords(&mut self, index: usize) -> bool {
        self.timeline.shuffle_section_chords(index, &mut self.rng)
    }

    /// Puts a copy of the section's spans on the clipboard.
    pub fn copy_section(&mut self, index: usize) -> bool {
        if let Some(section) = self.timeline.section(index) {
            self.clipboard = Some(section.chords.clone());
            true
        } else {
            false
        }
    }

    /// Overwrites the section's spans with copies of the clipboard. Does
    /// nothing if the clipboard is empty.
    pub fn paste_section(&mut self, index: usize) -> bool {
        let Some(clipboard) = self.clipboard.as_ref() else {
            return false;
        };
        if index >= self.timeline.len() {
            return false;
        }
        let spans = clipboard
            .iter()
            .map(|c| c.clone_with_id(self.uids.spans.mint_next()))
            .collect();
        self.timeline.replace_section_spans(index, spans)
    }

    #[allow(missing_docs)]
    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Replaces the section's spans with `chords` laid out in equal widths.
    /// Stops playback.
    pub fn apply_progression<S: AsRef<str>>(&mut self, index: usize, chords: &[S]) -> bool {
        if index >= self.timeline.len() {
            return false;
        }
        self.stop_playback();
        self.timeline.apply_progression(index, chords, &self.uids)
    }

    /// Applies a randomly chosen preset progression. Stops playback.
    pub fn generate_chords(&mut self, index: usize) -> Option<&'static Progression> {
        if index >= self.timeline.len() {
            return None;
        }
        let progression = Progression::random(&mut self.rng);
        info!(
            "Generating {} ({}) in section {index}",
            progression.name, progression.label
        );
        self.apply_progression(index, progression.chords);
        Some(progression)
    }

    /// Opens the span covering `beat` for editing. If none does, first places
    /// a one-beat span of the default chord there. Returns a copy of the
    /// opened span.
    pub fn add_or_edit_chord(&mut self, section_index: usize, beat: usize) -> Option<ChordSpan> {
        if beat >= BEATS_PER_SECTION {
            return None;
        }
        let section = self.timeline.section_mut(section_index)?;
        let span = if let Some(existing) = section.span_covering(beat) {
            existing.clone()
        } else {
            let span = ChordSpan::new_with(
                self.uids.spans.mint_next(),
                self.settings.default_chord_name(),
                beat,
                1,
            );
            section.chords.push(span.clone());
            span
        };
        self.edit_target = Some(EditTarget {
            section_index,
            span_id: span.id,
        });
        Some(span)
    }

    #[allow(missing_docs)]
    pub fn edit_target(&self) -> Option<EditTarget> {
        self.edit_target
    }

    /// The span currently open for editing.
    pub fn editing_span(&self) -> Option<&ChordSpan> {
        let target = self.edit_target?;
        self.timeline
            .section(target.section_index)?
            .span(target.span_id)
    }

    /// Replaces the span with the same id in the open section, then closes
    /// the editor.
    pub fn update_chord(&mut self, span: ChordSpan) -> bool {
        let Some(target) = self.edit_target.take() else {
            return false;
        };
        let span = ChordSpan {
            duration: span.duration.max(1),
            ..span
        };
        self.timeline
            .section_mut(target.section_index)
            .map(|s| s.replace_span(span))
            .unwrap_or_default()
    }

    /// Removes the span with `id` from the open section, then closes the
    /// editor.
    pub fn delete_chord(&mut self, id: SpanUid) -> bool {
        let Some(target) = self.edit_target.take() else {
            return false;
        };
        self.timeline
            .section_mut(target.section_index)
            .and_then(|s| s.remove_span(id))
            .is_some()
    }

    /// Closes the editor without changing anything.
    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
    }

    /// Moves one edge of a span to `new_boundary`. See [ChordSpan::resize()].
    pub fn resize_span(
        &mut self,
        section_index: usize,
        id: SpanUid,
        edge: ResizeEdge,
        new_boundary: isize,
    ) -> bool {
        if let Some(span) = self
            .timeline
            .section_mut(section_index)
            .and_then(|s| s.span_mut(id))
        {
            span.resize(edge, new_boundary);
            true
        } else {
            false
        }
    }

    /// Starts dragging an edge of a span.
    pub fn begin_drag(&mut self, section_index: usize, id: SpanUid, edge: ResizeEdge) -> bool {
        let Some(span) = self
            .timeline
            .section(section_index)
            .and_then(|s| s.span(id))
        else {
            return false;
        };
        self.drag = Some(DragState {
            section_index,
            span_id: id,
            edge,
            original_start_beat: span.start_beat,
            original_duration: span.duration,
        });
        true
    }

    /// Moves the dragged edge `delta_beats` away from where it was when the
    /// drag began.
    pub fn drag_by(&mut self, delta_beats: isize) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let Some(span) = self
            .timeline
            .section_mut(drag.section_index)
            .and_then(|s| s.span_mut(drag.span_id))
        else {
            return false;
        };
        span.start_beat = drag.original_start_beat;
        span.duration = drag.original_duration;
        let original_boundary = match drag.edge {
            ResizeEdge::Left => drag.original_start_beat,
            ResizeEdge::Right => drag.original_start_beat + drag.original_duration,
        };
        span.resize(drag.edge, original_boundary as isize + delta_beats);
        true
    }

    /// Finishes the drag, keeping wherever the edge ended up.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    #[allow(missing_docs)]
    pub fn drag_state(&self) -> Option<DragState> {
        self.drag
    }

    #[allow(missing_docs)]
    pub fn cursor(&self) -> &PlaybackCursor {
        self.transport.cursor()
    }

    #[allow(missing_docs)]
    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// The play button. If stopped, prepares `sink`, starts from the top,
    /// and plays the first beat right away. If playing, stops.
    pub fn toggle_playback(&mut self, sink: &mut dyn PlaysAudio) -> Option<Tick> {
        if self.transport.is_playing() {
            self.stop_playback();
            None
        } else {
            sink.init();
            self.transport.play();
            self.tick(sink)
        }
    }

    /// Plays the next beat. The caller schedules the following tick after
    /// [Tick::next_delay].
    pub fn tick(&mut self, sink: &mut dyn PlaysAudio) -> Option<Tick> {
        let snapshot = TimelineSnapshot {
            timeline: &self.timeline,
            tempo: self.tempo,
        };
        self.transport.tick(&snapshot, self.resolver.as_ref(), sink)
    }

    #[allow(missing_docs)]
    pub fn stop_playback(&mut self) {
        self.transport.stop();
    }

    #[allow(missing_docs)]
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    #[allow(missing_docs)]
    pub fn playlist(&self, id: PlaylistUid) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    // Snapshot of the live timeline for a playlist. Sections get new ids;
    // spans keep theirs.
    fn snapshot_sections(&self) -> Vec<Section> {
        self.timeline
            .sections()
            .iter()
            .map(|s| Section {
                id: self.uids.sections.mint_next(),
                chords: s.chords.clone(),
            })
            .collect()
    }

    fn persist_playlists(&mut self) {
        if let Err(e) = self.store.save(&self.playlists) {
            error!("Couldn't save playlists: {e:?}");
        }
    }

    /// Saves the timeline and tempo as a new playlist. Blank names are
    /// refused.
    pub fn save_as_playlist(&mut self, name: &str) -> Option<PlaylistUid> {
        if name.trim().is_empty() {
            return None;
        }
        let playlist = Playlist::new_with(
            self.uids.playlists.mint_next(),
            name,
            self.tempo,
            self.snapshot_sections(),
        );
        let id = playlist.id;
        info!("Saving playlist {id} '{}'", playlist.name);
        self.playlists.push(playlist);
        self.persist_playlists();
        Some(id)
    }

    /// Replaces the timeline and tempo with the playlist's. Stops playback.
    pub fn load_playlist(&mut self, id: PlaylistUid) -> bool {
        let Some(playlist) = self.playlists.iter().find(|p| p.id == id) else {
            return false;
        };
        info!("Loading playlist {id} '{}'", playlist.name);
        let tempo = playlist.bpm;
        let sections = Timeline::sections_with_fresh_ids(&playlist.sections, &self.uids);

        self.stop_playback();
        self.forget_gestures();
        self.tempo = tempo;
        self.timeline = Timeline::from_sections(sections, &self.uids);
        true
    }

    /// Overwrites a saved playlist with the current timeline and tempo.
    pub fn update_playlist(&mut self, id: PlaylistUid) -> bool {
        let sections = self.snapshot_sections();
        let tempo = self.tempo;
        let Some(playlist) = self.playlists.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        info!("Updating playlist {id} '{}'", playlist.name);
        playlist.overwrite(tempo, sections);
        self.persist_playlists();
        true
    }

    #[allow(missing_docs)]
    pub fn delete_playlist(&mut self, id: PlaylistUid) -> bool {
        let before = self.playlists.len();
        self.playlists.retain(|p| p.id != id);
        if self.playlists.len() == before {
            return false;
        }
        info!("Deleted playlist {id}");
        self.persist_playlists();
        true
    }

    /// Encodes every section as one MIDI track at the current tempo.
    pub fn export_midi(&self) -> MidiExport {
        MidiExport::new_with(
            &self.timeline,
            self.tempo,
            self.resolver.as_ref(),
            &self.encoder,
        )
    }
}
