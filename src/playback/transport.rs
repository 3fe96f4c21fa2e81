// Copyright (c) 2024 Mike Tsao

use super::PlaysAudio;
use crate::{
    composition::Timeline,
    theory::ResolvesPitches,
    types::{BeatPosition, PitchName, Tempo},
};
use core::time::Duration;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Read-only access to whatever the transport should be playing. The
/// transport asks again on every tick, so edits and tempo changes made
/// between ticks are picked up on the next one.
pub trait ProvidesTimeline {
    #[allow(missing_docs)]
    fn timeline(&self) -> &Timeline;
    #[allow(missing_docs)]
    fn tempo(&self) -> Tempo;
}

/// A borrowed `(timeline, tempo)` pair, for callers that own the two
/// separately.
#[derive(Clone, Copy, Debug)]
pub struct TimelineSnapshot<'a> {
    #[allow(missing_docs)]
    pub timeline: &'a Timeline,
    #[allow(missing_docs)]
    pub tempo: Tempo,
}
impl<'a> ProvidesTimeline for TimelineSnapshot<'a> {
    fn timeline(&self) -> &Timeline {
        self.timeline
    }

    fn tempo(&self) -> Tempo {
        self.tempo
    }
}

/// Where playback is. Transient: never saved, and reset whenever playback
/// stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackCursor {
    /// Whether the transport is running.
    pub is_playing: bool,
    /// The next beat to be played, counted across all sections.
    pub global_beat: usize,
    /// The beat most recently played, for display. [None] when stopped.
    pub position: Option<BeatPosition>,
}

/// A chord that a tick sent to the audio sink.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggeredChord {
    /// The span's chord symbol.
    pub name: String,
    #[allow(missing_docs)]
    pub pitches: Vec<PitchName>,
    /// How long the sink was asked to hold it.
    pub seconds: f64,
}

/// The result of one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// The beat that was just played.
    pub position: BeatPosition,
    /// The chord that started on that beat, if any.
    pub chord: Option<TriggeredChord>,
    /// How long to wait before the next tick, at the tempo read during this
    /// one.
    pub next_delay: Duration,
}

/// The virtual clock that walks the timeline one beat per tick.
///
/// [Transport] doesn't own a timer. Whoever drives it calls
/// [Transport::tick()], then waits [Tick::next_delay] before calling it
/// again. Each tick depends only on the cursor and the snapshot it's given.
#[derive(Clone, Debug, PartialEq)]
pub struct Transport {
    cursor: PlaybackCursor,
    volume: f32,
}
impl Default for Transport {
    fn default() -> Self {
        Self {
            cursor: PlaybackCursor::default(),
            volume: Self::DEFAULT_VOLUME,
        }
    }
}
impl Transport {
    /// Volume passed to [PlaysAudio::play_chord()] unless configured
    /// otherwise.
    pub const DEFAULT_VOLUME: f32 = 0.7;

    #[allow(missing_docs)]
    pub fn new_with_volume(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    #[allow(missing_docs)]
    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    #[allow(missing_docs)]
    pub fn is_playing(&self) -> bool {
        self.cursor.is_playing
    }

    /// The most recently played beat, or [None] when stopped.
    pub fn position(&self) -> Option<BeatPosition> {
        self.cursor.position
    }

    #[allow(missing_docs)]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Starts from the top. There's no resume: playing always begins at
    /// global beat zero.
    pub fn play(&mut self) {
        info!("Transport: play");
        self.cursor = PlaybackCursor {
            is_playing: true,
            global_beat: 0,
            position: None,
        };
    }

    /// Stops and rewinds. Any pending tick should be abandoned by the caller;
    /// if one arrives anyway, it's a no-op.
    pub fn stop(&mut self) {
        if self.cursor.is_playing {
            info!("Transport: stop");
        }
        self.cursor = PlaybackCursor::default();
    }

    /// Plays if stopped, stops if playing. Returns whether it's now playing.
    pub fn toggle(&mut self) -> bool {
        if self.cursor.is_playing {
            self.stop();
        } else {
            self.play();
        }
        self.cursor.is_playing
    }

    /// Plays one beat: whatever span starts on the current beat goes to
    /// `sink`, then the cursor advances, wrapping to zero at the end of the
    /// timeline. Returns [None] if the transport isn't running.
    pub fn tick<P: ProvidesTimeline + ?Sized>(
        &mut self,
        source: &P,
        resolver: &dyn ResolvesPitches,
        sink: &mut dyn PlaysAudio,
    ) -> Option<Tick> {
        if !self.cursor.is_playing {
            return None;
        }
        let timeline = source.timeline();
        let tempo = source.tempo();
        let total_beats = timeline.total_beats();

        let position = BeatPosition::from_global_beat(self.cursor.global_beat);
        self.cursor.position = Some(position);

        let chord = timeline.span_starting_at(position).map(|span| {
            let pitches = resolver.resolve(&span.name);
            let seconds = tempo.seconds_for_beats(span.duration);
            sink.play_chord(&pitches, self.volume, seconds);
            TriggeredChord {
                name: span.name.clone(),
                pitches,
                seconds,
            }
        });
        if let Some(chord) = chord.as_ref() {
            debug!("Transport: {position} plays {} for {:.3}s", chord.name, chord.seconds);
        }

        self.cursor.global_beat += 1;
        if self.cursor.global_beat >= total_beats {
            self.cursor.global_beat = 0;
        }

        Some(Tick {
            position,
            chord,
            next_delay: tempo.beat_interval(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        composition::ChordSpan,
        playback::{AudioSinkCall, RecordingAudioSink},
        theory::TriadResolver,
        types::{SpanUid, UidFactories, BEATS_PER_SECTION},
    };
    use float_cmp::approx_eq;
    use more_asserts::assert_lt;

    fn timeline_with_c_at_zero(sections: usize) -> Timeline {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        for _ in 1..sections {
            t.add_section(&uids);
        }
        t.section_mut(0)
            .unwrap()
            .chords
            .push(ChordSpan::new_with(SpanUid(100), "C", 0, 2));
        t
    }

    #[test]
    fn stopped_transport_does_nothing() {
        let t = timeline_with_c_at_zero(1);
        let mut transport = Transport::default();
        let mut sink = RecordingAudioSink::default();
        let snapshot = TimelineSnapshot {
            timeline: &t,
            tempo: Tempo::default(),
        };
        assert!(transport
            .tick(&snapshot, &TriadResolver::default(), &mut sink)
            .is_none());
        assert!(sink.calls().is_empty());
        assert!(transport.position().is_none());
    }

    #[test]
    fn first_beat_triggers_chord_and_others_do_not() {
        let t = timeline_with_c_at_zero(1);
        let tempo = Tempo::new(120);
        let snapshot = TimelineSnapshot { timeline: &t, tempo };
        let resolver = TriadResolver::default();
        let mut transport = Transport::default();
        let mut sink = RecordingAudioSink::default();

        transport.play();
        let tick = transport.tick(&snapshot, &resolver, &mut sink).unwrap();
        assert_eq!(tick.position, BeatPosition::default());
        assert_eq!(tick.next_delay, Duration::from_millis(500));
        let calls = sink.take_calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            AudioSinkCall::Chord {
                pitches,
                volume,
                seconds,
            } => {
                let names: Vec<&str> = pitches.iter().map(|p| p.as_str()).collect();
                assert_eq!(names, vec!["C", "E", "G"]);
                assert!(approx_eq!(f32, *volume, Transport::DEFAULT_VOLUME));
                assert!(approx_eq!(f64, *seconds, 2.0 * 60.0 / 120.0, ulps = 2));
            }
            other => panic!("unexpected call {other:?}"),
        }

        for beat in 1..BEATS_PER_SECTION {
            let tick = transport.tick(&snapshot, &resolver, &mut sink).unwrap();
            assert_eq!(tick.position.beat_in_section, beat);
            assert!(tick.chord.is_none());
        }
        assert!(sink.calls().is_empty(), "only beat zero starts a chord");
    }

    #[test]
    fn global_beat_wraps_at_total_beats() {
        let t = timeline_with_c_at_zero(2);
        let snapshot = TimelineSnapshot {
            timeline: &t,
            tempo: Tempo::default(),
        };
        let resolver = TriadResolver::default();
        let mut transport = Transport::default();
        let mut sink = RecordingAudioSink::default();

        transport.play();
        let total = t.total_beats();
        for i in 0..total * 3 {
            assert_eq!(transport.cursor().global_beat, i % total);
            let tick = transport.tick(&snapshot, &resolver, &mut sink).unwrap();
            assert_eq!(tick.position.global_beat(), i % total);
            assert_lt!(transport.cursor().global_beat, total);
        }
        assert_eq!(sink.calls().len(), 3, "the one chord plays once per loop");
    }

    #[test]
    fn tempo_changes_apply_on_the_next_tick() {
        let t = timeline_with_c_at_zero(1);
        let resolver = TriadResolver::default();
        let mut transport = Transport::default();
        let mut sink = RecordingAudioSink::default();
        transport.play();

        let slow = TimelineSnapshot {
            timeline: &t,
            tempo: Tempo::new(60),
        };
        let tick = transport.tick(&slow, &resolver, &mut sink).unwrap();
        assert_eq!(tick.next_delay, Duration::from_secs(1));
        assert!(approx_eq!(f64, tick.chord.unwrap().seconds, 2.0, ulps = 2));

        let fast = TimelineSnapshot {
            timeline: &t,
            tempo: Tempo::new(200),
        };
        let tick = transport.tick(&fast, &resolver, &mut sink).unwrap();
        assert_eq!(tick.next_delay, Duration::from_millis(300));
        assert_eq!(tick.position.beat_in_section, 1, "position isn't disturbed");
    }

    #[test]
    fn stop_rewinds_and_toggle_flips() {
        let t = timeline_with_c_at_zero(1);
        let snapshot = TimelineSnapshot {
            timeline: &t,
            tempo: Tempo::default(),
        };
        let resolver = TriadResolver::default();
        let mut transport = Transport::default();
        let mut sink = RecordingAudioSink::default();

        assert!(transport.toggle());
        transport.tick(&snapshot, &resolver, &mut sink);
        transport.tick(&snapshot, &resolver, &mut sink);
        assert_eq!(transport.cursor().global_beat, 2);
        assert!(transport.position().is_some());

        assert!(!transport.toggle());
        assert_eq!(*transport.cursor(), PlaybackCursor::default());

        transport.play();
        assert_eq!(transport.cursor().global_beat, 0, "no resume");
    }

    #[test]
    fn shrinking_timeline_mid_play_still_wraps() {
        let uids = UidFactories::default();
        let mut t = Timeline::new_with(&uids);
        t.add_section(&uids);
        let resolver = TriadResolver::default();
        let mut transport = Transport::default();
        let mut sink = RecordingAudioSink::default();
        transport.play();
        for _ in 0..20 {
            let snapshot = TimelineSnapshot {
                timeline: &t,
                tempo: Tempo::default(),
            };
            transport.tick(&snapshot, &resolver, &mut sink);
        }
        t.remove_section(1);
        let snapshot = TimelineSnapshot {
            timeline: &t,
            tempo: Tempo::default(),
        };
        let tick = transport.tick(&snapshot, &resolver, &mut sink).unwrap();
        assert_eq!(tick.position.section_index, 1, "stale beat plays as silence");
        assert_eq!(transport.cursor().global_beat, 0);
    }
}
