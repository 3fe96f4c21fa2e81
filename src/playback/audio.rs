// Copyright (c) 2024 Mike Tsao

use crate::types::PitchName;
use log::trace;

/// Something that can make sound from pitch names. The transport hands each
/// triggered chord to one of these and doesn't wait for it.
pub trait PlaysAudio {
    /// Prepares the sink. Called before the first note of a performance, and
    /// possibly more than once, so implementations must be idempotent.
    fn init(&mut self) {}

    /// Plays a single pitch for the given number of seconds.
    fn play_note(&mut self, pitch: &PitchName, seconds: f64);

    /// Plays several pitches together. The default plays each one with
    /// [PlaysAudio::play_note()] and ignores `volume`.
    #[allow(unused_variables)]
    fn play_chord(&mut self, pitches: &[PitchName], volume: f32, seconds: f64) {
        pitches.iter().for_each(|p| self.play_note(p, seconds));
    }
}

/// What a [RecordingAudioSink] heard.
#[derive(Clone, Debug, PartialEq)]
pub enum AudioSinkCall {
    #[allow(missing_docs)]
    Note { pitch: PitchName, seconds: f64 },
    #[allow(missing_docs)]
    Chord {
        pitches: Vec<PitchName>,
        volume: f32,
        seconds: f64,
    },
}

/// Records every call instead of playing it. Handy for tests and for
/// dry-running a timeline.
#[derive(Debug, Default)]
pub struct RecordingAudioSink {
    init_count: usize,
    calls: Vec<AudioSinkCall>,
}
impl PlaysAudio for RecordingAudioSink {
    fn init(&mut self) {
        self.init_count += 1;
    }

    fn play_note(&mut self, pitch: &PitchName, seconds: f64) {
        self.calls.push(AudioSinkCall::Note {
            pitch: pitch.clone(),
            seconds,
        });
    }

    fn play_chord(&mut self, pitches: &[PitchName], volume: f32, seconds: f64) {
        self.calls.push(AudioSinkCall::Chord {
            pitches: pitches.to_vec(),
            volume,
            seconds,
        });
    }
}
impl RecordingAudioSink {
    /// How many times [PlaysAudio::init()] was called.
    pub fn init_count(&self) -> usize {
        self.init_count
    }

    #[allow(missing_docs)]
    pub fn calls(&self) -> &[AudioSinkCall] {
        &self.calls
    }

    /// Returns and forgets everything recorded so far.
    pub fn take_calls(&mut self) -> Vec<AudioSinkCall> {
        core::mem::take(&mut self.calls)
    }
}

/// Discards everything (after logging it at trace level).
#[derive(Debug, Default)]
pub struct SilentAudioSink {}
impl PlaysAudio for SilentAudioSink {
    fn play_note(&mut self, pitch: &PitchName, seconds: f64) {
        trace!("(silently) playing {pitch} for {seconds:.3}s");
    }
}
