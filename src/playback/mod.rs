// Copyright (c) 2024 Mike Tsao

//! Beat-by-beat playback of a [Timeline](crate::composition::Timeline)
//! through a pluggable audio sink.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{PlaysAudio, ProvidesTimeline, Tick, Transport};
}

pub use audio::{AudioSinkCall, PlaysAudio, RecordingAudioSink, SilentAudioSink};
pub use transport::{
    PlaybackCursor, ProvidesTimeline, Tick, TimelineSnapshot, Transport, TriggeredChord,
};

mod audio;
mod transport;
