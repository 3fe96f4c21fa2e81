// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Chordline is a chord sequencer: it keeps an editable timeline of chords,
//! plays it back in time, and exports it as a Standard MIDI File.
//!
//! * A [Timeline](composition::Timeline) is a list of 16-beat
//! [Section](composition::Section)s, each holding
//! [ChordSpan](composition::ChordSpan)s.
//! * A [Session](orchestration::Session) wraps a timeline with everything an
//! editor needs: tempo, clipboard, the chord being edited, edge drags, saved
//! [Playlist](orchestration::Playlist)s, and a
//! [Transport](playback::Transport).
//! * The transport turns chords into sound through any
//! [PlaysAudio](playback::PlaysAudio) sink, one
//! [tick](orchestration::Session::tick()) per beat. Whoever drives it decides
//! how to wait between ticks; the `chordline-services` crate has a thread that
//! does this on a real clock.
//! * [MidiEncoder](midi::MidiEncoder) writes the timeline out as a format-0
//! MIDI file.

/// A collection of imports that are useful to users of this crate. `use
/// chordline::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        composition::prelude::*, midi::prelude::*, orchestration::prelude::*,
        playback::prelude::*, theory::prelude::*, types::prelude::*, util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {composition::Timeline, orchestration::Session, playback::Transport};

pub mod composition;
pub mod midi;
pub mod orchestration;
pub mod playback;
pub mod theory;
pub mod types;
pub mod util;
