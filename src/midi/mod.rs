// Copyright (c) 2024 Mike Tsao

//! Standard MIDI File export.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{MidiEncoder, MidiEncoderBuilder, MidiExport};
}

pub use encoder::{encode_vlq, MidiEncoder, MidiEncoderBuilder, MAX_VLQ};
pub use export::MidiExport;

mod encoder;
mod export;
