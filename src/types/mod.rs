// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        BeatPosition, PitchClass, PitchName, PlaylistUid, SectionUid, SpanUid, Tempo,
        UidFactories, BEATS_PER_MEASURE, BEATS_PER_SECTION,
    };
}

pub use {
    pitch::{PitchClass, PitchName},
    time::{BeatPosition, Tempo, BEATS_PER_MEASURE, BEATS_PER_SECTION, MEASURES_PER_SECTION},
    uid::{
        IsUid, PlaylistUid, PlaylistUidFactory, SectionUid, SectionUidFactory, SpanUid,
        SpanUidFactory, UidFactories, UidFactory,
    },
};

mod pitch;
mod time;
mod uid;
