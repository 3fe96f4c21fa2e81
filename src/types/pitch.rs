// Copyright (c) 2024 Mike Tsao

use core::fmt;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter, FromRepr, IntoStaticStr};

/// The twelve pitch classes of the chromatic scale, anchored at C = 0 and
/// spelled with sharps.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter, FromRepr, IntoStaticStr,
)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum PitchClass {
    #[strum(to_string = "C")]
    C = 0,
    #[strum(to_string = "C#")]
    CSharp,
    #[strum(to_string = "D")]
    D,
    #[strum(to_string = "D#")]
    DSharp,
    #[strum(to_string = "E")]
    E,
    #[strum(to_string = "F")]
    F,
    #[strum(to_string = "F#")]
    FSharp,
    #[strum(to_string = "G")]
    G,
    #[strum(to_string = "G#")]
    GSharp,
    #[strum(to_string = "A")]
    A,
    #[strum(to_string = "A#")]
    ASharp,
    #[strum(to_string = "B")]
    B,
}
impl PitchClass {
    /// Looks up a spelled note in the sharp-based chromatic scale. Flat
    /// spellings are first normalized to their sharp equivalents. Spellings
    /// outside that table (like `Cb` or `E#`) aren't found.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        let normalized = match spelling {
            "Db" | "D♭" | "C♯" => "C#",
            "Eb" | "E♭" | "D♯" => "D#",
            "Gb" | "G♭" | "F♯" => "F#",
            "Ab" | "A♭" | "G♯" => "G#",
            "Bb" | "B♭" | "A♯" => "A#",
            other => other,
        };
        match normalized {
            "C" => Some(Self::C),
            "C#" => Some(Self::CSharp),
            "D" => Some(Self::D),
            "D#" => Some(Self::DSharp),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            "F#" => Some(Self::FSharp),
            "G" => Some(Self::G),
            "G#" => Some(Self::GSharp),
            "A" => Some(Self::A),
            "A#" => Some(Self::ASharp),
            "B" => Some(Self::B),
            _ => None,
        }
    }

    /// Moves up by the given number of semitones, wrapping at the octave.
    pub fn transposed(&self, semitones: u8) -> Self {
        let index = (*self as u8 + semitones) % 12;
        // from_repr() can't fail for values below 12.
        Self::from_repr(index).unwrap_or(Self::C)
    }

    /// The sharp-based spelling.
    pub fn spelling(&self) -> &'static str {
        self.into()
    }
}

/// The name of a single pitch, as produced by the chord resolver and consumed
/// by audio sinks and the MIDI encoder. Roots keep their original spelling,
/// so a `PitchName` can be a flat (`Bb`) as well as a sharp.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchName(String);
impl PitchName {
    /// MIDI note used for any name outside the lookup table.
    pub const DEFAULT_MIDI_NOTE: u8 = 60;

    #[allow(missing_docs)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Maps this name onto a single octave starting at middle C (C = 60 …
    /// B = 71). Flats share the number of their sharp equivalent. Anything
    /// else maps to middle C.
    pub fn midi_note(&self) -> u8 {
        match self.0.as_str() {
            "C" => 60,
            "C#" | "Db" => 61,
            "D" => 62,
            "D#" | "Eb" => 63,
            "E" => 64,
            "F" => 65,
            "F#" | "Gb" => 66,
            "G" => 67,
            "G#" | "Ab" => 68,
            "A" => 69,
            "A#" | "Bb" => 70,
            "B" => 71,
            _ => Self::DEFAULT_MIDI_NOTE,
        }
    }
}
impl fmt::Display for PitchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
impl From<&str> for PitchName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
impl From<String> for PitchName {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl From<PitchClass> for PitchName {
    fn from(value: PitchClass) -> Self {
        Self::from(value.spelling())
    }
}
impl PartialEq<&str> for PitchName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
