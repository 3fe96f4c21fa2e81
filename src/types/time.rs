// Copyright (c) 2024 Mike Tsao

//! Musical time: tempo, and positions on the beat grid.

use core::{fmt, time::Duration};
use serde::{Deserialize, Serialize};

/// Number of beats in a measure. Sections are laid out in 4/4.
pub const BEATS_PER_MEASURE: usize = 4;

/// Number of measures in a section.
pub const MEASURES_PER_SECTION: usize = 4;

/// Every section is exactly this many beats long.
pub const BEATS_PER_SECTION: usize = BEATS_PER_MEASURE * MEASURES_PER_SECTION;

/// Beats per minute. Always within [Tempo::MIN_VALUE]..=[Tempo::MAX_VALUE].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub struct Tempo(u16);
impl Default for Tempo {
    fn default() -> Self {
        Self(Self::DEFAULT_VALUE)
    }
}
impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{} BPM", self.0))
    }
}
impl From<u16> for Tempo {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}
impl From<Tempo> for u16 {
    fn from(value: Tempo) -> Self {
        value.0
    }
}
impl Tempo {
    /// The largest value we'll allow.
    pub const MAX_VALUE: u16 = 200;

    /// The smallest value we'll allow.
    pub const MIN_VALUE: u16 = 60;

    #[allow(missing_docs)]
    pub const DEFAULT_VALUE: u16 = 120;

    /// Creates a [Tempo], clamping the value into the allowed range.
    pub fn new(bpm: u16) -> Self {
        Self(bpm.clamp(Self::MIN_VALUE, Self::MAX_VALUE))
    }

    /// The raw beats-per-minute value.
    pub fn bpm(&self) -> u16 {
        self.0
    }

    /// How long one beat lasts, in seconds.
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.0 as f64
    }

    /// How long the given number of beats lasts, in seconds.
    pub fn seconds_for_beats(&self, beats: usize) -> f64 {
        (beats as f64 * 60.0) / self.0 as f64
    }

    /// The wall-clock interval between two beats (60000 / BPM milliseconds).
    pub fn beat_interval(&self) -> Duration {
        Duration::from_nanos(60_000_000_000 / self.0 as u64)
    }

    /// The value carried by a MIDI set-tempo meta event.
    pub fn microseconds_per_beat(&self) -> u32 {
        (60_000_000.0 / self.0 as f64).round() as u32
    }
}

/// A location on the timeline's beat grid, split into the section and the
/// beat within it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatPosition {
    #[allow(missing_docs)]
    pub section_index: usize,
    #[allow(missing_docs)]
    pub beat_in_section: usize,
}
impl BeatPosition {
    /// Splits a global beat index into section and beat.
    pub const fn from_global_beat(global_beat: usize) -> Self {
        Self {
            section_index: global_beat / BEATS_PER_SECTION,
            beat_in_section: global_beat % BEATS_PER_SECTION,
        }
    }

    /// The inverse of [BeatPosition::from_global_beat()].
    pub const fn global_beat(&self) -> usize {
        self.section_index * BEATS_PER_SECTION + self.beat_in_section
    }

    /// Which measure of its section this beat falls in.
    pub const fn measure(&self) -> usize {
        self.beat_in_section / BEATS_PER_MEASURE
    }

    /// Whether this beat starts a measure.
    pub const fn is_downbeat(&self) -> bool {
        self.beat_in_section % BEATS_PER_MEASURE == 0
    }
}
impl fmt::Display for BeatPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{}.{}.{}",
            self.section_index + 1,
            self.measure() + 1,
            self.beat_in_section % BEATS_PER_MEASURE + 1
        ))
    }
}
