// Copyright (c) 2024 Mike Tsao

use crate::{composition::ChordSpan, theory::ResolvesPitches, types::Tempo};
use byteorder::{BigEndian, ByteOrder};
use derivative::Derivative;
use derive_builder::Builder;

const HEADER_CHUNK_ID: &[u8; 4] = b"MThd";
const TRACK_CHUNK_ID: &[u8; 4] = b"MTrk";
const HEADER_LENGTH: u32 = 6;
/// Format 0: a single multi-channel track.
const FORMAT_SINGLE_TRACK: u16 = 0;

const STATUS_NOTE_OFF: u8 = 0x80;
const STATUS_NOTE_ON: u8 = 0x90;
const META: u8 = 0xff;
const META_SET_TEMPO: u8 = 0x51;
const META_END_OF_TRACK: u8 = 0x2f;

/// The largest delta a Standard MIDI File can carry (four VLQ bytes).
pub const MAX_VLQ: u32 = 0x0fff_ffff;

/// Encodes a value as a MIDI variable-length quantity: seven bits per byte,
/// most significant group first, with the high bit set on every byte but the
/// last. Values above [MAX_VLQ] are clamped to it.
///
/// ```
/// # use chordline::midi::encode_vlq;
/// assert_eq!(encode_vlq(0), vec![0x00]);
/// assert_eq!(encode_vlq(480), vec![0x83, 0x60]);
/// ```
pub fn encode_vlq(value: u32) -> Vec<u8> {
    let value = value.min(MAX_VLQ);
    let mut groups = vec![(value & 0x7f) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push(((rest & 0x7f) as u8) | 0x80);
        rest >>= 7;
    }
    groups.reverse();
    groups
}

/// Renders chord spans as a format-0 Standard MIDI File.
///
/// Each span becomes its resolved pitches switched on together at the span's
/// start and off together after its duration. Spans are written in order of
/// start beat; when one overlaps its predecessor, its notes start as soon as
/// the predecessor's end, since MIDI deltas can't go backward.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Eq)]
#[derivative(Default)]
#[builder(default)]
pub struct MidiEncoder {
    /// Header division, and the number of ticks in one beat.
    #[derivative(Default(value = "480"))]
    ticks_per_beat: u16,

    /// Velocity of every note-on.
    #[derivative(Default(value = "0x64"))]
    velocity: u8,

    /// Zero-based MIDI channel, 0..=15.
    channel: u8,
}
impl MidiEncoder {
    #[allow(missing_docs)]
    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    #[allow(missing_docs)]
    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    #[allow(missing_docs)]
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Produces the complete file. `spans` carry global start beats, as
    /// returned by [Timeline::flatten()](crate::composition::Timeline::flatten).
    pub fn encode(
        &self,
        spans: &[ChordSpan],
        tempo: Tempo,
        resolver: &dyn ResolvesPitches,
    ) -> Vec<u8> {
        let track = self.encode_track(spans, tempo, resolver);

        let mut bytes = Vec::with_capacity(14 + 8 + track.len());
        bytes.extend_from_slice(HEADER_CHUNK_ID);
        bytes.extend_from_slice(&Self::u32_bytes(HEADER_LENGTH));
        bytes.extend_from_slice(&Self::u16_bytes(FORMAT_SINGLE_TRACK));
        bytes.extend_from_slice(&Self::u16_bytes(1));
        bytes.extend_from_slice(&Self::u16_bytes(self.ticks_per_beat));

        bytes.extend_from_slice(TRACK_CHUNK_ID);
        bytes.extend_from_slice(&Self::u32_bytes(track.len() as u32));
        bytes.extend(track);
        bytes
    }

    fn encode_track(
        &self,
        spans: &[ChordSpan],
        tempo: Tempo,
        resolver: &dyn ResolvesPitches,
    ) -> Vec<u8> {
        let mut events = vec![0x00, META, META_SET_TEMPO, 0x03];
        let mut tempo_bytes = [0; 3];
        BigEndian::write_u24(&mut tempo_bytes, tempo.microseconds_per_beat());
        events.extend_from_slice(&tempo_bytes);

        // sort_by_key is stable, so spans sharing a start beat keep their order.
        let mut sorted: Vec<&ChordSpan> = spans.iter().collect();
        sorted.sort_by_key(|span| span.start_beat);

        let note_on = STATUS_NOTE_ON | (self.channel & 0x0f);
        let note_off = STATUS_NOTE_OFF | (self.channel & 0x0f);
        let mut current_tick = 0u32;
        for span in sorted {
            let keys: Vec<u8> = resolver
                .resolve(&span.name)
                .iter()
                .map(|pitch| pitch.midi_note())
                .collect();
            let start_tick = self.beats_to_ticks(span.start_beat);
            let duration = self.beats_to_ticks(span.duration);

            let delta = start_tick.saturating_sub(current_tick);
            for (i, key) in keys.iter().enumerate() {
                events.extend(Self::delta_bytes(i, delta));
                events.extend_from_slice(&[note_on, *key, self.velocity]);
            }
            for (i, key) in keys.iter().enumerate() {
                events.extend(Self::delta_bytes(i, duration));
                events.extend_from_slice(&[note_off, *key, 0x00]);
            }
            current_tick = start_tick.saturating_add(duration);
        }

        events.extend_from_slice(&[0x00, META, META_END_OF_TRACK, 0x00]);
        events
    }

    // Clamped so that every delta derived from it fits in a VLQ.
    fn beats_to_ticks(&self, beats: usize) -> u32 {
        u32::try_from(beats)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.ticks_per_beat as u32)
            .min(MAX_VLQ)
    }

    // Only the first event of a chord carries the delta.
    fn delta_bytes(index: usize, delta: u32) -> Vec<u8> {
        if index == 0 {
            encode_vlq(delta)
        } else {
            vec![0x00]
        }
    }

    fn u16_bytes(value: u16) -> [u8; 2] {
        let mut buf = [0; 2];
        BigEndian::write_u16(&mut buf, value);
        buf
    }

    fn u32_bytes(value: u32) -> [u8; 4] {
        let mut buf = [0; 4];
        BigEndian::write_u32(&mut buf, value);
        buf
    }
}
