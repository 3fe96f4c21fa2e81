// Copyright (c) 2024 Mike Tsao

use super::ChordSymbol;
use crate::types::{PitchClass, PitchName};
use log::warn;

/// Turns a chord name into the pitches that should sound when it plays.
///
/// The transport and the MIDI encoder both go through this trait, so a
/// different voicing strategy can be swapped in without touching either.
pub trait ResolvesPitches {
    /// Returns the pitches of `chord_symbol`. Must not panic on malformed
    /// input; return a degraded result instead.
    fn resolve(&self, chord_symbol: &str) -> Vec<PitchName>;
}

/// Resolves every chord to a three-note triad: root, third, fifth.
///
/// The root keeps its original spelling; the third and fifth are spelled from
/// the sharp-based chromatic scale. A root that isn't in that scale (after
/// mapping flats to sharps) comes back as the root string repeated three
/// times.
#[derive(Clone, Copy, Debug, Default)]
pub struct TriadResolver {}
impl ResolvesPitches for TriadResolver {
    fn resolve(&self, chord_symbol: &str) -> Vec<PitchName> {
        match chord_symbol.parse::<ChordSymbol>() {
            Ok(chord) => Self::triad(&chord),
            Err(e) => {
                warn!("Couldn't parse chord symbol '{chord_symbol}': {e}");
                Self::fallback(chord_symbol)
            }
        }
    }
}
impl TriadResolver {
    /// Builds the triad for an already-parsed symbol.
    pub fn triad(chord: &ChordSymbol) -> Vec<PitchName> {
        let root = chord.root_spelling();
        let Some(root_class) = PitchClass::from_spelling(&root) else {
            warn!("Root '{root}' of chord '{chord}' isn't in the chromatic scale");
            return Self::fallback(&root);
        };

        let quality = chord.triad_quality();
        vec![
            PitchName::from(root),
            PitchName::from(root_class.transposed(quality.third())),
            PitchName::from(root_class.transposed(quality.fifth())),
        ]
    }

    fn fallback(root: &str) -> Vec<PitchName> {
        vec![PitchName::from(root); 3]
    }
}
