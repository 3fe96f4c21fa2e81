// Copyright (c) 2024 Mike Tsao

use core::{fmt, str::FromStr};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// Why a string couldn't be parsed as a [ChordSymbol].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChordSymbolError {
    #[allow(missing_docs)]
    #[error("chord symbol is empty")]
    Empty,
    #[allow(missing_docs)]
    #[error("'{0}' is not a note letter (expected A through G)")]
    InvalidRoot(char),
}

/// The letter part of a chord root.
#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}
impl TryFrom<char> for Letter {
    type Error = ChordSymbolError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'A' => Ok(Self::A),
            'B' => Ok(Self::B),
            'C' => Ok(Self::C),
            'D' => Ok(Self::D),
            'E' => Ok(Self::E),
            'F' => Ok(Self::F),
            'G' => Ok(Self::G),
            other => Err(ChordSymbolError::InvalidRoot(other)),
        }
    }
}

/// An optional sharp or flat following the root letter. The Unicode signs are
/// accepted and keep their spelling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
    SharpSign,
    FlatSign,
}
impl Accidental {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Self::Sharp),
            'b' => Some(Self::Flat),
            '♯' => Some(Self::SharpSign),
            '♭' => Some(Self::FlatSign),
            _ => None,
        }
    }

    /// The accidental as it was written.
    pub fn spelling(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            Accidental::SharpSign => "♯",
            Accidental::FlatSign => "♭",
        }
    }
}

/// The triad family implied by a chord's quality suffix.
#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TriadQuality {
    Major,
    Minor,
    Diminished,
}
impl TriadQuality {
    /// Classifies a free-form quality suffix. `dim` or `°` anywhere means
    /// diminished; otherwise any `m` means minor. That makes `maj7` minor,
    /// which is how the chord player has always voiced it.
    pub fn from_suffix(suffix: &str) -> Self {
        if suffix.contains("dim") || suffix.contains('°') {
            Self::Diminished
        } else if suffix.contains('m') {
            Self::Minor
        } else {
            Self::Major
        }
    }

    /// Semitones from the root to the third.
    pub fn third(&self) -> u8 {
        match self {
            TriadQuality::Major => 4,
            TriadQuality::Minor | TriadQuality::Diminished => 3,
        }
    }

    /// Semitones from the root to the fifth.
    pub fn fifth(&self) -> u8 {
        match self {
            TriadQuality::Major | TriadQuality::Minor => 7,
            TriadQuality::Diminished => 6,
        }
    }
}

/// A parsed chord symbol: a root letter, an optional accidental, and whatever
/// follows as the quality (`m`, `dim`, `maj7`, `sus4`, ...).
///
/// ```
/// use chordline::theory::{Accidental, ChordSymbol, Letter};
///
/// let chord: ChordSymbol = "Bbm7".parse().unwrap();
/// assert_eq!(chord.letter(), Letter::B);
/// assert_eq!(chord.accidental(), Accidental::Flat);
/// assert_eq!(chord.quality(), "m7");
/// assert_eq!(chord.root_spelling(), "Bb");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChordSymbol {
    letter: Letter,
    accidental: Accidental,
    quality: String,
}
impl FromStr for ChordSymbol {
    type Err = ChordSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = Letter::try_from(chars.next().ok_or(ChordSymbolError::Empty)?)?;

        let rest = chars.as_str();
        let (accidental, quality) = match rest.chars().next().and_then(Accidental::from_char) {
            Some(accidental) => (accidental, &rest[accidental.spelling().len()..]),
            None => (Accidental::Natural, rest),
        };

        Ok(Self::new_with(letter, accidental, quality))
    }
}
impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{}{}{}",
            self.letter,
            self.accidental.spelling(),
            self.quality
        ))
    }
}
impl ChordSymbol {
    /// Builds a symbol from its parts.
    pub fn new_with(letter: Letter, accidental: Accidental, quality: &str) -> Self {
        Self {
            letter,
            accidental,
            quality: quality.to_string(),
        }
    }

    #[allow(missing_docs)]
    pub fn letter(&self) -> Letter {
        self.letter
    }

    #[allow(missing_docs)]
    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// The free-form suffix after the root.
    pub fn quality(&self) -> &str {
        &self.quality
    }

    /// The root exactly as written, for example `Bb` or `F#`.
    pub fn root_spelling(&self) -> String {
        format!("{}{}", self.letter, self.accidental.spelling())
    }

    #[allow(missing_docs)]
    pub fn triad_quality(&self) -> TriadQuality {
        TriadQuality::from_suffix(&self.quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_accidental_and_quality() {
        let c: ChordSymbol = "C".parse().unwrap();
        assert_eq!(c.letter(), Letter::C);
        assert_eq!(c.accidental(), Accidental::Natural);
        assert_eq!(c.quality(), "");

        let fsharp_dim: ChordSymbol = "F#dim".parse().unwrap();
        assert_eq!(fsharp_dim.accidental(), Accidental::Sharp);
        assert_eq!(fsharp_dim.quality(), "dim");
        assert_eq!(fsharp_dim.root_spelling(), "F#");

        let eflat: ChordSymbol = "E♭maj7".parse().unwrap();
        assert_eq!(eflat.accidental(), Accidental::FlatSign);
        assert_eq!(eflat.quality(), "maj7");
        assert_eq!(eflat.to_string(), "E♭maj7");
    }

    #[test]
    fn lowercase_b_after_root_is_a_flat() {
        let c: ChordSymbol = "Cbdim".parse().unwrap();
        assert_eq!(c.accidental(), Accidental::Flat);
        assert_eq!(c.quality(), "dim");
    }

    #[test]
    fn rejects_bad_roots() {
        assert_eq!("".parse::<ChordSymbol>(), Err(ChordSymbolError::Empty));
        assert_eq!(
            "H7".parse::<ChordSymbol>(),
            Err(ChordSymbolError::InvalidRoot('H'))
        );
        assert_eq!(
            "am".parse::<ChordSymbol>(),
            Err(ChordSymbolError::InvalidRoot('a'))
        );
    }

    #[test]
    fn triad_quality_from_suffix() {
        assert_eq!(TriadQuality::from_suffix(""), TriadQuality::Major);
        assert_eq!(TriadQuality::from_suffix("7"), TriadQuality::Major);
        assert_eq!(TriadQuality::from_suffix("m"), TriadQuality::Minor);
        assert_eq!(TriadQuality::from_suffix("m7b5"), TriadQuality::Minor);
        assert_eq!(TriadQuality::from_suffix("dim7"), TriadQuality::Diminished);
        assert_eq!(TriadQuality::from_suffix("°"), TriadQuality::Diminished);
        assert_eq!(
            TriadQuality::from_suffix("maj7"),
            TriadQuality::Minor,
            "any 'm' outside 'dim' counts as minor"
        );
    }
}
