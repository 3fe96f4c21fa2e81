// Copyright (c) 2024 Mike Tsao

use crate::util::Rng;

/// A named chord progression that can be laid into a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progression {
    /// Roman-numeral name, such as `I-V-vi-IV`.
    pub name: &'static str,
    /// Short human-friendly label.
    pub label: &'static str,
    /// The chords in C (or A minor).
    pub chords: &'static [&'static str],
    #[allow(missing_docs)]
    pub description: &'static str,
}
impl Progression {
    /// The built-in progressions offered by the progression menu.
    pub const PRESETS: &'static [Progression] = &[
        Progression {
            name: "I-V-vi-IV",
            label: "Pop (Axis)",
            chords: &["C", "G", "Am", "F"],
            description: "The most used progression in pop",
        },
        Progression {
            name: "vi-IV-I-V",
            label: "Ballad",
            chords: &["Am", "F", "C", "G"],
            description: "The emotional rotation of the Axis",
        },
        Progression {
            name: "I-vi-IV-V",
            label: "50s Doo-wop",
            chords: &["C", "Am", "F", "G"],
            description: "Fifties classic",
        },
        Progression {
            name: "ii-V-I",
            label: "Jazz ii-V-I",
            chords: &["Dm7", "G7", "Cmaj7"],
            description: "The fundamental jazz cadence",
        },
        Progression {
            name: "I-IV-V-I",
            label: "Blues/Rock",
            chords: &["C", "F", "G", "C"],
            description: "Foundation of blues and rock",
        },
        Progression {
            name: "i-iv-V-i",
            label: "Classical minor",
            chords: &["Am", "Dm", "E", "Am"],
            description: "Dramatic minor progression",
        },
        Progression {
            name: "I-V-vi-iii-IV",
            label: "Pachelbel Canon",
            chords: &["C", "G", "Am", "Em", "F"],
            description: "Inspired by Pachelbel's Canon",
        },
        Progression {
            name: "i-VII-VI-V",
            label: "Andalusian",
            chords: &["Am", "G", "F", "E"],
            description: "Flamenco/Andalusian cadence",
        },
        Progression {
            name: "I-bVII-IV-I",
            label: "Modal rock",
            chords: &["C", "Bb", "F", "C"],
            description: "Classic rock with bVII",
        },
        Progression {
            name: "vi-V-IV-III",
            label: "Epic",
            chords: &["Am", "G", "F", "E"],
            description: "Cinematic epic progression",
        },
        Progression {
            name: "I-IV-vi-V",
            label: "Modern",
            chords: &["C", "F", "Am", "G"],
            description: "Contemporary pop",
        },
        Progression {
            name: "i-VI-III-VII",
            label: "Minor pop",
            chords: &["Am", "F", "C", "G"],
            description: "Accessible minor",
        },
        Progression {
            name: "ii-V-I-VI",
            label: "Rhythm Changes",
            chords: &["Dm7", "G7", "Cmaj7", "A7"],
            description: "Jazz variation",
        },
        Progression {
            name: "I-iii-IV-V",
            label: "Romantic",
            chords: &["C", "Em", "F", "G"],
            description: "Soft and romantic",
        },
        Progression {
            name: "i-i-iv-V",
            label: "12 Bar Minor",
            chords: &["Am", "Am", "Dm", "E"],
            description: "Simplified minor blues",
        },
    ];

    /// Looks up a preset by its roman-numeral name.
    pub fn preset(name: &str) -> Option<&'static Progression> {
        Self::PRESETS.iter().find(|p| p.name == name)
    }

    /// Picks a preset at random.
    pub fn random(rng: &mut Rng) -> &'static Progression {
        let index = rng.choose_index(Self::PRESETS.len()).unwrap_or_default();
        &Self::PRESETS[index]
    }
}
