// Copyright (c) 2024 Mike Tsao

//! Just enough music theory to turn chord names into pitches.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{ChordSymbol, ResolvesPitches, TriadResolver};
}

pub use chord::{Accidental, ChordSymbol, ChordSymbolError, Letter, TriadQuality};
pub use resolver::{ResolvesPitches, TriadResolver};

mod chord;
mod resolver;
