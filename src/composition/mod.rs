// Copyright (c) 2024 Mike Tsao

//! The chord timeline: spans placed on sections, and the structural edits
//! that keep it well-formed.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{ChordSpan, Progression, ResizeEdge, Section, Timeline};
}

pub use progression::Progression;
pub use section::Section;
pub use span::{ChordSpan, ResizeEdge};
pub use timeline::Timeline;

mod progression;
mod section;
mod span;
mod timeline;
