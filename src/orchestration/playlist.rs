// Copyright (c) 2024 Mike Tsao

use crate::{
    composition::Section,
    types::{PlaylistUid, Tempo},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named snapshot of a timeline and its tempo.
///
/// A playlist owns its own copy of the sections. Editing the live timeline
/// after saving never changes a playlist, and loading one never lets the
/// timeline share data with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[allow(missing_docs)]
    pub id: PlaylistUid,
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub bpm: Tempo,
    #[allow(missing_docs)]
    pub sections: Vec<Section>,
    /// When the playlist was first saved.
    pub created_at: DateTime<Utc>,
    /// When the playlist was last overwritten, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
impl Playlist {
    /// A playlist stamped with the current time. `name` is trimmed.
    pub fn new_with(id: PlaylistUid, name: &str, bpm: Tempo, sections: Vec<Section>) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            bpm,
            sections,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Replaces the contents and stamps [Playlist::updated_at].
    pub fn overwrite(&mut self, bpm: Tempo, sections: Vec<Section>) {
        self.bpm = bpm;
        self.sections = sections;
        self.updated_at = Some(Utc::now());
    }

    /// Total number of chords across every section.
    pub fn chord_count(&self) -> usize {
        self.sections.iter().map(|s| s.chords.len()).sum()
    }
}
