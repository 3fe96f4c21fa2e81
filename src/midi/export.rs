// Copyright (c) 2024 Mike Tsao

use super::MidiEncoder;
use crate::{composition::Timeline, theory::ResolvesPitches, types::Tempo};
use log::info;
use std::path::{Path, PathBuf};

/// An encoded timeline, ready to be saved or handed to a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MidiExport {
    bytes: Vec<u8>,
}
impl MidiExport {
    /// The name a saved export gets.
    pub const FILENAME: &'static str = "chord-progression.mid";

    #[allow(missing_docs)]
    pub const MIME_TYPE: &'static str = "audio/midi";

    /// Flattens every section of `timeline` onto one track and encodes it.
    pub fn new_with(
        timeline: &Timeline,
        tempo: Tempo,
        resolver: &dyn ResolvesPitches,
        encoder: &MidiEncoder,
    ) -> Self {
        Self {
            bytes: encoder.encode(&timeline.flatten(), tempo, resolver),
        }
    }

    #[allow(missing_docs)]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[allow(missing_docs)]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Writes the file as [MidiExport::FILENAME] inside `dir`, creating `dir`
    /// if needed. Returns the full path written.
    pub fn write_to_dir(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .map_err(|e| anyhow::format_err!("Unable to create {dir:?}: {}", e))?;
        let path = dir.join(Self::FILENAME);
        self.write_to(&path)?;
        Ok(path)
    }

    /// Writes the file to exactly `path`.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, &self.bytes)
            .map_err(|e| anyhow::format_err!("Unable to write {path:?}: {}", e))?;
        info!("Exported {} bytes of MIDI to {path:?}", self.bytes.len());
        Ok(())
    }
}
