// Copyright (c) 2024 Mike Tsao

use super::Playlist;
use log::{debug, info, warn};
use std::{
    fmt::Debug,
    fs::File,
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
};

/// Somewhere to keep the playlist collection between sessions.
///
/// Reads never fail: anything unreadable is reported as [None] and logged.
/// Writes report errors so the caller can decide how loudly to complain.
pub trait PlaylistStore: Debug + Send + Sync {
    /// Returns the stored playlists, or [None] if nothing usable is stored.
    fn load(&self) -> Option<Vec<Playlist>>;

    /// Replaces the stored collection with `playlists`.
    fn save(&mut self, playlists: &[Playlist]) -> anyhow::Result<()>;
}

fn parse_playlists(json: &str, source: &dyn Debug) -> Option<Vec<Playlist>> {
    match serde_json::from_str(json) {
        Ok(playlists) => Some(playlists),
        Err(e) => {
            warn!("Ignoring unreadable playlists in {source:?}: {e}");
            None
        }
    }
}

/// Keeps playlists as a JSON array in a single file.
#[derive(Debug)]
pub struct JsonFilePlaylistStore {
    path: PathBuf,
}
impl JsonFilePlaylistStore {
    /// The file name used inside the playlist directory.
    pub const FILENAME: &'static str = "chord-player-playlists.json";

    /// A store backed by [JsonFilePlaylistStore::FILENAME] inside `dir`.
    pub fn new_in_dir(dir: &Path) -> Self {
        Self::new_with_path(dir.join(Self::FILENAME))
    }

    /// A store backed by exactly `path`.
    pub fn new_with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[allow(missing_docs)]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl PlaylistStore for JsonFilePlaylistStore {
    fn load(&self) -> Option<Vec<Playlist>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No playlists at {:?} yet", self.path);
                return None;
            }
            Err(e) => {
                warn!("Couldn't open {:?}: {e}", self.path);
                return None;
            }
        };
        let mut contents = String::new();
        if let Err(e) = file.read_to_string(&mut contents) {
            warn!("Couldn't read {:?}: {e}", self.path);
            return None;
        }
        let playlists = parse_playlists(&contents, &self.path)?;
        info!("Loaded {} playlists from {:?}", playlists.len(), self.path);
        Some(playlists)
    }

    fn save(&mut self, playlists: &[Playlist]) -> anyhow::Result<()> {
        let path = &self.path;
        let json = serde_json::to_string_pretty(playlists)
            .map_err(|_| anyhow::format_err!("Unable to serialize playlists JSON"))?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::format_err!("Unable to create {path:?} parent directories: {}", e)
            })?;
        }
        let mut file = File::create(path)
            .map_err(|e| anyhow::format_err!("Unable to create {path:?}: {}", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| anyhow::format_err!("Unable to write {path:?}: {}", e))?;
        Ok(())
    }
}

/// Keeps the serialized collection in memory. Goes through the same JSON
/// encoding as [JsonFilePlaylistStore].
#[derive(Debug, Default)]
pub struct MemoryPlaylistStore {
    contents: Option<String>,
    save_count: usize,
}
impl MemoryPlaylistStore {
    /// A store that already holds `contents`, which needn't be valid JSON.
    pub fn new_with_contents(contents: &str) -> Self {
        Self {
            contents: Some(contents.to_string()),
            save_count: 0,
        }
    }

    /// The raw stored text.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// How many times [PlaylistStore::save()] has succeeded.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}
impl PlaylistStore for MemoryPlaylistStore {
    fn load(&self) -> Option<Vec<Playlist>> {
        parse_playlists(self.contents.as_deref()?, &"memory")
    }

    fn save(&mut self, playlists: &[Playlist]) -> anyhow::Result<()> {
        self.contents = Some(
            serde_json::to_string(playlists)
                .map_err(|_| anyhow::format_err!("Unable to serialize playlists JSON"))?,
        );
        self.save_count += 1;
        Ok(())
    }
}
