// Copyright (c) 2024 Mike Tsao

//! The user's persistent preferences. Intended to be serialized.

use crate::types::Tempo;
use app_dirs2::{get_app_root, AppDataType, AppInfo};
use derivative::Derivative;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

const APP_INFO: AppInfo = AppInfo {
    name: "chordline",
    author: "chordline",
};

/// Global preferences. Missing keys take their defaults, so older files keep
/// loading as keys are added.
#[derive(Clone, Debug, Derivative, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Tempo of a new session.
    default_bpm: Tempo,

    /// Volume the transport plays chords at, 0.0..=1.0.
    #[derivative(Default(value = "0.7"))]
    chord_volume: f32,

    /// Chord inserted by clicking an empty beat.
    #[derivative(Default(value = "\"C\".to_string()"))]
    default_chord_name: String,

    /// Where playlists are kept. [None] means the per-user data directory.
    playlist_directory: Option<PathBuf>,

    #[serde(skip)]
    has_been_saved: bool,
}
impl Settings {
    /// The name of the settings file inside the per-user data directory.
    pub const FILENAME: &'static str = "settings.json";

    /// The per-user data directory, or the current directory if the platform
    /// doesn't have one.
    pub fn app_data_directory() -> PathBuf {
        match get_app_root(AppDataType::UserData, &APP_INFO) {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Couldn't find user data directory ({e:?}); using current directory");
                PathBuf::from(".")
            }
        }
    }

    /// Where [Settings::load()] and [Settings::save()] look when the caller
    /// has no better idea.
    pub fn default_path() -> PathBuf {
        Self::app_data_directory().join(Self::FILENAME)
    }

    /// Reads settings from `settings_path`.
    pub fn load(settings_path: &Path) -> anyhow::Result<Self> {
        info!("Loading preferences from {settings_path:?}...");
        let mut contents = String::new();
        let mut file = File::open(settings_path)
            .map_err(|e| anyhow::format_err!("Couldn't open {settings_path:?}: {}", e))?;
        file.read_to_string(&mut contents)
            .map_err(|e| anyhow::format_err!("Couldn't read {settings_path:?}: {}", e))?;
        let mut settings: Self = serde_json::from_str(&contents)
            .map_err(|e| anyhow::format_err!("Couldn't parse {settings_path:?}: {}", e))?;
        settings.mark_clean();
        Ok(settings)
    }

    /// Writes settings to `settings_path`, creating parent directories as
    /// needed.
    pub fn save(&mut self, settings_path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self)
            .map_err(|_| anyhow::format_err!("Unable to serialize settings JSON"))?;
        if let Some(dir) = settings_path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::format_err!(
                    "Unable to create {settings_path:?} parent directories: {}",
                    e
                )
            })?;
        }

        let mut file = File::create(settings_path)
            .map_err(|e| anyhow::format_err!("Unable to create {settings_path:?}: {}", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| anyhow::format_err!("Unable to write {settings_path:?}: {}", e))?;

        self.mark_clean();
        Ok(())
    }

    /// Whether the current state has been saved to disk.
    pub fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    /// Call this whenever a setting changes.
    pub fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    /// Call this after a load() or a save().
    pub fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }

    #[allow(missing_docs)]
    pub fn default_bpm(&self) -> Tempo {
        self.default_bpm
    }

    #[allow(missing_docs)]
    pub fn set_default_bpm(&mut self, bpm: Tempo) {
        if bpm != self.default_bpm {
            self.default_bpm = bpm;
            self.needs_save();
        }
    }

    #[allow(missing_docs)]
    pub fn chord_volume(&self) -> f32 {
        self.chord_volume.clamp(0.0, 1.0)
    }

    #[allow(missing_docs)]
    pub fn set_chord_volume(&mut self, volume: f32) {
        self.chord_volume = volume.clamp(0.0, 1.0);
        self.needs_save();
    }

    #[allow(missing_docs)]
    pub fn default_chord_name(&self) -> &str {
        &self.default_chord_name
    }

    /// Blank names are ignored.
    pub fn set_default_chord_name(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && name != self.default_chord_name {
            self.default_chord_name = name.to_string();
            self.needs_save();
        }
    }

    /// The directory playlists live in, with the default applied.
    pub fn playlist_directory(&self) -> PathBuf {
        self.playlist_directory
            .clone()
            .unwrap_or_else(Self::app_data_directory)
    }

    #[allow(missing_docs)]
    pub fn set_playlist_directory(&mut self, dir: Option<PathBuf>) {
        self.playlist_directory = dir;
        self.needs_save();
    }
}
