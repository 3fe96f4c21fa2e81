// Copyright (c) 2024 Mike Tsao

//! The editing session, and the playlists it saves.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        JsonFilePlaylistStore, MemoryPlaylistStore, Playlist, PlaylistStore, Session,
    };
}

pub use playlist::Playlist;
pub use session::{DragState, EditTarget, Session};
pub use store::{JsonFilePlaylistStore, MemoryPlaylistStore, PlaylistStore};

mod playlist;
mod session;
mod store;
