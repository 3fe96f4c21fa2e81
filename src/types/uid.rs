// Copyright (c) 2024 Mike Tsao

//! Unique identifiers for spans, sections, and playlists, and factories that
//! help ensure they are in fact unique.

use core::sync::atomic::Ordering;
use core::{hash::Hash, marker::PhantomData, sync::atomic::AtomicUsize};
use delegate::delegate;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Common behavior of the identifier newtypes.
pub trait IsUid: Eq + Hash + Clone + From<usize> {
    /// Returns the raw uid.
    fn as_usize(&self) -> usize;
}

/// Generates unique uids of a single kind by counting upward.
#[derive(Debug)]
pub struct UidFactory<U: IsUid> {
    next_uid_value: AtomicUsize,
    _phantom: PhantomData<U>,
}
impl<U: IsUid> UidFactory<U> {
    /// Creates a new [UidFactory] starting with the given value.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid),
            _phantom: Default::default(),
        }
    }

    /// Generates the next unique uid.
    pub fn mint_next(&self) -> U {
        let uid_value = self.next_uid_value.fetch_add(1, Ordering::Relaxed);
        U::from(uid_value)
    }

    /// Notifies the factory that a uid exists that it didn't mint (for
    /// example, one that came back from the playlist store). The factory skips
    /// past it so that later mints can't collide.
    pub fn notify_externally_minted_uid(&self, uid: &U) {
        self.next_uid_value
            .fetch_max(uid.as_usize() + 1, Ordering::Relaxed);
    }
}
impl<U: IsUid> PartialEq for UidFactory<U> {
    fn eq(&self, other: &Self) -> bool {
        self.next_uid_value.load(Ordering::Relaxed) == other.next_uid_value.load(Ordering::Relaxed)
    }
}

/// Identifies a [ChordSpan](crate::composition::ChordSpan).
#[derive(Synonym, Serialize, Deserialize)]
pub struct SpanUid(pub usize);
impl IsUid for SpanUid {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Identifies a [Section](crate::composition::Section).
#[derive(Synonym, Serialize, Deserialize)]
pub struct SectionUid(pub usize);
impl IsUid for SectionUid {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Identifies a [Playlist](crate::orchestration::Playlist).
#[derive(Synonym, Serialize, Deserialize)]
pub struct PlaylistUid(pub usize);
impl IsUid for PlaylistUid {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Mints unique [SpanUid]s.
#[derive(Debug)]
pub struct SpanUidFactory(UidFactory<SpanUid>);
impl Default for SpanUidFactory {
    fn default() -> Self {
        Self(UidFactory::<SpanUid>::new(1))
    }
}
impl SpanUidFactory {
    delegate! {
        to self.0 {
            /// Generates the next unique [SpanUid].
            pub fn mint_next(&self) -> SpanUid;
            /// See [UidFactory::notify_externally_minted_uid()].
            pub fn notify_externally_minted_uid(&self, uid: &SpanUid);
        }
    }
}

/// Mints unique [SectionUid]s.
#[derive(Debug)]
pub struct SectionUidFactory(UidFactory<SectionUid>);
impl Default for SectionUidFactory {
    fn default() -> Self {
        Self(UidFactory::<SectionUid>::new(1))
    }
}
impl SectionUidFactory {
    delegate! {
        to self.0 {
            /// Generates the next unique [SectionUid].
            pub fn mint_next(&self) -> SectionUid;
            /// See [UidFactory::notify_externally_minted_uid()].
            pub fn notify_externally_minted_uid(&self, uid: &SectionUid);
        }
    }
}

/// Mints unique [PlaylistUid]s.
#[derive(Debug)]
pub struct PlaylistUidFactory(UidFactory<PlaylistUid>);
impl Default for PlaylistUidFactory {
    fn default() -> Self {
        Self(UidFactory::<PlaylistUid>::new(1))
    }
}
impl PlaylistUidFactory {
    delegate! {
        to self.0 {
            /// Generates the next unique [PlaylistUid].
            pub fn mint_next(&self) -> PlaylistUid;
            /// See [UidFactory::notify_externally_minted_uid()].
            pub fn notify_externally_minted_uid(&self, uid: &PlaylistUid);
        }
    }
}

/// One factory per identifier kind. Everything that creates spans, sections,
/// or playlists mints from here.
#[derive(Debug, Default)]
pub struct UidFactories {
    #[allow(missing_docs)]
    pub spans: SpanUidFactory,
    #[allow(missing_docs)]
    pub sections: SectionUidFactory,
    #[allow(missing_docs)]
    pub playlists: PlaylistUidFactory,
}
