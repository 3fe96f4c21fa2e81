// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{rng::Rng, settings::Settings};
}

pub use rng::Rng;
pub use settings::Settings;

mod rng;
mod settings;
