// Copyright (c) 2024 Mike Tsao

//! Services that run parts of chordline on their own threads and talk to
//! clients over crossbeam channels.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        CrossbeamChannel, ProvidesService, TransportService, TransportServiceEvent,
        TransportServiceInput,
    };
}

pub use service::{CrossbeamChannel, ProvidesService};
pub use transport::{TransportService, TransportServiceEvent, TransportServiceInput};

mod service;
mod transport;
