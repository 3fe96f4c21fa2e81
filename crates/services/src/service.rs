// Copyright (c) 2024 Mike Tsao

//! The shape every service shares: a daemon thread, an Input channel going
//! in, and an Event channel coming out.

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use log::warn;
use std::time::Duration;

/// Both halves of an unbounded crossbeam channel.
#[derive(Debug)]
pub struct CrossbeamChannel<T> {
    #[allow(missing_docs)]
    pub sender: Sender<T>,
    #[allow(missing_docs)]
    pub receiver: Receiver<T>,
}
impl<T> Default for CrossbeamChannel<T> {
    fn default() -> Self {
        let (sender, receiver) = crossbeam::channel::unbounded();
        Self { sender, receiver }
    }
}

/// Client-side access to a service.
///
/// Clients usually clone [ProvidesService::sender()] and
/// [ProvidesService::receiver()] and keep those rather than the service
/// itself. The convenience methods here are for callers that do keep it.
pub trait ProvidesService<I: core::fmt::Debug, E: core::fmt::Debug> {
    /// Where Inputs go.
    fn sender(&self) -> &Sender<I>;

    /// Where Events come from.
    fn receiver(&self) -> &Receiver<E>;

    /// Sends an Input, logging (and returning false) if the service is gone.
    fn send_input(&self, input: I) -> bool {
        if let Err(e) = self.sender().try_send(input) {
            warn!("While sending: {e:?}");
            false
        } else {
            true
        }
    }

    /// Waits up to `timeout` for the next Event.
    fn next_event(&self, timeout: Duration) -> Option<E> {
        match self.receiver().recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Service event channel disconnected");
                None
            }
        }
    }
}
