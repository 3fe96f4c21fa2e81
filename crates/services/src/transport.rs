// Copyright (c) 2024 Mike Tsao

use crate::{CrossbeamChannel, ProvidesService};
use chordline::{
    playback::{PlaysAudio, Tick},
    types::Tempo,
    Session,
};
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};
use std::{
    sync::{Arc, RwLock},
    time::Instant,
};

#[allow(missing_docs)]
#[derive(Debug)]
pub enum TransportServiceInput {
    Play,
    Stop,
    /// Play if stopped, stop if playing.
    Toggle,
    SetTempo(Tempo),
    ServiceQuit,
}

#[allow(missing_docs)]
#[derive(Debug)]
pub enum TransportServiceEvent {
    Started,
    /// A beat was just played.
    Beat(Tick),
    /// Playback stopped, whether asked to or because an edit stopped it.
    Stopped,
    Quit,
}

/// Plays a shared [Session] on the wall clock.
///
/// The daemon thread sleeps on its Input channel until the next beat is due,
/// ticks the session, and sets the following deadline from the delay that
/// tick returned. A tempo change therefore lands on the very next beat, and
/// stopping just clears the one pending deadline.
///
/// The session stays usable from other threads through
/// [TransportService::session()]. Each tick holds the write lock only while
/// the tick runs.
#[derive(Debug)]
pub struct TransportService {
    inputs: CrossbeamChannel<TransportServiceInput>,
    events: CrossbeamChannel<TransportServiceEvent>,

    session: Arc<RwLock<Session>>,
}
impl ProvidesService<TransportServiceInput, TransportServiceEvent> for TransportService {
    fn sender(&self) -> &Sender<TransportServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<TransportServiceEvent> {
        &self.events.receiver
    }
}
impl TransportService {
    /// Starts the daemon thread. `sink` moves to that thread and receives
    /// every chord played.
    pub fn new_with(session: &Arc<RwLock<Session>>, sink: Box<dyn PlaysAudio + Send>) -> Self {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
            session: Arc::clone(session),
        };
        r.spawn_thread(sink);
        r
    }

    /// The session being played.
    pub fn session(&self) -> &Arc<RwLock<Session>> {
        &self.session
    }

    fn spawn_thread(&self, sink: Box<dyn PlaysAudio + Send>) {
        let receiver = self.inputs.receiver.clone();
        let sender = self.events.sender.clone();
        let session = Arc::clone(&self.session);
        std::thread::spawn(move || {
            let mut daemon = TransportServiceDaemon::new_with(receiver, sender, session, sink);
            daemon.execute();
        });
    }
}

struct TransportServiceDaemon {
    receiver: Receiver<TransportServiceInput>,
    sender: Sender<TransportServiceEvent>,
    session: Arc<RwLock<Session>>,
    sink: Box<dyn PlaysAudio + Send>,

    // When the next beat is due. None while stopped.
    deadline: Option<Instant>,
}
impl TransportServiceDaemon {
    fn new_with(
        receiver: Receiver<TransportServiceInput>,
        sender: Sender<TransportServiceEvent>,
        session: Arc<RwLock<Session>>,
        sink: Box<dyn PlaysAudio + Send>,
    ) -> Self {
        Self {
            receiver,
            sender,
            session,
            sink,
            deadline: None,
        }
    }

    fn execute(&mut self) {
        loop {
            let input = if let Some(deadline) = self.deadline {
                match self.receiver.recv_deadline(deadline) {
                    Ok(input) => Some(input),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match self.receiver.recv() {
                    Ok(input) => Some(input),
                    Err(_) => break,
                }
            };

            match input {
                None => self.handle_deadline(),
                Some(TransportServiceInput::Play) => {
                    self.notice_external_stop();
                    self.start();
                }
                Some(TransportServiceInput::Stop) => self.stop(),
                Some(TransportServiceInput::Toggle) => {
                    self.notice_external_stop();
                    if self.deadline.is_some() {
                        self.stop();
                    } else {
                        self.start();
                    }
                }
                Some(TransportServiceInput::SetTempo(tempo)) => {
                    if let Ok(mut session) = self.session.write() {
                        session.set_tempo(tempo);
                    }
                }
                Some(TransportServiceInput::ServiceQuit) => {
                    if let Ok(mut session) = self.session.write() {
                        session.stop_playback();
                    }
                    let _ = self.sender.send(TransportServiceEvent::Quit);
                    break;
                }
            }
        }
        info!("TransportServiceDaemon exit");
    }

    fn start(&mut self) {
        if self.deadline.is_some() {
            return;
        }
        let tick = if let Ok(mut session) = self.session.write() {
            if session.is_playing() {
                session.stop_playback();
            }
            session.toggle_playback(self.sink.as_mut())
        } else {
            warn!("Session lock is poisoned; can't play");
            None
        };
        if let Some(tick) = tick {
            let _ = self.sender.send(TransportServiceEvent::Started);
            self.arm(tick);
        }
    }

    fn stop(&mut self) {
        if let Ok(mut session) = self.session.write() {
            session.stop_playback();
        }
        if self.deadline.take().is_some() {
            let _ = self.sender.send(TransportServiceEvent::Stopped);
        }
    }

    fn handle_deadline(&mut self) {
        let tick = self
            .session
            .write()
            .ok()
            .and_then(|mut session| session.tick(self.sink.as_mut()));
        if let Some(tick) = tick {
            self.arm(tick);
        } else {
            self.forget_deadline();
        }
    }

    // An edit can stop the session while a beat is pending. Play and Toggle
    // must see the session's state, not the stale deadline.
    fn notice_external_stop(&mut self) {
        if self.deadline.is_none() {
            return;
        }
        let is_playing = self
            .session
            .read()
            .map(|session| session.is_playing())
            .unwrap_or_default();
        if !is_playing {
            self.forget_deadline();
        }
    }

    fn forget_deadline(&mut self) {
        debug!("Session stopped between ticks");
        self.deadline = None;
        let _ = self.sender.send(TransportServiceEvent::Stopped);
    }

    fn arm(&mut self, tick: Tick) {
        self.deadline = Some(Instant::now() + tick.next_delay);
        let _ = self.sender.send(TransportServiceEvent::Beat(tick));
    }
}
