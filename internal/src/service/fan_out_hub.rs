use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::{debug, info, warn};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    domain::{error::SessionSendError, session::ClientSession, status::StatusState},
    port::session::ClientSinkDrivenPort,
    service::status_store::StatusStore,
};

struct RegisteredSession<S> {
    session: ClientSession,
    sink: S,
}

/// Registry of live client sessions and the fan-out of status changes to them.
///
/// Registration, store writes and broadcasts all happen under the registry
/// lock. A session is therefore either registered before an update (and gets
/// it through the broadcast) or after it (and gets it as its snapshot).
pub struct FanOutHub<S: ClientSinkDrivenPort> {
    store: Arc<StatusStore>,
    sessions: Mutex<HashMap<Uuid, RegisteredSession<S>>>,
}

impl<S: ClientSinkDrivenPort> FanOutHub<S> {
    pub fn new(store: Arc<StatusStore>) -> Self {
        FanOutHub {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Registers the session and pushes the current snapshot to it.
    ///
    /// A sink that cannot take the snapshot is not registered.
    pub fn register(&self, session: ClientSession, sink: S) -> Result<(), SessionSendError> {
        let mut sessions = self.lock();
        let snapshot = self.store.get();
        if let Err(e) = sink.send(&snapshot) {
            warn!("Client session {} not registered: {e}", session.id);
            return Err(e);
        }
        let id = session.id;
        sessions.insert(id, RegisteredSession { session, sink });
        info!("Client session {id} registered, {} connected", sessions.len());
        Ok(())
    }

    pub fn unregister(&self, id: &Uuid) -> Option<ClientSession> {
        let mut sessions = self.lock();
        let removed = sessions.remove(id).map(|registered| registered.session);
        if removed.is_some() {
            info!("Client session {id} unregistered, {} connected", sessions.len());
        }
        removed
    }

    /// Sends `state` to every registered session and returns how many took it.
    pub fn broadcast(&self, state: &StatusState) -> usize {
        let mut sessions = self.lock();
        Self::deliver(&mut sessions, state)
    }

    /// Stores the new value and broadcasts it in one step.
    pub fn publish(&self, value: String, at: OffsetDateTime) -> StatusState {
        let mut sessions = self.lock();
        let state = self.store.set(value, at);
        let delivered = Self::deliver(&mut sessions, &state);
        debug!("Status '{}' delivered to {delivered} session(s)", state.value);
        state
    }

    pub fn session_count(&self) -> usize {
        self.lock().len()
    }

    /// Drops every registered session, closing their sinks.
    pub fn close_all(&self) -> usize {
        let mut sessions = self.lock();
        let closed = sessions.len();
        sessions.clear();
        closed
    }

    /// A session that misses an update is removed, so no registered client
    /// is left holding a stale value. It gets a fresh snapshot on reconnect.
    fn deliver(sessions: &mut HashMap<Uuid, RegisteredSession<S>>, state: &StatusState) -> usize {
        let mut delivered = 0;
        sessions.retain(|id, registered| match registered.sink.send(state) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(SessionSendError::Lagging) => {
                warn!("Client session {id} is lagging behind '{}', removing it", state.value);
                false
            }
            Err(SessionSendError::Closed) => {
                warn!("Client session {id} is gone, removing it");
                false
            }
        });
        delivered
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, RegisteredSession<S>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
