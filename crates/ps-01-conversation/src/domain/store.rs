//! Session store: at most one session per identity.

use super::session::Session;
use shared_types::{Identity, Timestamp};
use std::collections::HashMap;

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<Identity, Session>,
    timeout_ms: u64,
}

impl SessionStore {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            timeout_ms,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn get(&self, identity: &Identity) -> Option<&Session> {
        self.sessions.get(identity)
    }

    pub fn get_mut(&mut self, identity: &Identity) -> Option<&mut Session> {
        self.sessions.get_mut(identity)
    }

    /// Install `session`, replacing any previous one for the same identity.
    pub fn put(&mut self, session: Session) -> Option<Session> {
        self.sessions.insert(session.identity.clone(), session)
    }

    pub fn remove(&mut self, identity: &Identity) -> Option<Session> {
        self.sessions.remove(identity)
    }

    /// Remove the identity's session if it has been idle past the timeout.
    pub fn expire(&mut self, identity: &Identity, now: Timestamp) -> Option<Session> {
        let expired = self
            .sessions
            .get(identity)
            .is_some_and(|s| s.is_expired(now, self.timeout_ms));
        if expired {
            self.sessions.remove(identity)
        } else {
            None
        }
    }

    /// Remove every stale session.
    pub fn expire_all(&mut self, now: Timestamp) -> Vec<Session> {
        let stale: Vec<Identity> = self
            .sessions
            .values()
            .filter(|s| s.is_expired(now, self.timeout_ms))
            .map(|s| s.identity.clone())
            .collect();
        stale
            .iter()
            .filter_map(|identity| self.sessions.remove(identity))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
