//! In-memory TTL stores backed by DashMap.
//!
//! Expiry is enforced on every read, so correctness never depends on the
//! background sweeper; the sweeper only bounds memory held by abandoned
//! records.

use super::{SessionRecord, SessionStore, StateRecord, StateStore, StoreError};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStateStore {
    states: Arc<DashMap<String, StateRecord>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired records. Called by the sweeper.
    ///
    /// Removals are counted inside `retain`; comparing `len()` before and
    /// after would race with concurrent `put`s.
    pub fn sweep_expired(&self) -> usize {
        let mut swept = 0;
        self.states.retain(|_, record| {
            let keep = !record.is_expired();
            if !keep {
                swept += 1;
            }
            keep
        });
        swept
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn put(&self, record: StateRecord) -> Result<(), StoreError> {
        self.states.insert(record.state.clone(), record);
        Ok(())
    }

    fn take(&self, state: &str) -> Result<Option<StateRecord>, StoreError> {
        // DashMap::remove is atomic: of two racing callers, exactly one
        // observes the record.
        let record = match self.states.remove(state) {
            Some((_, record)) => record,
            None => return Ok(None),
        };

        if record.is_expired() {
            return Ok(None);
        }

        Ok(Some(record))
    }

    fn delete(&self, state: &str) -> Result<(), StoreError> {
        self.states.remove(state);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sweep_expired(&self) -> usize {
        let mut swept = 0;
        self.sessions.retain(|_, record| {
            let keep = !record.is_expired();
            if !keep {
                swept += 1;
            }
            keep
        });
        swept
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, record: SessionRecord) -> Result<(), StoreError> {
        self.sessions.insert(record.session_token.clone(), record);
        Ok(())
    }

    fn get(&self, session_token: &str) -> Result<Option<SessionRecord>, StoreError> {
        let record = match self.sessions.get(session_token) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };

        if record.is_expired() {
            // Expired-but-unreaped means absent; drop it now.
            self.sessions.remove(session_token);
            return Ok(None);
        }

        Ok(Some(record))
    }

    fn delete(&self, session_token: &str) -> Result<(), StoreError> {
        self.sessions.remove(session_token);
        Ok(())
    }
}

/// Background task that periodically reaps expired records from both stores.
pub async fn run_expiry_sweeper(
    states: MemoryStateStore,
    sessions: MemorySessionStore,
    interval_seconds: u64,
) {
    let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        let swept_states = states.sweep_expired();
        let swept_sessions = sessions.sweep_expired();
        tracing::debug!(
            swept_states,
            swept_sessions,
            active_states = states.len(),
            active_sessions = sessions.len(),
            "expiry sweep complete"
        );
    }
}
