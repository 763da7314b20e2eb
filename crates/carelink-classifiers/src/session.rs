//! Per-session clarification state
//!
//! Each session owns one [`ClarificationSlot`] behind an async mutex. A turn
//! holds the lock from classification until the new slot is written, so turns
//! within a session apply in order while sessions proceed independently.

use carelink_core::ClarificationSlot;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to one session's slot
pub type SessionSlot = Arc<tokio::sync::Mutex<ClarificationSlot>>;

struct SessionEntry {
    slot: SessionSlot,
    last_used: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<String, SessionEntry>,
    tick: u64,
}

/// Bounded store of clarification slots keyed by session id.
///
/// When full, the least recently used session is evicted.
pub struct SessionStore {
    inner: Mutex<Sessions>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Sessions::default()),
            capacity: capacity.max(1),
        }
    }

    /// Slot for a session, created empty on first use
    pub fn session(&self, id: &str) -> SessionSlot {
        let mut sessions = self.inner.lock();
        sessions.tick += 1;
        let tick = sessions.tick;

        if let Some(entry) = sessions.entries.get_mut(id) {
            entry.last_used = tick;
            return entry.slot.clone();
        }

        if sessions.entries.len() >= self.capacity {
            let oldest = sessions
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.entries.remove(&oldest);
                debug!(session = %oldest, "Evicted least recently used session");
            }
        }

        let slot = SessionSlot::default();
        sessions.entries.insert(
            id.to_string(),
            SessionEntry {
                slot: slot.clone(),
                last_used: tick,
            },
        );
        slot
    }

    /// Current slot of a session, without creating it
    pub async fn get(&self, id: &str) -> Option<ClarificationSlot> {
        let slot = self.inner.lock().entries.get(id).map(|e| e.slot.clone())?;
        let current = slot.lock().await.clone();
        Some(current)
    }

    /// Forget a session. Returns whether it existed.
    pub fn reset(&self, id: &str) -> bool {
        self.inner.lock().entries.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}
