//! State and session stores.
//!
//! Two independent keyed collections with TTL expiry: anti-CSRF state tokens
//! (single-use, consumed on first valid callback) and sessions holding the
//! encrypted provider token (read-many until expiry). Handlers only ever see
//! transient copies of records; the store owns them.

mod memory;

pub use memory::{run_expiry_sweeper, MemorySessionStore, MemoryStateStore};

use chrono::{DateTime, Duration, Utc};

/// Anti-CSRF state token record.
#[derive(Clone, Debug)]
pub struct StateRecord {
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl StateRecord {
    pub fn new(state: String, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            state,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Session record holding the encrypted provider token.
///
/// `encrypted_provider_token` is ciphertext produced by
/// [`TokenCipher`](crate::crypto::TokenCipher); plaintext never enters the
/// store.
#[derive(Clone, Debug)]
pub struct SessionRecord {
    pub session_token: String,
    pub encrypted_provider_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_token: String, encrypted_provider_token: String, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            session_token,
            encrypted_provider_token,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Store-level failures (backend unavailable, etc). The in-memory stores are
/// infallible but the handlers must not assume that of every backend.
#[derive(Debug, thiserror::Error)]
#[error("store operation failed: {0}")]
pub struct StoreError(pub String);

/// Anti-CSRF state token store.
pub trait StateStore: Send + Sync {
    fn put(&self, record: StateRecord) -> Result<(), StoreError>;

    /// Atomically removes and returns the record for `state`.
    ///
    /// This is the only read path: consumption and lookup are a single
    /// operation, so two callers racing on the same state cannot both
    /// succeed. Expired records are removed but reported as `None`.
    fn take(&self, state: &str) -> Result<Option<StateRecord>, StoreError>;

    fn delete(&self, state: &str) -> Result<(), StoreError>;
}

/// Session store. Reads do not consume; sessions live until TTL expiry.
pub trait SessionStore: Send + Sync {
    fn put(&self, record: SessionRecord) -> Result<(), StoreError>;

    /// Returns the record for `session_token`, treating expired records as
    /// absent.
    fn get(&self, session_token: &str) -> Result<Option<SessionRecord>, StoreError>;

    fn delete(&self, session_token: &str) -> Result<(), StoreError>;
}
