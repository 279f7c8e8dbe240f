use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{SessionStore, WizardSession};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
struct Entry {
    session: WizardSession,
    expires_at: Instant,
}

/// Process-local session store. Entries expire after the configured TTL.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    entries: Arc<DashMap<String, Entry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    fn prune(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(crate::config::DEFAULT_SESSION_TTL_SECS))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, token: &str) -> Result<Option<WizardSession>, ServiceError> {
        let now = Instant::now();
        let found = self
            .entries
            .get(token)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.session.clone());
        Ok(found)
    }

    async fn save(&self, token: &str, session: &WizardSession) -> Result<(), ServiceError> {
        self.prune();
        self.entries.insert(
            token.to_string(),
            Entry {
                session: session.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, token: &str) -> Result<(), ServiceError> {
        self.entries.remove(token);
        Ok(())
    }
}
