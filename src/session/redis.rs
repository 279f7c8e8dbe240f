use async_trait::async_trait;
use std::time::Duration;
use tracing::error;

use super::{SessionStore, WizardSession};
use crate::errors::ServiceError;

/// Redis-backed session store: JSON values under `<namespace>:<token>` with a TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    namespace: String,
    ttl: Duration,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("namespace", &self.namespace)
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn redis_error(e: redis::RedisError) -> ServiceError {
    error!(error = %e, "Redis session store error");
    ServiceError::SessionError(e.to_string())
}

impl RedisSessionStore {
    /// Open the client and check the server answers a PING.
    pub async fn connect(url: &str, namespace: &str, ttl: Duration) -> Result<Self, ServiceError> {
        let client = redis::Client::open(url).map_err(redis_error)?;
        let mut conn = client.get_async_connection().await.map_err(redis_error)?;
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(redis_error)?;

        Ok(Self {
            client,
            namespace: namespace.to_string(),
            ttl,
        })
    }

    fn key(&self, token: &str) -> String {
        format!("{}:{}", self.namespace, token)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, token: &str) -> Result<Option<WizardSession>, ServiceError> {
        let mut conn = self.client.get_async_connection().await.map_err(redis_error)?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(self.key(token))
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, token: &str, session: &WizardSession) -> Result<(), ServiceError> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.client.get_async_connection().await.map_err(redis_error)?;
        redis::cmd("SETEX")
            .arg(self.key(token))
            .arg(self.ttl.as_secs().max(1))
            .arg(json)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(redis_error)
    }

    async fn remove(&self, token: &str) -> Result<(), ServiceError> {
        let mut conn = self.client.get_async_connection().await.map_err(redis_error)?;
        redis::cmd("DEL")
            .arg(self.key(token))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(redis_error)
    }
}
