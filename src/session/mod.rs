//! Server-side staging for the setup wizard.
//!
//! Each browser holds a session token (`x-session-id` header or `session_id`
//! cookie). Wizard screens write validated sections into the
//! [`WizardSession`] stored under that token; nothing reaches the database
//! until the commit step.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderName, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::dto::{
    BusinessDetailsInput, CustomerInput, EquipmentInput, InventoryInput, StagedService,
    SupplierInput, SystemSettingsInput,
};
use crate::errors::ServiceError;

pub mod memory;
pub mod redis;

pub use memory::InMemorySessionStore;
pub use redis::RedisSessionStore;

pub const SESSION_HEADER: &str = "x-session-id";
pub const SESSION_COOKIE: &str = "session_id";

/// A material as staged under its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedMaterial {
    pub name: String,
    pub unit: String,
    pub stock_level: i32,
    pub reorder_threshold: i32,
    pub supplier: Option<String>,
}

impl StagedMaterial {
    pub fn from_input(input: InventoryInput) -> (String, Self) {
        (
            input.category,
            StagedMaterial {
                name: input.name,
                unit: input.unit_of_measurement,
                stock_level: input.stock_level,
                reorder_threshold: input.reorder_threshold,
                supplier: input.supplier.filter(|s| !s.trim().is_empty()),
            },
        )
    }

    /// The form view of this material, for re-validation.
    pub fn as_input(&self, category: &str) -> InventoryInput {
        InventoryInput {
            name: self.name.clone(),
            category: category.to_string(),
            supplier: self.supplier.clone(),
            stock_level: self.stock_level,
            reorder_threshold: self.reorder_threshold,
            unit_of_measurement: self.unit.clone(),
        }
    }
}

/// Everything the wizard has staged for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardSession {
    #[serde(default)]
    pub business_details: Option<BusinessDetailsInput>,
    #[serde(default)]
    pub services_data: Vec<StagedService>,
    #[serde(default)]
    pub current_service: Option<StagedService>,
    #[serde(default)]
    pub equipment: Vec<EquipmentInput>,
    /// Category name to the materials staged under it.
    #[serde(default)]
    pub inventory: BTreeMap<String, Vec<StagedMaterial>>,
    #[serde(default)]
    pub supplier: Vec<SupplierInput>,
    #[serde(default)]
    pub customer: Vec<CustomerInput>,
    #[serde(default)]
    pub system_settings: Option<SystemSettingsInput>,
}

impl WizardSession {
    pub fn is_empty(&self) -> bool {
        *self == WizardSession::default()
    }
}

/// Storage for wizard sessions, keyed by session token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> Result<Option<WizardSession>, ServiceError>;
    async fn save(&self, token: &str, session: &WizardSession) -> Result<(), ServiceError>;
    async fn remove(&self, token: &str) -> Result<(), ServiceError>;

    /// The stored session, or an empty one for a new token.
    async fn load_or_default(&self, token: &str) -> Result<WizardSession, ServiceError> {
        Ok(self.load(token).await?.unwrap_or_default())
    }
}

/// Build the configured session backend. An unreachable Redis falls back to memory.
pub async fn create_session_store(config: &AppConfig) -> Arc<dyn SessionStore> {
    let ttl = config.session_ttl();
    if config.session_backend == "redis" {
        match RedisSessionStore::connect(&config.redis_url, &config.session_namespace, ttl).await {
            Ok(store) => {
                info!("Using Redis session store");
                return Arc::new(store);
            }
            Err(e) => {
                warn!(error = %e, "Redis session store unavailable, falling back to in-memory");
            }
        }
    }
    info!("Using in-memory session store");
    Arc::new(InMemorySessionStore::new(ttl))
}

/// The caller's session token. A fresh one is minted when none was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_cookie_header(value: &str) -> Option<String> {
        value
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, token)| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let token = from_header
            .or_else(|| {
                parts
                    .headers
                    .get_all(header::COOKIE)
                    .iter()
                    .filter_map(|v| v.to_str().ok())
                    .find_map(SessionToken::from_cookie_header)
            })
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(SessionToken(token))
    }
}

/// Echo the token so clients can keep using it.
impl IntoResponseParts for SessionToken {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Ok(value) = HeaderValue::from_str(&self.0) {
            res.headers_mut()
                .insert(HeaderName::from_static(SESSION_HEADER), value);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> SessionToken {
        let (mut parts, _) = request.into_parts();
        SessionToken::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn token_comes_from_header_then_cookie() {
        let token = extract(
            Request::builder()
                .header(SESSION_HEADER, "abc")
                .header(header::COOKIE, "session_id=def")
                .body(())
                .unwrap(),
        )
        .await;
        assert_eq!(token.as_str(), "abc");

        let token = extract(
            Request::builder()
                .header(header::COOKIE, "theme=dark; session_id=def")
                .body(())
                .unwrap(),
        )
        .await;
        assert_eq!(token.as_str(), "def");
    }

    #[tokio::test]
    async fn missing_token_mints_a_uuid() {
        let token = extract(Request::builder().body(()).unwrap()).await;
        assert!(Uuid::parse_str(token.as_str()).is_ok());
    }

    #[test]
    fn empty_supplier_is_not_staged() {
        let (category, material) = StagedMaterial::from_input(InventoryInput {
            name: "Glossy Sticker Paper".into(),
            category: "Paper".into(),
            supplier: Some("  ".into()),
            stock_level: 40,
            reorder_threshold: 10,
            unit_of_measurement: "sheets".into(),
        });
        assert_eq!(category, "Paper");
        assert_eq!(material.supplier, None);
        assert_eq!(material.as_input("Paper").unit_of_measurement, "sheets");
    }

    #[test]
    fn session_deserializes_with_missing_sections() {
        let session: WizardSession = serde_json::from_str("{}").unwrap();
        assert!(session.is_empty());
    }
}
