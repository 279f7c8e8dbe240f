use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use backoffice_api::{
    app_router,
    auth::NewUser,
    config::AppConfig,
    db,
    dto::{StagedOption, StagedPricing, StagedService},
    services::catalog::create_service_in,
    session::{InMemorySessionStore, SessionStore, SESSION_HEADER},
    AppState,
};

pub const SUPERUSER: (&str, &str) = ("admin", "admin-password-1");
pub const STAFF: (&str, &str) = ("clerk", "clerk-password-1");

/// Helper harness for spinning up the application on an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub superuser_token: String,
    pub staff_token: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // Every pooled connection to sqlite::memory: is its own database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let sessions: Arc<dyn SessionStore> =
            Arc::new(InMemorySessionStore::new(cfg.session_ttl()));
        let state = AppState::new(Arc::new(pool), cfg, sessions);

        let admin = state
            .auth
            .ensure_superuser(SUPERUSER.0, "admin@shop.test", SUPERUSER.1)
            .await
            .expect("create superuser");
        let clerk = state
            .auth
            .create_user(NewUser {
                username: STAFF.0.to_string(),
                email: "clerk@shop.test".to_string(),
                first_name: "Front".to_string(),
                last_name: "Desk".to_string(),
                password: STAFF.1.to_string(),
                is_staff: true,
                is_superuser: false,
            })
            .await
            .expect("create staff user");

        let superuser_token = state
            .auth
            .generate_token(&admin)
            .expect("superuser token")
            .access_token;
        let staff_token = state
            .auth
            .generate_token(&clerk)
            .expect("staff token")
            .access_token;

        Self {
            router: app_router(state.clone()),
            state,
            superuser_token,
            staff_token,
        }
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        self.send(method, uri, body, token, None).await
    }

    /// Send a wizard request bound to a session token.
    pub async fn request_in_session(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        session: &str,
    ) -> Response {
        self.send(method, uri, body, None, Some(session)).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
        session: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// A service with one "Size" option priced at 100.
    pub async fn seed_service(&self, name: &str) -> i32 {
        let staged = StagedService {
            name: name.to_string(),
            customization_options: vec![StagedOption {
                name: "Size".to_string(),
                pricing_options: vec![StagedPricing {
                    description: "A4".to_string(),
                    price: rust_decimal::Decimal::ONE_HUNDRED,
                }],
            }],
        };
        create_service_in(&*self.state.db, &staged)
            .await
            .expect("seed service")
            .service_id
    }

    /// Place an order for a walk-in customer and return its id.
    pub async fn create_order(&self, service_id: i32, customer_name: &str) -> i32 {
        let response = self
            .request(
                Method::POST,
                "/orders",
                Some(order_body(service_id, customer_name)),
                Some(&self.staff_token),
            )
            .await;
        assert_eq!(response.status(), 201, "order creation should succeed");
        let body = response_json(response).await;
        body["order"]["order_id"]
            .as_i64()
            .expect("order id in response") as i32
    }
}

pub fn order_body(service_id: i32, customer_name: &str) -> Value {
    json!({
        "service_id": service_id,
        "customer": {
            "name": customer_name,
            "contact_number": "09171234567",
            "email": "walkin@shop.test",
        },
        "job_specifications": {"size": "A4"},
        "deadline": (Utc::now() + Duration::days(3)).to_rfc3339(),
    })
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
