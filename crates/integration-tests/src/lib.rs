//! Integration tests for Summit Gear.
//!
//! Tests run the real router in-process against the in-memory storage
//! adapter, so no database or running server is required:
//!
//! ```bash
//! cargo test -p summit-integration-tests
//! ```
//!
//! Every request goes through the full axum stack (routing, extractors,
//! auth middleware, error mapping), exactly as production traffic would.

#![allow(clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use summit_api::config::{ApiConfig, StoreBackend};
use summit_api::routes;
use summit_api::state::AppState;
use summit_api::store::Store;
use summit_api::store::memory::MemoryStore;

/// A router wired to a fresh in-memory store, plus direct store access for
/// seeding and assertions.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = ApiConfig {
            database_url: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            store_backend: StoreBackend::Memory,
            jwt_secret: SecretString::from("kJ8mNp2qRt5vWx7yZa3bCd6eFg9hLw4s"),
            jwt_expires_hours: 1,
            upload_dir: std::env::temp_dir().join("summit-test-uploads"),
        };
        let state = AppState::new(config, Arc::clone(&store) as Arc<dyn Store>);
        Self {
            router: routes::router(state),
            store,
        }
    }

    /// Send a request and return status plus parsed JSON body (Null for an
    /// empty body).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    /// Register an account and return its bearer token.
    pub async fn register(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "trailhead-9x",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register an account, promote it, and log in again so the token maps
    /// to an admin.
    pub async fn register_admin(&self, email: &str) -> String {
        let token = self.register("Admin", email).await;
        assert!(self.store.promote_to_admin(email).await);
        token
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed a product directly through the store, bypassing the admin
/// multipart form.
pub async fn seed_product(
    app: &TestApp,
    name: &str,
    price: rust_decimal::Decimal,
    stock: i32,
) -> summit_api::models::Product {
    app.store
        .create_product(summit_api::store::NewProduct {
            name: name.to_string(),
            slug: summit_core::slugify(name),
            description: None,
            specifications: None,
            brand: Some("Cairn".to_string()),
            price,
            discount_price: None,
            stock,
            category_id: None,
            images: Vec::new(),
            is_featured: false,
            is_trending: false,
            is_new_arrival: false,
            is_best_seller: false,
        })
        .await
        .unwrap()
}
