//! Integration tests for the Orderain storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p orderain-integration-tests
//! ```
//!
//! No network or database is needed: [`MockBackend`] stands in for the
//! commerce backend with `wiremock`, and carts are persisted under unique
//! directories in the OS temp dir.
//!
//! # Test Categories
//!
//! - `cart_persistence` - File-backed cart store across service instances
//! - `checkout_flow` - Cart to placed order over HTTP
//! - `catalog` - Listing query encoding and degraded reads

use std::path::PathBuf;
use std::time::Duration;

use orderain_core::PaymentMethod;
use orderain_storefront::api::{CachedCommerceClient, HttpCommerceClient};
use orderain_storefront::cart::{CartService, FileStorage, PersistentCartStore};
use orderain_storefront::checkout::{CheckoutSession, OrderSubmitter};
use orderain_storefront::config::CommerceApiConfig;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shop ID every mocked path is served under.
pub const SHOP: &str = "test-shop";

pub type TestApi = CachedCommerceClient<HttpCommerceClient>;
pub type TestStore = PersistentCartStore<FileStorage>;

/// Wrap a payload in the backend's success envelope.
#[must_use]
pub fn success(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": "success", "data": data}))
}

/// A backend rejection with the given message.
#[must_use]
pub fn rejection(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({"status": "error", "message": message}))
}

/// Unique, not yet existing directory for a file-backed cart.
#[must_use]
pub fn temp_cart_dir() -> PathBuf {
    std::env::temp_dir().join(format!("orderain-it-{}", uuid::Uuid::new_v4()))
}

/// Mocked commerce backend.
pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    #[must_use]
    pub fn config(&self) -> CommerceApiConfig {
        let mut config = CommerceApiConfig::new(&self.server.uri(), SHOP)
            .unwrap_or_else(|e| panic!("mock server URI rejected: {e}"));
        config.timeout = Duration::from_secs(5);
        config
    }

    #[must_use]
    pub fn client(&self) -> TestApi {
        let config = self.config();
        let http = HttpCommerceClient::new(&config)
            .unwrap_or_else(|e| panic!("failed to build HTTP client: {e}"));
        CachedCommerceClient::new(http, config.lookup_cache_ttl)
    }

    /// A checkout session over this backend and a cart in `cart_dir`.
    #[must_use]
    pub fn session(&self, cart_dir: PathBuf) -> CheckoutSession<TestApi, TestStore> {
        CheckoutSession::new(OrderSubmitter::new(
            self.client(),
            CartService::new(PersistentCartStore::new(FileStorage::new(cart_dir))),
            SHOP.into(),
            PaymentMethod::Cod,
        ))
    }

    /// Respond to `GET /{path}` with a success envelope.
    pub async fn get(&self, route: &str, data: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{route}")))
            .respond_with(success(data))
            .mount(&self.server)
            .await;
    }

    /// One country (1) → one state (10) → two cities (100, 101).
    pub async fn mount_locations(&self) {
        self.get(
            &format!("get-shop-shipping-zone-countries/{SHOP}"),
            json!([{"id": 1, "name": "Pakistan"}]),
        )
        .await;
        self.get(
            &format!("get-shop-shipping-zone-states/{SHOP}/1"),
            json!([{"id": 10, "name": "Punjab"}]),
        )
        .await;
        self.get(
            &format!("get-shop-shipping-zone-cities/{SHOP}/1/10"),
            json!([{"id": 100, "name": "Lahore"}, {"id": 101, "name": "Multan"}]),
        )
        .await;
    }

    /// Cart summary of 20.00 with 1.50 tax and 0.5 kg weight.
    pub async fn mount_summary(&self) {
        Mock::given(method("POST"))
            .and(path("/guest-user-show-cart"))
            .respond_with(success(json!({
                "sub_total": "20.00",
                "tax_amount": "1.50",
                "totalDiscount": "0.00",
                "extra_charges": [],
                "total": "21.50",
                "cart_item_weight": "0.5",
                "currency_icon": "$"
            })))
            .mount(&self.server)
            .await;
    }
}
