//! HTTP implementation of [`CommerceApi`].

use std::sync::Arc;

use orderain_core::{CountryId, OrderId, ShopId, StateId, TagId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::query::ProductQuery;
use super::types::{
    Category, City, Country, CartSummary, Envelope, OrderCreated, OrderDetails, OrderRequest,
    Product, ProductPage, ShippingRate, ShippingRateRequest, State, TagProducts,
};
use super::{ApiError, CommerceApi};
use crate::cart::CartPayload;
use crate::config::CommerceApiConfig;

const USER_AGENT: &str = concat!("orderain-storefront/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body characters written to logs.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// HttpCommerceClient
// =============================================================================

/// JSON client for the commerce backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpCommerceClient {
    inner: Arc<HttpCommerceClientInner>,
}

struct HttpCommerceClientInner {
    client: reqwest::Client,
    base_url: Url,
    shop_id: ShopId,
}

impl std::fmt::Debug for HttpCommerceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCommerceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("shop_id", &self.inner.shop_id)
            .finish_non_exhaustive()
    }
}

impl HttpCommerceClient {
    /// Create a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CommerceApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpCommerceClientInner {
                client,
                base_url: config.base_url.clone(),
                shop_id: config.shop_id.clone(),
            }),
        })
    }

    #[must_use]
    pub fn shop_id(&self) -> &ShopId {
        &self.inner.shop_id
    }

    /// Build `<base>/<segments...>` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!(url = %url, "GET");
        let response = self.inner.client.get(url).query(query).send().await?;
        Self::handle(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(url = %url, "POST");
        let response = self.inner.client.post(url).json(body).send().await?;
        Self::handle(response).await
    }

    /// Unwrap the `{status, message, data}` envelope.
    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                "Commerce API returned non-success status"
            );
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|envelope| envelope.message)
                .filter(|m| !m.trim().is_empty());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
                    "Failed to parse commerce API response"
                );
                return Err(ApiError::Parse(e));
            }
        };

        if !envelope.is_success() {
            return Err(ApiError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Request failed".to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::MissingData("response has no data".to_string()))
    }
}

impl CommerceApi for HttpCommerceClient {
    #[instrument(skip(self))]
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let url = self.url(&["get-all-products", self.inner.shop_id.as_str()])?;
        self.get(url, &query.to_pairs()).await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, slug: &str) -> Result<Product, ApiError> {
        let url = self.url(&["get-product", self.inner.shop_id.as_str(), slug])?;
        self.get(url, &[("image_mode", "detailed".to_string())])
            .await
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.url(&["get-all-product-categories", self.inner.shop_id.as_str()])?;
        self.get(url, &[]).await
    }

    #[instrument(skip(self))]
    async fn tag_products(&self, tag: TagId) -> Result<TagProducts, ApiError> {
        let tag = tag.to_string();
        let url = self.url(&["get-shop-tag", self.inner.shop_id.as_str(), &tag])?;
        self.get(url, &[]).await
    }

    #[instrument(skip(self))]
    async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        let url = self.url(&[
            "get-shop-shipping-zone-countries",
            self.inner.shop_id.as_str(),
        ])?;
        self.get(url, &[]).await
    }

    #[instrument(skip(self))]
    async fn states(&self, country: CountryId) -> Result<Vec<State>, ApiError> {
        let country = country.to_string();
        let url = self.url(&[
            "get-shop-shipping-zone-states",
            self.inner.shop_id.as_str(),
            &country,
        ])?;
        self.get(url, &[]).await
    }

    #[instrument(skip(self))]
    async fn cities(&self, country: CountryId, state: StateId) -> Result<Vec<City>, ApiError> {
        let country = country.to_string();
        let state = state.to_string();
        let url = self.url(&[
            "get-shop-shipping-zone-cities",
            self.inner.shop_id.as_str(),
            &country,
            &state,
        ])?;
        self.get(url, &[]).await
    }

    #[instrument(skip(self))]
    async fn shipping_rate(&self, request: &ShippingRateRequest) -> Result<ShippingRate, ApiError> {
        let url = self.url(&["get-order-shipping-rate", self.inner.shop_id.as_str()])?;
        let query = [
            ("country_id", request.country_id.to_string()),
            ("sub_total", request.sub_total.to_string()),
            ("cart_item_weight", request.cart_item_weight.to_string()),
            ("state_id", request.state_id.to_string()),
            ("city_id", request.city_id.to_string()),
        ];
        self.get(url, &query).await
    }

    #[instrument(skip(self, cart), fields(lines = cart.items.len()))]
    async fn cart_summary(&self, cart: &CartPayload) -> Result<CartSummary, ApiError> {
        let url = self.url(&["guest-user-show-cart"])?;
        self.post(url, cart).await
    }

    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderCreated, ApiError> {
        let url = self.url(&["create-order"])?;
        self.post(url, order).await
    }

    #[instrument(skip(self))]
    async fn get_order(&self, order_id: OrderId) -> Result<OrderDetails, ApiError> {
        let order_id = order_id.to_string();
        let url = self.url(&["get-order", self.inner.shop_id.as_str(), &order_id])?;
        self.get(url, &[]).await
    }
}
