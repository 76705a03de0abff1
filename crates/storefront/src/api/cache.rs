//! Caching decorator for [`CommerceApi`].
//!
//! Location lists and categories change rarely and are fetched on every
//! checkout, so they are cached for a configurable TTL. Everything tied to a
//! cart or an order passes straight through.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use orderain_core::{CountryId, OrderId, StateId, TagId};
use tracing::debug;

use super::query::ProductQuery;
use super::types::{
    CartSummary, Category, City, Country, OrderCreated, OrderDetails, OrderRequest, Product,
    ProductPage, ShippingRate, ShippingRateRequest, State, TagProducts,
};
use super::{ApiError, CommerceApi};
use crate::cart::CartPayload;

const MAX_ENTRIES: u64 = 1000;

/// Cache key for lookup lists.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Categories,
    Countries,
    States(CountryId),
    Cities(CountryId, StateId),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Categories(Arc<Vec<Category>>),
    Countries(Arc<Vec<Country>>),
    States(Arc<Vec<State>>),
    Cities(Arc<Vec<City>>),
}

/// [`CommerceApi`] wrapper that caches successful lookup responses.
///
/// Failures are never cached, so a transient error is retried on the next
/// call.
#[derive(Clone)]
pub struct CachedCommerceClient<A> {
    inner: A,
    cache: Cache<CacheKey, CacheValue>,
}

impl<A> CachedCommerceClient<A> {
    #[must_use]
    pub fn new(inner: A, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }

    #[must_use]
    pub const fn inner(&self) -> &A {
        &self.inner
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

impl<A: CommerceApi> CommerceApi for CachedCommerceClient<A> {
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        self.inner.list_products(query).await
    }

    async fn get_product(&self, slug: &str) -> Result<Product, ApiError> {
        self.inner.get_product(slug).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories.as_ref().clone());
        }

        let categories = self.inner.list_categories().await?;
        self.cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::new(categories.clone())),
            )
            .await;
        Ok(categories)
    }

    async fn tag_products(&self, tag: TagId) -> Result<TagProducts, ApiError> {
        self.inner.tag_products(tag).await
    }

    async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        if let Some(CacheValue::Countries(countries)) = self.cache.get(&CacheKey::Countries).await
        {
            debug!("Cache hit for countries");
            return Ok(countries.as_ref().clone());
        }

        let countries = self.inner.countries().await?;
        self.cache
            .insert(
                CacheKey::Countries,
                CacheValue::Countries(Arc::new(countries.clone())),
            )
            .await;
        Ok(countries)
    }

    async fn states(&self, country: CountryId) -> Result<Vec<State>, ApiError> {
        let key = CacheKey::States(country);
        if let Some(CacheValue::States(states)) = self.cache.get(&key).await {
            debug!(country = %country, "Cache hit for states");
            return Ok(states.as_ref().clone());
        }

        let states = self.inner.states(country).await?;
        self.cache
            .insert(key, CacheValue::States(Arc::new(states.clone())))
            .await;
        Ok(states)
    }

    async fn cities(&self, country: CountryId, state: StateId) -> Result<Vec<City>, ApiError> {
        let key = CacheKey::Cities(country, state);
        if let Some(CacheValue::Cities(cities)) = self.cache.get(&key).await {
            debug!(country = %country, state = %state, "Cache hit for cities");
            return Ok(cities.as_ref().clone());
        }

        let cities = self.inner.cities(country, state).await?;
        self.cache
            .insert(key, CacheValue::Cities(Arc::new(cities.clone())))
            .await;
        Ok(cities)
    }

    // =========================================================================
    // Cart and order calls (not cached - depend on mutable state)
    // =========================================================================

    async fn shipping_rate(&self, request: &ShippingRateRequest) -> Result<ShippingRate, ApiError> {
        self.inner.shipping_rate(request).await
    }

    async fn cart_summary(&self, cart: &CartPayload) -> Result<CartSummary, ApiError> {
        self.inner.cart_summary(cart).await
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderCreated, ApiError> {
        self.inner.create_order(order).await
    }

    async fn get_order(&self, order_id: OrderId) -> Result<OrderDetails, ApiError> {
        self.inner.get_order(order_id).await
    }
}
