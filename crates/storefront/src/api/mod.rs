//! Commerce backend client.
//!
//! # Architecture
//!
//! - [`CommerceApi`] is the seam every consumer is written against, so the
//!   checkout controller and catalog can run against an in-memory fake
//! - [`HttpCommerceClient`] talks JSON over `reqwest`
//! - [`CachedCommerceClient`] wraps any implementation with `moka` caching for
//!   location and category lookups
//!
//! # Example
//!
//! ```rust,ignore
//! use orderain_storefront::api::{CommerceApi, HttpCommerceClient, ProductQuery};
//!
//! let client = HttpCommerceClient::new(&config.api)?;
//! let page = client.list_products(&ProductQuery::new().search("iphone")).await?;
//! let countries = client.countries().await?;
//! ```

mod cache;
mod client;
pub(crate) mod de;
pub mod query;
pub mod types;

pub use cache::CachedCommerceClient;
pub use client::HttpCommerceClient;
pub use query::{ProductQuery, SortBy, SortDirection};
pub use types::*;

use std::future::Future;
use std::sync::Arc;

use orderain_core::{CountryId, OrderId, StateId, TagId};
use thiserror::Error;

use crate::cart::CartPayload;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Backend answered but reported `status != "success"`.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Success envelope without a payload.
    #[error("Missing data in response: {0}")]
    MissingData(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Message suitable for an error banner.
    ///
    /// Backend-provided messages are passed through verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message)
            | Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Http(e) if e.is_timeout() => "The request timed out, please try again".to_string(),
            Self::Http(_) => "Could not reach the store, please try again".to_string(),
            Self::Status { .. } | Self::Parse(_) | Self::MissingData(_) | Self::Url(_) => {
                "The store returned an unexpected response".to_string()
            }
        }
    }
}

/// Operations the storefront needs from the commerce backend.
pub trait CommerceApi: Send + Sync {
    /// One page of the filtered product listing.
    fn list_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<ProductPage, ApiError>> + Send;

    /// Product detail by slug.
    fn get_product(&self, slug: &str) -> impl Future<Output = Result<Product, ApiError>> + Send;

    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

    /// Products associated with a tag.
    fn tag_products(&self, tag: TagId)
    -> impl Future<Output = Result<TagProducts, ApiError>> + Send;

    /// Countries the shop ships to.
    fn countries(&self) -> impl Future<Output = Result<Vec<Country>, ApiError>> + Send;

    /// States of a shipping country.
    fn states(
        &self,
        country: CountryId,
    ) -> impl Future<Output = Result<Vec<State>, ApiError>> + Send;

    /// Cities of a shipping state.
    fn cities(
        &self,
        country: CountryId,
        state: StateId,
    ) -> impl Future<Output = Result<Vec<City>, ApiError>> + Send;

    /// Delivery charge for a destination and cart weight.
    fn shipping_rate(
        &self,
        request: &ShippingRateRequest,
    ) -> impl Future<Output = Result<ShippingRate, ApiError>> + Send;

    /// Authoritative totals for a cart.
    fn cart_summary(
        &self,
        cart: &CartPayload,
    ) -> impl Future<Output = Result<CartSummary, ApiError>> + Send;

    /// Place an order.
    fn create_order(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<OrderCreated, ApiError>> + Send;

    /// Full order for the confirmation view.
    fn get_order(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<OrderDetails, ApiError>> + Send;
}

impl<T: CommerceApi> CommerceApi for Arc<T> {
    fn list_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<ProductPage, ApiError>> + Send {
        (**self).list_products(query)
    }

    fn get_product(&self, slug: &str) -> impl Future<Output = Result<Product, ApiError>> + Send {
        (**self).get_product(slug)
    }

    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send {
        (**self).list_categories()
    }

    fn tag_products(
        &self,
        tag: TagId,
    ) -> impl Future<Output = Result<TagProducts, ApiError>> + Send {
        (**self).tag_products(tag)
    }

    fn countries(&self) -> impl Future<Output = Result<Vec<Country>, ApiError>> + Send {
        (**self).countries()
    }

    fn states(
        &self,
        country: CountryId,
    ) -> impl Future<Output = Result<Vec<State>, ApiError>> + Send {
        (**self).states(country)
    }

    fn cities(
        &self,
        country: CountryId,
        state: StateId,
    ) -> impl Future<Output = Result<Vec<City>, ApiError>> + Send {
        (**self).cities(country, state)
    }

    fn shipping_rate(
        &self,
        request: &ShippingRateRequest,
    ) -> impl Future<Output = Result<ShippingRate, ApiError>> + Send {
        (**self).shipping_rate(request)
    }

    fn cart_summary(
        &self,
        cart: &CartPayload,
    ) -> impl Future<Output = Result<CartSummary, ApiError>> + Send {
        (**self).cart_summary(cart)
    }

    fn create_order(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<OrderCreated, ApiError>> + Send {
        (**self).create_order(order)
    }

    fn get_order(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<OrderDetails, ApiError>> + Send {
        (**self).get_order(order_id)
    }
}
