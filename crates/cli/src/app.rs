//! Shared clients for CLI commands.

use std::sync::Arc;

use orderain_storefront::StorefrontError;
use orderain_storefront::api::{ApiError, CachedCommerceClient, HttpCommerceClient};
use orderain_storefront::cart::{CartError, CartService, FileStorage, PersistentCartStore};
use orderain_storefront::catalog::Catalog;
use orderain_storefront::checkout::{CheckoutError, CheckoutSession, OrderSubmitter};
use orderain_storefront::config::StorefrontConfig;
use thiserror::Error;

pub type Api = Arc<CachedCommerceClient<HttpCommerceClient>>;
pub type Store = Arc<PersistentCartStore<FileStorage>>;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// The backend refused the order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

macro_rules! storefront_error {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for CliError {
                fn from(e: $ty) -> Self {
                    Self::Storefront(StorefrontError::from(e))
                }
            }
        )+
    };
}

storefront_error!(ApiError, CartError, CheckoutError);

/// Everything a command needs, built once from configuration.
pub struct App {
    pub config: StorefrontConfig,
    api: Api,
    store: Store,
}

impl App {
    /// Build the backend client and open the cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self, CliError> {
        let http = HttpCommerceClient::new(&config.api)?;
        let api = Arc::new(CachedCommerceClient::new(http, config.api.lookup_cache_ttl));
        let store = Arc::new(PersistentCartStore::new(FileStorage::new(
            config.cart_dir.clone(),
        )));

        tracing::debug!(
            api = %config.api.base_url,
            shop = %config.api.shop_id,
            cart_dir = %config.cart_dir.display(),
            "Storefront clients ready"
        );

        Ok(Self { config, api, store })
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn cart(&self) -> CartService<Store> {
        CartService::new(Arc::clone(&self.store))
    }

    pub fn catalog(&self) -> Catalog<Api> {
        Catalog::new(Arc::clone(&self.api))
    }

    pub fn checkout(&self) -> CheckoutSession<Api, Store> {
        CheckoutSession::new(OrderSubmitter::new(
            Arc::clone(&self.api),
            self.cart(),
            self.config.api.shop_id.clone(),
            self.config.payment_method,
        ))
    }
}
