//! Catalog reads.
//!
//! Listing pages must render even when the backend is down, so every read
//! here degrades to an empty result and logs a warning instead of failing.

use orderain_core::{ProductId, TagId};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::api::{Category, CommerceApi, Product, ProductPage, ProductQuery, TagProducts};

/// Product card data derived from a backend product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    /// Price shown on the card.
    pub price: Decimal,
    /// Pre-discount price, shown struck through.
    pub old_price: Option<Decimal>,
    /// Discount percentage.
    pub discount: Option<Decimal>,
    pub in_stock: bool,
    pub has_variants: bool,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        let price = if product.price.is_zero() {
            product
                .default_variant()
                .map_or(Decimal::ZERO, |variant| variant.price)
        } else {
            product.price
        };

        let discount = product
            .discount
            .filter(|d| *d > Decimal::ZERO && *d < Decimal::ONE_HUNDRED);
        let old_price = discount.and_then(|d| {
            let remaining = Decimal::ONE - d / Decimal::ONE_HUNDRED;
            price
                .checked_div(remaining)
                .map(|p| p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        });

        let in_stock = if product.has_variants() {
            product.variants.iter().any(|v| v.quantity > 0)
        } else {
            product.quantity > 0
        };

        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            image: product.images.first().cloned(),
            price,
            old_price,
            discount,
            in_stock,
            has_variants: product.has_variants(),
        }
    }
}

/// Degrading read access to the catalog.
#[derive(Debug, Clone)]
pub struct Catalog<A> {
    api: A,
}

impl<A: CommerceApi> Catalog<A> {
    #[must_use]
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// One page of products; an empty page when the backend fails.
    pub async fn products(&self, query: &ProductQuery) -> ProductPage {
        match self.api.list_products(query).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Failed to load products");
                ProductPage::default()
            }
        }
    }

    /// Product detail; `None` when missing or the backend fails.
    pub async fn product(&self, slug: &str) -> Option<Product> {
        match self.api.get_product(slug).await {
            Ok(product) => Some(product),
            Err(e) => {
                warn!(error = %e, slug = %slug, "Failed to load product");
                None
            }
        }
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.api.list_categories().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load categories");
            Vec::new()
        })
    }

    /// Products associated with a tag.
    pub async fn tag_products(&self, tag: TagId) -> TagProducts {
        self.api.tag_products(tag).await.unwrap_or_else(|e| {
            warn!(error = %e, tag = %tag, "Failed to load tag products");
            TagProducts::default()
        })
    }
}
