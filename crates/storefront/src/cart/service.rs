//! Cart operations.
//!
//! [`CartService`] is the only code path that mutates a stored cart. Every
//! mutation re-reads the store, applies the change, persists, and raises one
//! cart-changed signal. Storage failures are logged and never surface to the
//! caller.

use orderain_core::{ProductId, VariantId, format_amount};
use thiserror::Error;
use tracing::{debug, error, instrument};

use super::events::CartSubscription;
use super::store::CartStore;
use super::{Cart, CartLine, CartLineDetails, CartPayload, LineKey};
use crate::api::{Product, ProductVariant};

/// Errors raised by cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantities added to a cart must be at least one.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("{name} is out of stock")]
    OutOfStock {
        name: String,
        product_id: ProductId,
        variant_id: Option<VariantId>,
    },

    /// The product has variants and none was chosen.
    #[error("Please select an option for {name}")]
    VariantRequired { name: String, product_id: ProductId },

    #[error("Product {product_id} has no variant {variant_id}")]
    UnknownVariant {
        product_id: ProductId,
        variant_id: VariantId,
    },
}

impl CartLineDetails {
    /// Display cache for a product as shown on its detail page.
    ///
    /// Variant price, image, and name take precedence over the product's.
    #[must_use]
    pub fn for_product(product: &Product, variant: Option<&ProductVariant>) -> Self {
        let image = variant
            .and_then(|v| v.image.clone())
            .filter(|image| !image.is_empty())
            .or_else(|| product.images.first().cloned())
            .unwrap_or_default();
        let price = variant.map_or(product.price, |v| v.price);

        Self {
            name: product.name.clone(),
            image,
            price: format_amount(price),
            slug: product.slug.clone(),
            variant_name: variant.map(|v| v.name.clone()).filter(|n| !n.is_empty()),
        }
    }
}

// =============================================================================
// CartService
// =============================================================================

/// Cart operations over a [`CartStore`].
///
/// Services sharing one store see each other's changes and never interleave
/// their updates. Across processes the last write wins.
#[derive(Debug)]
pub struct CartService<S> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Apply a change through the store. When it cannot be persisted the
    /// stored cart is returned unchanged.
    fn mutate(&self, apply: impl FnOnce(&mut Cart)) -> Cart {
        self.store.update(apply).unwrap_or_else(|e| {
            error!(error = %e, "Failed to persist cart");
            self.store.read()
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of a line, merging with an existing line of the
    /// same identity.
    ///
    /// The details of an existing line are kept; `details` is only used when
    /// a new line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] when `quantity` is zero.
    #[instrument(skip(self, details), fields(line = %key))]
    pub fn add_item(
        &self,
        key: &LineKey,
        quantity: u32,
        details: CartLineDetails,
    ) -> Result<Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let cart = self.mutate(|cart| cart.merge(key, quantity, details));
        debug!(quantity = cart.quantity_of(key), "Item added to cart");
        Ok(cart)
    }

    /// Add a catalog product, checking variant choice and stock first.
    ///
    /// # Errors
    ///
    /// Returns an error when the product needs a variant and none was given,
    /// when the variant is unknown, when the chosen item is out of stock, or
    /// when `quantity` is zero.
    pub fn add_product(
        &self,
        product: &Product,
        variant_id: Option<&VariantId>,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        let variant = match variant_id {
            Some(id) => Some(product.variant(id).ok_or_else(|| CartError::UnknownVariant {
                product_id: product.id.clone(),
                variant_id: id.clone(),
            })?),
            None if product.has_variants() => {
                return Err(CartError::VariantRequired {
                    name: product.name.clone(),
                    product_id: product.id.clone(),
                });
            }
            None => None,
        };

        let stock = variant.map_or(product.quantity, |v| v.quantity);
        if stock <= 0 {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
                product_id: product.id.clone(),
                variant_id: variant.map(|v| v.id.clone()),
            });
        }

        let key = LineKey::new(product.id.clone(), variant.map(|v| v.id.clone()));
        self.add_item(&key, quantity, CartLineDetails::for_product(product, variant))
    }

    /// Overwrite a line's quantity; zero or negative removes the line.
    ///
    /// Unknown lines are left alone, but the cart is still re-persisted and
    /// listeners notified.
    #[instrument(skip(self), fields(line = %key))]
    pub fn update_quantity(&self, key: &LineKey, quantity: i64) -> Cart {
        self.mutate(|cart| {
            if !cart.set_quantity(key, quantity) {
                debug!("No cart line to update");
            }
        })
    }

    #[instrument(skip(self), fields(line = %key))]
    pub fn remove_item(&self, key: &LineKey) -> Cart {
        self.mutate(|cart| {
            if !cart.remove(key) {
                debug!("No cart line to remove");
            }
        })
    }

    /// Empty the cart unconditionally.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Cart {
        self.mutate(|cart| *cart = Cart::new())
    }

    // =========================================================================
    // Queries (always read the live store)
    // =========================================================================

    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store.read()
    }

    #[must_use]
    pub fn items(&self) -> Vec<CartLine> {
        self.store.read().lines().to_vec()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.store.read().item_count()
    }

    #[must_use]
    pub fn has_item(&self, key: &LineKey) -> bool {
        self.store.read().contains(key)
    }

    #[must_use]
    pub fn item_quantity(&self, key: &LineKey) -> u32 {
        self.store.read().quantity_of(key)
    }

    #[must_use]
    pub fn to_api_payload(&self) -> CartPayload {
        self.store.read().to_api_payload()
    }

    /// Register a cart-changed listener.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        self.store.subscribe()
    }
}
