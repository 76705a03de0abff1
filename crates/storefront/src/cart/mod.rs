//! Local cart subsystem.
//!
//! # Architecture
//!
//! - [`storage`] - Key-value persistence (the `localStorage` analogue)
//! - [`store`] - Cart serialisation under one well-known key, plus change signals
//! - [`events`] - Level-triggered "cart changed" notifications
//! - [`service`] - The only sanctioned way to mutate a cart
//!
//! Lines are identified by `(product_id, variant_id)`. A cart never holds two
//! lines with the same identity and never holds a line with quantity zero; both
//! rules are re-established whenever a cart is built from stored data.

pub mod events;
pub mod service;
pub mod storage;
pub mod store;

pub use events::{CartEvents, CartSubscription};
pub use service::{CartError, CartService};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore, PersistentCartStore};

use orderain_core::{ProductId, VariantId, checked_sum, parse_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::api::de::{id_string, opt_id_string};

// =============================================================================
// Line Types
// =============================================================================

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    /// `None` for simple (non-variant) products.
    pub variant_id: Option<VariantId>,
}

impl LineKey {
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, variant_id: Option<VariantId>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id,
        }
    }

    /// Key for a simple product without variants.
    #[must_use]
    pub fn simple(product_id: impl Into<ProductId>) -> Self {
        Self::new(product_id, None)
    }

    /// Key for a specific product variant.
    #[must_use]
    pub fn variant(product_id: impl Into<ProductId>, variant_id: impl Into<VariantId>) -> Self {
        Self::new(product_id, Some(variant_id.into()))
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.variant_id {
            Some(variant) => write!(f, "{}/{}", self.product_id, variant),
            None => write!(f, "{}", self.product_id),
        }
    }
}

/// Display cache stored alongside a line.
///
/// Never authoritative: prices are re-derived by the backend for summaries
/// and orders, so this data is stripped from every API payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Unit price as a decimal string.
    #[serde(default = "default_price")]
    pub price: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub variant_name: Option<String>,
}

fn default_price() -> String {
    "0.00".to_string()
}

impl Default for CartLineDetails {
    fn default() -> Self {
        Self {
            name: String::new(),
            image: String::new(),
            price: default_price(),
            slug: String::new(),
            variant_name: None,
        }
    }
}

impl CartLineDetails {
    /// Unit price, or zero when the cached price is not a number.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        parse_amount(&self.price).unwrap_or(Decimal::ZERO)
    }
}

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(deserialize_with = "id_string")]
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub variant_id: Option<VariantId>,
    #[serde(rename = "unit_qty", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub details: CartLineDetails,
}

impl CartLine {
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id.clone(),
            variant_id: self.variant_id.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.variant_id == key.variant_id
    }

    /// Price times quantity from the display cache; zero if that overflows.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.details
            .unit_price()
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or_else(|| {
                warn!(
                    line = %self.key(),
                    price = %self.details.price,
                    "Line total overflowed, counting as zero"
                );
                Decimal::ZERO
            })
    }
}

/// Stored quantities may be negative or fractional if storage was edited by
/// hand; clamp them into range and let normalisation drop the zeros.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if !raw.is_finite() || raw <= 0.0 {
        return Ok(0);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped above
    let quantity = raw.min(f64::from(u32::MAX)).floor() as u32;
    Ok(quantity)
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered collection of cart lines, unique by [`LineKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl From<Vec<CartLine>> for Cart {
    /// Builds a cart, merging duplicate identities (first position wins) and
    /// dropping lines whose quantity is zero.
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::default();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            let key = line.key();
            cart.merge(&key, line.quantity, line.details);
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn find(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    #[must_use]
    pub fn contains(&self, key: &LineKey) -> bool {
        self.find(key).is_some()
    }

    /// Quantity of a line, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, key: &LineKey) -> u32 {
        self.find(key).map_or(0, |line| line.quantity)
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Subtotal computed from cached display prices.
    ///
    /// For display only; checkout always uses the backend cart summary.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        checked_sum(self.lines.iter().map(CartLine::line_total)).unwrap_or_else(|| {
            warn!(lines = self.lines.len(), "Cart subtotal overflowed, showing zero");
            Decimal::ZERO
        })
    }

    /// The minimal shape the summary and order endpoints expect.
    #[must_use]
    pub fn to_api_payload(&self) -> CartPayload {
        CartPayload {
            items: self
                .lines
                .iter()
                .map(|line| CartPayloadItem {
                    product_id: line.product_id.clone(),
                    variant_id: line.variant_id.clone(),
                    unit_qty: line.quantity,
                })
                .collect(),
        }
    }

    /// Add to an existing line or append a new one.
    pub(crate) fn merge(&mut self, key: &LineKey, quantity: u32, details: CartLineDetails) {
        if let Some(line) = self.lines.iter_mut().find(|line| line.matches(key)) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                product_id: key.product_id.clone(),
                variant_id: key.variant_id.clone(),
                quantity,
                details,
            });
        }
    }

    /// Overwrite a line's quantity; non-positive quantities remove the line.
    ///
    /// Returns `false` when no line matches.
    pub(crate) fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> bool {
        let Some(index) = self.lines.iter().position(|line| line.matches(key)) else {
            return false;
        };
        if quantity <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove a line. Returns `false` when no line matches.
    pub(crate) fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(key));
        self.lines.len() != before
    }
}

// =============================================================================
// API Payload
// =============================================================================

/// Cart contents without display details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartPayload {
    pub items: Vec<CartPayloadItem>,
}

/// One line of a [`CartPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartPayloadItem {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub unit_qty: u32,
}
