//! Domain types for the commerce backend.
//!
//! Field names follow the backend's JSON. Everything the client does not rely
//! on is optional so that additive backend changes never break decoding.

use chrono::{DateTime, Utc};
use orderain_core::{
    CategoryId, CityId, CountryId, CustomerType, Money, OrderId, OrderStatus, PaymentMethod,
    ProductId, ShopId, StateId, VariantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::de::{
    decimal_or_zero, id_string, null_as_default, opt_datetime, opt_decimal, opt_id_string,
};
use crate::cart::CartPayloadItem;

// =============================================================================
// Envelope
// =============================================================================

/// Standard backend response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// `"success"` on success; anything else is a rejection.
    pub status: String,
    /// Human readable message, present on rejections.
    #[serde(default)]
    pub message: Option<String>,
    /// Response payload.
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Product variant (size, colour, storage...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    #[serde(deserialize_with = "id_string")]
    pub id: VariantId,
    /// Display name (e.g., "128GB Black").
    #[serde(default)]
    pub name: String,
    /// Unit price.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub price: Decimal,
    /// Units in stock.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    /// Variant specific image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,
}

/// A product as returned by listing and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    #[serde(deserialize_with = "id_string")]
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Base price; `0.00` when pricing lives on the variants.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub price: Decimal,
    /// Discount percentage, if the product is on sale.
    #[serde(default, deserialize_with = "opt_decimal")]
    pub discount: Option<Decimal>,
    /// Units in stock for simple products.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    /// Image URLs, first is the primary image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    /// Free-form tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Names of the categories the product belongs to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub prod_categories_names: Vec<String>,
    /// HTML description.
    #[serde(default)]
    pub description: Option<String>,
    /// Purchasable variants; empty for simple products.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    #[must_use]
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Variant preselected on the product page.
    #[must_use]
    pub fn default_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }
}

/// Pagination metadata of a product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default = "one")]
    pub current_page: u32,
    #[serde(default = "one")]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

const fn one() -> u32 {
    1
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            last_page: 1,
            per_page: None,
            total: None,
        }
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Product>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Products associated with a tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagProducts {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub associated_items: ProductPage,
}

// =============================================================================
// Location Types
// =============================================================================

/// A country the shop ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
}

/// A state within a shipping country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
}

/// A city within a shipping state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

/// Common access to location options.
pub trait LocationOption {
    type Id: Copy + Eq + std::fmt::Debug + std::fmt::Display + Send + Sync;

    fn id(&self) -> Self::Id;
    fn name(&self) -> &str;
}

macro_rules! location_option {
    ($ty:ty, $id:ty) => {
        impl LocationOption for $ty {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

location_option!(Country, CountryId);
location_option!(State, StateId);
location_option!(City, CityId);

// =============================================================================
// Shipping & Summary Types
// =============================================================================

/// Parameters of a shipping rate calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingRateRequest {
    pub country_id: CountryId,
    pub state_id: StateId,
    pub city_id: CityId,
    pub sub_total: Decimal,
    pub cart_item_weight: Decimal,
}

/// Backend-computed delivery charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub shipping_charges: Decimal,
    /// Estimated delivery time (e.g., "3-5 days").
    #[serde(default)]
    pub shipping_duration: Option<String>,
}

/// Named surcharge on a summary or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraCharge {
    pub name: String,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub amount: Decimal,
}

/// Backend-computed authoritative cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub sub_total: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub tax_amount: Decimal,
    #[serde(rename = "totalDiscount", default, deserialize_with = "decimal_or_zero")]
    pub total_discount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra_charges: Vec<ExtraCharge>,
    /// Backend total before shipping; informational only.
    #[serde(default, deserialize_with = "opt_decimal")]
    pub total: Option<Decimal>,
    /// Total cart weight used for shipping calculation.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub cart_item_weight: Decimal,
    #[serde(default)]
    pub currency_icon: String,
}

impl CartSummary {
    /// Format an amount in the summary's currency.
    #[must_use]
    pub fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency_icon.clone())
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// Body of the order creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub items: Vec<CartPayloadItem>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub country_id: CountryId,
    pub state_id: StateId,
    pub city_id: CityId,
    pub address: String,
    pub postal_code: String,
    /// Always `null` for guest checkout.
    pub address_id: Option<i64>,
    pub payment_method: PaymentMethod,
    /// Shop the order is placed with.
    pub tenant: ShopId,
    pub comment: String,
}

/// Payload of a successful order creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderCreated {
    pub order_id: OrderId,
}

/// Customer block of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Named location reference inside an address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Delivery address of an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderAddress {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<NamedRef>,
    #[serde(default)]
    pub state: Option<NamedRef>,
    #[serde(default)]
    pub country: Option<NamedRef>,
}

/// Variant reference inside an order line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemVariant {
    #[serde(default)]
    pub name: Option<String>,
}

/// Product snapshot inside an order line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub variant: Option<OrderItemVariant>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// One line of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub product: Option<OrderItemProduct>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_qty: u32,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub unit_price: Decimal,
}

impl OrderItem {
    /// Unit price times quantity; zero if that overflows.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .checked_mul(Decimal::from(self.unit_qty))
            .unwrap_or_else(|| {
                warn!(
                    unit_price = %self.unit_price,
                    qty = self.unit_qty,
                    "Order line total overflowed"
                );
                Decimal::ZERO
            })
    }
}

/// Full order as shown on the confirmation view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order_id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub currency_icon: String,
    /// Items subtotal.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub delivery_charges: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_tax_amount: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_discount_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra_charges_breakdown: Vec<ExtraCharge>,
    /// Grand total payable.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub shipping_duration: Option<String>,
    /// When the order was placed.
    #[serde(default, deserialize_with = "opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub address: Option<OrderAddress>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_items: Vec<OrderItem>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_with_numeric_ids_and_string_prices() {
        let product: Product = serde_json::from_value(json!({
            "id": 12,
            "name": "Phone X",
            "slug": "phone-x",
            "price": "0.00",
            "discount": null,
            "quantity": null,
            "images": ["a.png"],
            "variants": [
                {"id": 99, "name": "128GB", "price": "499.00", "quantity": 3}
            ]
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "12");
        assert_eq!(product.quantity, 0);
        assert!(product.has_variants());
        let variant = product.variant(&VariantId::from("99")).unwrap();
        assert_eq!(variant.price, Decimal::new(49900, 2));
    }

    #[test]
    fn test_cart_summary_accepts_numbers() {
        let summary: CartSummary = serde_json::from_value(json!({
            "sub_total": 20,
            "tax_amount": 1.5,
            "totalDiscount": 0,
            "extra_charges": [{"name": "Packing", "amount": 2}],
            "total": 23.5,
            "cart_item_weight": "0.8",
            "currency_icon": "$"
        }))
        .unwrap();

        assert_eq!(summary.sub_total, Decimal::new(20, 0));
        assert_eq!(summary.tax_amount, Decimal::new(15, 1));
        assert_eq!(summary.extra_charges.len(), 1);
        assert_eq!(summary.money(summary.sub_total).display(), "$20.00");
    }

    #[test]
    fn test_order_request_wire_format() {
        let request = OrderRequest {
            items: vec![],
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "123".to_string(),
            customer_type: CustomerType::Guest,
            country_id: CountryId::new(1),
            state_id: StateId::new(2),
            city_id: CityId::new(3),
            address: "1 Main St".to_string(),
            postal_code: "00100".to_string(),
            address_id: None,
            payment_method: PaymentMethod::Cod,
            tenant: ShopId::from("shop-1"),
            comment: String::new(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "guest");
        assert_eq!(json["country_id"], 1);
        assert_eq!(json["payment_method"], "COD");
        assert_eq!(json["tenant"], "shop-1");
        assert!(json["address_id"].is_null());
        assert_eq!(json["comment"], "");
    }

    #[test]
    fn test_order_details_tolerates_sparse_payload() {
        let details: OrderDetails = serde_json::from_value(json!({
            "order_id": 123,
            "status": "pending",
            "paid_amount": "45.00",
            "order_items": null
        }))
        .unwrap();

        assert_eq!(details.order_id, OrderId::new(123));
        assert_eq!(details.paid_amount, Decimal::new(4500, 2));
        assert!(details.order_items.is_empty());
    }

    #[test]
    fn test_order_item_line_total_overflow_is_zero() {
        let item: OrderItem = serde_json::from_value(json!({
            "unit_qty": 2,
            "unit_price": Decimal::MAX.to_string()
        }))
        .unwrap();
        assert_eq!(item.line_total(), Decimal::ZERO);

        let item: OrderItem =
            serde_json::from_value(json!({"unit_qty": 3, "unit_price": "2.50"})).unwrap();
        assert_eq!(item.line_total(), Decimal::new(750, 2));
    }
}
