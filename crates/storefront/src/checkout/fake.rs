//! Scripted in-memory [`CommerceApi`] for checkout tests.

use std::collections::HashMap;
use std::sync::Mutex;

use orderain_core::{CityId, CountryId, OrderId, StateId, TagId};
use rust_decimal::Decimal;

use crate::api::{
    ApiError, CartSummary, Category, City, CommerceApi, Country, OrderCreated, OrderDetails,
    OrderRequest, Product, ProductPage, ProductQuery, ShippingRate, ShippingRateRequest, State,
    TagProducts,
};
use crate::cart::CartPayload;

fn rejected(what: &str) -> ApiError {
    ApiError::Rejected(format!("{what} unavailable"))
}

#[derive(Debug, Default)]
pub struct FakeApi {
    pub countries: Vec<Country>,
    pub states: HashMap<CountryId, Vec<State>>,
    pub cities: HashMap<(CountryId, StateId), Vec<City>>,
    /// `None` makes the summary call fail.
    pub summary: Option<CartSummary>,
    /// `None` makes the shipping call fail.
    pub shipping: Option<Decimal>,
    /// `Err` holds the rejection message.
    pub create: Option<Result<OrderId, String>>,
    /// `None` makes the detail fetch fail.
    pub details: Option<OrderDetails>,
    pub orders: Mutex<Vec<OrderRequest>>,
    pub shipping_requests: Mutex<Vec<ShippingRateRequest>>,
}

impl FakeApi {
    /// A backend serving one country, one state, and two cities.
    pub fn storefront() -> Self {
        let country = CountryId::new(1);
        let state = StateId::new(10);
        Self {
            countries: vec![Country {
                id: country,
                name: "Pakistan".to_string(),
            }],
            states: HashMap::from([(
                country,
                vec![State {
                    id: state,
                    name: "Punjab".to_string(),
                }],
            )]),
            cities: HashMap::from([(
                (country, state),
                vec![
                    City {
                        id: CityId::new(100),
                        name: "Lahore".to_string(),
                    },
                    City {
                        id: CityId::new(101),
                        name: "Multan".to_string(),
                    },
                ],
            )]),
            summary: serde_json::from_value(serde_json::json!({
                "sub_total": "20.00",
                "tax_amount": "0",
                "totalDiscount": "0",
                "cart_item_weight": "1",
                "currency_icon": "$"
            }))
            .ok(),
            shipping: Some(Decimal::new(500, 2)),
            create: Some(Ok(OrderId::new(123))),
            details: None,
            orders: Mutex::new(Vec::new()),
            shipping_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().map_or(0, |orders| orders.len())
    }
}

impl CommerceApi for FakeApi {
    async fn list_products(&self, _query: &ProductQuery) -> Result<ProductPage, ApiError> {
        Ok(ProductPage::default())
    }

    async fn get_product(&self, _slug: &str) -> Result<Product, ApiError> {
        Err(rejected("product"))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(Vec::new())
    }

    async fn tag_products(&self, _tag: TagId) -> Result<TagProducts, ApiError> {
        Ok(TagProducts::default())
    }

    async fn countries(&self) -> Result<Vec<Country>, ApiError> {
        Ok(self.countries.clone())
    }

    async fn states(&self, country: CountryId) -> Result<Vec<State>, ApiError> {
        self.states
            .get(&country)
            .cloned()
            .ok_or_else(|| rejected("states"))
    }

    async fn cities(&self, country: CountryId, state: StateId) -> Result<Vec<City>, ApiError> {
        self.cities
            .get(&(country, state))
            .cloned()
            .ok_or_else(|| rejected("cities"))
    }

    async fn shipping_rate(&self, request: &ShippingRateRequest) -> Result<ShippingRate, ApiError> {
        if let Ok(mut requests) = self.shipping_requests.lock() {
            requests.push(request.clone());
        }
        self.shipping
            .map(|charges| ShippingRate {
                shipping_charges: charges,
                shipping_duration: Some("2-3 days".to_string()),
            })
            .ok_or_else(|| rejected("shipping"))
    }

    async fn cart_summary(&self, _cart: &CartPayload) -> Result<CartSummary, ApiError> {
        self.summary.clone().ok_or_else(|| rejected("summary"))
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderCreated, ApiError> {
        if let Ok(mut orders) = self.orders.lock() {
            orders.push(order.clone());
        }
        match &self.create {
            Some(Ok(order_id)) => Ok(OrderCreated {
                order_id: *order_id,
            }),
            Some(Err(message)) => Err(ApiError::Rejected(message.clone())),
            None => Err(rejected("orders")),
        }
    }

    async fn get_order(&self, _order_id: OrderId) -> Result<OrderDetails, ApiError> {
        self.details.clone().ok_or_else(|| rejected("order"))
    }
}
