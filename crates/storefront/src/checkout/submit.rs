//! Order submission.

use orderain_core::{OrderId, PaymentMethod, ShopId};
use tracing::{error, info, instrument, warn};

use super::CheckoutError;
use super::form::CheckoutForm;
use crate::api::{CommerceApi, OrderDetails};
use crate::cart::{CartService, CartStore};

/// What the confirmation view shows.
#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    /// Full order, when the follow-up fetch succeeded.
    pub details: Option<OrderDetails>,
}

/// Result of a submission that reached the backend.
#[derive(Debug, Clone)]
pub enum OrderOutcome {
    /// Order created; the cart has been cleared.
    Placed(OrderConfirmation),
    /// Backend refused the order; cart and form are untouched.
    Rejected { message: String },
}

/// Places orders for the current cart.
#[derive(Debug)]
pub struct OrderSubmitter<A, S> {
    api: A,
    cart: CartService<S>,
    tenant: ShopId,
    payment_method: PaymentMethod,
}

impl<A: CommerceApi, S: CartStore> OrderSubmitter<A, S> {
    #[must_use]
    pub const fn new(
        api: A,
        cart: CartService<S>,
        tenant: ShopId,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            api,
            cart,
            tenant,
            payment_method,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn cart(&self) -> &CartService<S> {
        &self.cart
    }

    /// Validate the form and place an order for the current cart.
    ///
    /// On success the order details are fetched for the confirmation view and
    /// the cart is cleared, whether or not that fetch worked. A backend
    /// rejection is returned as [`OrderOutcome::Rejected`] with the backend's
    /// message.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] for an incomplete form and
    /// [`CheckoutError::EmptyCart`] when there is nothing to order. No request
    /// is sent in either case.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: &CheckoutForm) -> Result<OrderOutcome, CheckoutError> {
        let valid = form.validate()?;

        let cart = self.cart.cart();
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = valid.into_order_request(
            cart.to_api_payload(),
            self.payment_method,
            self.tenant.clone(),
        );

        let created = match self.api.create_order(&request).await {
            Ok(created) => created,
            Err(e) => {
                error!(error = %e, "Order submission failed");
                return Ok(OrderOutcome::Rejected {
                    message: e.user_message(),
                });
            }
        };
        info!(order_id = %created.order_id, "Order placed");

        let details = match self.api.get_order(created.order_id).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(error = %e, order_id = %created.order_id, "Failed to load order details");
                None
            }
        };

        // The order exists now; the cart goes regardless of the detail fetch
        self.cart.clear();

        Ok(OrderOutcome::Placed(OrderConfirmation {
            order_id: created.order_id,
            details,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use orderain_core::{CityId, CountryId, StateId};
    use serde_json::json;

    use super::*;
    use crate::cart::{CartLineDetails, LineKey, MemoryStorage, PersistentCartStore};
    use crate::checkout::fake::FakeApi;
    use crate::checkout::{RequiredField, ValidationError};

    type Submitter = OrderSubmitter<FakeApi, PersistentCartStore<MemoryStorage>>;

    fn submitter(api: FakeApi) -> Submitter {
        let cart = CartService::new(PersistentCartStore::new(MemoryStorage::new()));
        cart.add_item(
            &LineKey::simple("A"),
            2,
            CartLineDetails {
                price: "10.00".to_string(),
                ..CartLineDetails::default()
            },
        )
        .unwrap();
        OrderSubmitter::new(api, cart, ShopId::from("shop-1"), PaymentMethod::Cod)
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "123".to_string(),
            country_id: Some(CountryId::new(1)),
            state_id: Some(StateId::new(10)),
            city_id: Some(CityId::new(100)),
            address: "1 Main St".to_string(),
            postal_code: "54000".to_string(),
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_cart_cleared_even_when_detail_fetch_fails() {
        let submitter = submitter(FakeApi::storefront());

        let outcome = submitter.submit(&form()).await.unwrap();

        let OrderOutcome::Placed(confirmation) = outcome else {
            panic!("expected a placed order");
        };
        assert_eq!(confirmation.order_id, OrderId::new(123));
        assert!(confirmation.details.is_none());
        assert!(submitter.cart().items().is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_carries_details() {
        let api = FakeApi {
            details: serde_json::from_value(json!({
                "order_id": 123, "status": "pending", "paid_amount": "25.00"
            }))
            .ok(),
            ..FakeApi::storefront()
        };
        let submitter = submitter(api);

        let OrderOutcome::Placed(confirmation) = submitter.submit(&form()).await.unwrap() else {
            panic!("expected a placed order");
        };
        assert!(confirmation.details.is_some());
        assert_eq!(submitter.cart().item_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_email_sends_nothing() {
        let submitter = submitter(FakeApi::storefront());
        let form = CheckoutForm {
            email: String::new(),
            ..form()
        };

        let err = submitter.submit(&form).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingField(RequiredField::Email))
        ));
        assert_eq!(submitter.api().order_count(), 0);
        assert_eq!(submitter.cart().item_count(), 2);
    }

    #[tokio::test]
    async fn test_rejection_keeps_cart() {
        let api = FakeApi {
            create: Some(Err("Selected city is not deliverable".to_string())),
            ..FakeApi::storefront()
        };
        let submitter = submitter(api);

        let outcome = submitter.submit(&form()).await.unwrap();

        let OrderOutcome::Rejected { message } = outcome else {
            panic!("expected a rejection");
        };
        assert_eq!(message, "Selected city is not deliverable");
        assert_eq!(submitter.cart().item_count(), 2);
    }

    #[tokio::test]
    async fn test_request_payload() {
        let submitter = submitter(FakeApi::storefront());
        submitter.submit(&form()).await.unwrap();

        let orders = submitter.api().orders.lock().unwrap();
        let request = &orders[0];
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].unit_qty, 2);
        assert_eq!(request.tenant.as_str(), "shop-1");
        assert_eq!(request.payment_method, PaymentMethod::Cod);
        assert_eq!(request.comment, "");
    }

    #[tokio::test]
    async fn test_empty_cart_is_refused() {
        let submitter = submitter(FakeApi::storefront());
        submitter.cart().clear();
        let err = submitter.submit(&form()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(submitter.api().order_count(), 0);
    }
}
