//! Checkout form and validation.

use std::fmt;

use orderain_core::{CityId, CountryId, CustomerType, PaymentMethod, ShopId, StateId};
use thiserror::Error;

use super::cascade::Destination;
use crate::api::OrderRequest;
use crate::cart::CartPayload;

/// Fields a shopper must fill in, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    FirstName,
    LastName,
    Email,
    Phone,
    Country,
    State,
    City,
    Address,
    PostalCode,
}

impl RequiredField {
    /// Every required field in the order the form shows them.
    pub const ALL: [Self; 9] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Country,
        Self::State,
        Self::City,
        Self::Address,
        Self::PostalCode,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Country => "Country",
            Self::State => "State",
            Self::City => "City",
            Self::Address => "Address",
            Self::PostalCode => "Postal code",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(RequiredField),
}

/// Checkout form as filled in by the shopper.
///
/// Created fresh for every checkout; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country_id: Option<CountryId>,
    pub state_id: Option<StateId>,
    pub city_id: Option<CityId>,
    pub address: String,
    pub postal_code: String,
    pub comment: Option<String>,
}

/// A form that passed validation, with every required value present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub destination: Destination,
    pub address: String,
    pub postal_code: String,
    pub comment: String,
}

fn required(value: &str, field: RequiredField) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

impl CheckoutForm {
    /// Take the location from a completed cascade selection.
    #[must_use]
    pub fn with_destination(mut self, destination: Option<Destination>) -> Self {
        match destination {
            Some(d) => {
                self.country_id = Some(d.country_id);
                self.state_id = Some(d.state_id);
                self.city_id = Some(d.city_id);
            }
            None => {
                self.country_id = None;
                self.state_id = None;
                self.city_id = None;
            }
        }
        self
    }

    /// Check required fields in form order.
    ///
    /// # Errors
    ///
    /// Returns the first missing field. Whitespace-only values count as
    /// missing.
    pub fn validate(&self) -> Result<ValidForm, ValidationError> {
        let first_name = required(&self.first_name, RequiredField::FirstName)?;
        let last_name = required(&self.last_name, RequiredField::LastName)?;
        let email = required(&self.email, RequiredField::Email)?;
        let phone = required(&self.phone, RequiredField::Phone)?;
        let country_id = self
            .country_id
            .ok_or(ValidationError::MissingField(RequiredField::Country))?;
        let state_id = self
            .state_id
            .ok_or(ValidationError::MissingField(RequiredField::State))?;
        let city_id = self
            .city_id
            .ok_or(ValidationError::MissingField(RequiredField::City))?;
        let address = required(&self.address, RequiredField::Address)?;
        let postal_code = required(&self.postal_code, RequiredField::PostalCode)?;

        Ok(ValidForm {
            first_name,
            last_name,
            email,
            phone,
            destination: Destination {
                country_id,
                state_id,
                city_id,
            },
            address,
            postal_code,
            comment: self
                .comment
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

impl ValidForm {
    /// Guest order request for the given cart contents.
    #[must_use]
    pub fn into_order_request(
        self,
        cart: CartPayload,
        payment_method: PaymentMethod,
        tenant: ShopId,
    ) -> OrderRequest {
        OrderRequest {
            items: cart.items,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            customer_type: CustomerType::Guest,
            country_id: self.destination.country_id,
            state_id: self.destination.state_id,
            city_id: self.destination.city_id,
            address: self.address,
            postal_code: self.postal_code,
            address_id: None,
            payment_method,
            tenant,
            comment: self.comment,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartPayloadItem;

    fn complete_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+92 300 0000000".to_string(),
            country_id: Some(CountryId::new(1)),
            state_id: Some(StateId::new(10)),
            city_id: Some(CityId::new(100)),
            address: "1 Analytical Engine Way".to_string(),
            postal_code: "54000".to_string(),
            comment: None,
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        let valid = complete_form().validate().unwrap();
        assert_eq!(valid.destination.city_id, CityId::new(100));
        assert_eq!(valid.comment, "");
    }

    #[test]
    fn test_missing_email_is_reported() {
        let form = CheckoutForm {
            email: String::new(),
            ..complete_form()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::MissingField(RequiredField::Email)
        );
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let form = CheckoutForm {
            postal_code: "   ".to_string(),
            ..complete_form()
        };
        assert_eq!(
            form.validate().unwrap_err().to_string(),
            "Postal code is required"
        );
    }

    #[test]
    fn test_first_missing_field_wins() {
        let form = CheckoutForm::default();
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::MissingField(RequiredField::FirstName)
        );

        let form = CheckoutForm {
            state_id: None,
            address: String::new(),
            ..complete_form()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::MissingField(RequiredField::State)
        );
    }

    #[test]
    fn test_destination_overrides_location() {
        let form = complete_form().with_destination(None);
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::MissingField(RequiredField::Country)
        );
    }

    #[test]
    fn test_order_request_from_valid_form() {
        let form = CheckoutForm {
            first_name: "  Ada ".to_string(),
            comment: Some("Ring twice".to_string()),
            ..complete_form()
        };
        let cart = CartPayload {
            items: vec![CartPayloadItem {
                product_id: "A".into(),
                variant_id: None,
                unit_qty: 2,
            }],
        };
        let request = form.validate().unwrap().into_order_request(
            cart,
            PaymentMethod::Cod,
            ShopId::from("shop-1"),
        );
        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.comment, "Ring twice");
        assert_eq!(request.customer_type, CustomerType::Guest);
        assert_eq!(request.items.len(), 1);
        assert!(request.address_id.is_none());
    }
}
