//! One checkout, from cart summary to placed order.

use orderain_core::{CityId, CountryId, StateId};
use tracing::{debug, instrument, warn};

use super::cascade::{Applied, CheckoutCascade};
use super::form::CheckoutForm;
use super::submit::{OrderOutcome, OrderSubmitter};
use super::totals::OrderTotals;
use super::CheckoutError;
use crate::api::CommerceApi;
use crate::cart::CartStore;

/// Drives a [`CheckoutCascade`] against the commerce backend.
///
/// Calls take `&mut self`, so lookups within one session never overlap. The
/// cascade still checks tickets, which keeps drivers that issue lookups
/// concurrently correct.
#[derive(Debug)]
pub struct CheckoutSession<A, S> {
    submitter: OrderSubmitter<A, S>,
    cascade: CheckoutCascade,
}

impl<A: CommerceApi, S: CartStore> CheckoutSession<A, S> {
    #[must_use]
    pub fn new(submitter: OrderSubmitter<A, S>) -> Self {
        Self {
            submitter,
            cascade: CheckoutCascade::new(),
        }
    }

    #[must_use]
    pub const fn cascade(&self) -> &CheckoutCascade {
        &self.cascade
    }

    #[must_use]
    pub const fn submitter(&self) -> &OrderSubmitter<A, S> {
        &self.submitter
    }

    /// Load the cart summary and the country list side by side.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] when there is nothing to check out
    /// and [`CheckoutError::Api`] when the cart summary cannot be loaded. A
    /// failed country lookup is not an error; the list is simply empty.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), CheckoutError> {
        let cart = self.submitter.cart().cart();
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let api = self.submitter.api();
        let payload = cart.to_api_payload();
        let ticket = self.cascade.begin_countries();
        let (summary, countries) = tokio::join!(api.cart_summary(&payload), api.countries());

        let _ = self.cascade.apply_countries(ticket, countries);
        self.cascade.set_cart_summary(summary?);
        debug!(
            countries = self.cascade.country().options().len(),
            "Checkout started"
        );
        Ok(())
    }

    /// Reload the cart summary, e.g. after the cart changed mid-checkout.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Api`] if the summary cannot be loaded.
    pub async fn refresh_summary(&mut self) -> Result<(), CheckoutError> {
        let payload = self.submitter.cart().to_api_payload();
        let summary = self.submitter.api().cart_summary(&payload).await?;
        self.cascade.set_cart_summary(summary);
        self.refresh_shipping().await;
        Ok(())
    }

    /// Choose a country and load its states.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Cascade`] if the country was not offered.
    pub async fn choose_country(&mut self, id: CountryId) -> Result<Applied, CheckoutError> {
        let ticket = self.cascade.select_country(id)?;
        let states = self.submitter.api().states(id).await;
        Ok(self.cascade.apply_states(ticket, states))
    }

    /// Choose a state and load its cities.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Cascade`] if the state was not offered.
    pub async fn choose_state(&mut self, id: StateId) -> Result<Applied, CheckoutError> {
        let ticket = self.cascade.select_state(id)?;
        let Some(country) = self.cascade.country().selected() else {
            return Ok(Applied::Stale);
        };
        let cities = self.submitter.api().cities(country, id).await;
        Ok(self.cascade.apply_cities(ticket, cities))
    }

    /// Choose a city and calculate shipping for the full destination.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Cascade`] if the city was not offered. A
    /// failed rate calculation is not an error; see
    /// [`CheckoutCascade::failure`].
    pub async fn choose_city(&mut self, id: CityId) -> Result<(), CheckoutError> {
        self.cascade.select_city(id)?;
        self.refresh_shipping().await;
        Ok(())
    }

    async fn refresh_shipping(&mut self) {
        if let Some(lookup) = self.cascade.begin_shipping() {
            let rate = self.submitter.api().shipping_rate(&lookup.request).await;
            let _ = self.cascade.apply_shipping(lookup.ticket, rate);
        }
    }

    /// Current price breakdown, once the cart summary is loaded.
    #[must_use]
    pub fn totals(&self) -> Option<OrderTotals> {
        self.cascade
            .cart_summary()
            .map(|summary| OrderTotals::compute(summary, self.cascade.current_rate()))
    }

    /// Place the order using the cascade's destination.
    ///
    /// Submission is not blocked by a missing shipping rate.
    ///
    /// # Errors
    ///
    /// See [`OrderSubmitter::submit`].
    pub async fn submit(&self, form: CheckoutForm) -> Result<OrderOutcome, CheckoutError> {
        if self.cascade.current_rate().is_none() {
            warn!("Submitting order without a calculated shipping rate");
        }
        let form = form.with_destination(self.cascade.destination());
        self.submitter.submit(&form).await
    }
}
