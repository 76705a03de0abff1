//! Dependent country, state, and city selection with shipping calculation.
//!
//! The cascade is a plain state machine: no I/O happens here. Whoever drives
//! it asks for a [`LookupTicket`] before starting a request and hands the
//! ticket back with the response. A response whose ticket is no longer the
//! one the level is waiting for is dropped, so the last selection always
//! wins regardless of the order responses arrive in.

use std::fmt;

use orderain_core::{CityId, CountryId, StateId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{
    ApiError, CartSummary, City, Country, LocationOption, ShippingRate, ShippingRateRequest, State,
};

/// Identifies one outstanding lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupTicket(u64);

/// Whether a response was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Applied {
    Current,
    Stale,
}

/// A level of the cascade, or the shipping calculation that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Country,
    State,
    City,
    Shipping,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Country => "country",
            Self::State => "state",
            Self::City => "city",
            Self::Shipping => "shipping rate",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CascadeError {
    /// The chosen value is not among the loaded options.
    #[error("Unknown {level} option: {id}")]
    UnknownOption { level: Level, id: String },

    /// Options for the level have not arrived yet.
    #[error("No {level} options loaded")]
    NotLoaded { level: Level },
}

// =============================================================================
// LevelState
// =============================================================================

/// State of one selection level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelState<T: LocationOption> {
    /// Parent not chosen yet, or just invalidated.
    Empty,
    Loading { ticket: LookupTicket },
    Loaded(Vec<T>),
    Selected { options: Vec<T>, value: T::Id },
}

impl<T: LocationOption> Default for LevelState<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T: LocationOption> LevelState<T> {
    /// Loaded options; empty while nothing is loaded.
    #[must_use]
    pub fn options(&self) -> &[T] {
        match self {
            Self::Loaded(options) | Self::Selected { options, .. } => options,
            Self::Empty | Self::Loading { .. } => &[],
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<T::Id> {
        match self {
            Self::Selected { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The chosen option itself.
    #[must_use]
    pub fn selected_option(&self) -> Option<&T> {
        let value = self.selected()?;
        self.options().iter().find(|option| option.id() == value)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    fn waiting_for(&self, ticket: LookupTicket) -> bool {
        matches!(self, Self::Loading { ticket: current } if *current == ticket)
    }

    fn select(&mut self, level: Level, value: T::Id) -> Result<(), CascadeError> {
        let options = match std::mem::take(self) {
            Self::Loaded(options) | Self::Selected { options, .. } => options,
            other => {
                *self = other;
                return Err(CascadeError::NotLoaded { level });
            }
        };
        if options.iter().any(|option| option.id() == value) {
            *self = Self::Selected { options, value };
            Ok(())
        } else {
            let id = value.to_string();
            *self = Self::Loaded(options);
            Err(CascadeError::UnknownOption { level, id })
        }
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// The destination a shipping rate was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination {
    pub country_id: CountryId,
    pub state_id: StateId,
    pub city_id: CityId,
}

/// A rate together with the destination that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRate {
    pub destination: Destination,
    pub rate: ShippingRate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShippingState {
    #[default]
    NotComputed,
    Calculating {
        ticket: LookupTicket,
        destination: Destination,
    },
    Computed(TaggedRate),
    Failed,
}

/// A shipping calculation the driver should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingLookup {
    pub ticket: LookupTicket,
    pub request: ShippingRateRequest,
}

// =============================================================================
// CheckoutCascade
// =============================================================================

/// Country → state → city → shipping state machine.
#[derive(Debug, Clone, Default)]
pub struct CheckoutCascade {
    generation: u64,
    country: LevelState<Country>,
    state: LevelState<State>,
    city: LevelState<City>,
    summary: Option<CartSummary>,
    shipping: ShippingState,
    failure: Option<Level>,
}

impl CheckoutCascade {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ticket(&mut self) -> LookupTicket {
        self.generation += 1;
        LookupTicket(self.generation)
    }

    fn clear_failure(&mut self, level: Level) {
        if self.failure == Some(level) {
            self.failure = None;
        }
    }

    fn loaded_or_failed<T: LocationOption>(
        &mut self,
        level: Level,
        result: Result<Vec<T>, ApiError>,
    ) -> LevelState<T> {
        match result {
            Ok(options) => {
                self.clear_failure(level);
                LevelState::Loaded(options)
            }
            Err(e) => {
                warn!(error = %e, level = %level, "Location lookup failed");
                self.failure = Some(level);
                LevelState::Loaded(Vec::new())
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn country(&self) -> &LevelState<Country> {
        &self.country
    }

    #[must_use]
    pub const fn state(&self) -> &LevelState<State> {
        &self.state
    }

    #[must_use]
    pub const fn city(&self) -> &LevelState<City> {
        &self.city
    }

    #[must_use]
    pub const fn shipping(&self) -> &ShippingState {
        &self.shipping
    }

    #[must_use]
    pub const fn cart_summary(&self) -> Option<&CartSummary> {
        self.summary.as_ref()
    }

    /// The most recent lookup that failed and has not since succeeded.
    #[must_use]
    pub const fn failure(&self) -> Option<Level> {
        self.failure
    }

    /// The full destination, once all three levels are selected.
    #[must_use]
    pub fn destination(&self) -> Option<Destination> {
        Some(Destination {
            country_id: self.country.selected()?,
            state_id: self.state.selected()?,
            city_id: self.city.selected()?,
        })
    }

    /// The shipping rate, only while it matches the current destination.
    #[must_use]
    pub fn current_rate(&self) -> Option<&ShippingRate> {
        match &self.shipping {
            ShippingState::Computed(tagged) if Some(tagged.destination) == self.destination() => {
                Some(&tagged.rate)
            }
            _ => None,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Start loading countries, resetting everything below.
    pub fn begin_countries(&mut self) -> LookupTicket {
        let ticket = self.next_ticket();
        self.country = LevelState::Loading { ticket };
        self.state = LevelState::Empty;
        self.city = LevelState::Empty;
        self.shipping = ShippingState::NotComputed;
        ticket
    }

    pub fn apply_countries(
        &mut self,
        ticket: LookupTicket,
        result: Result<Vec<Country>, ApiError>,
    ) -> Applied {
        if !self.country.waiting_for(ticket) {
            debug!(?ticket, "Discarding stale country list");
            return Applied::Stale;
        }
        self.country = self.loaded_or_failed(Level::Country, result);
        Applied::Current
    }

    /// Choose a country and start loading its states.
    ///
    /// State, city, and any shipping rate are reset even when the same
    /// country is chosen again.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotLoaded`] before the country list has loaded
    /// and [`CascadeError::UnknownOption`] if the country is not among the
    /// loaded options; nothing changes in either case.
    pub fn select_country(&mut self, id: CountryId) -> Result<LookupTicket, CascadeError> {
        self.country.select(Level::Country, id)?;
        let ticket = self.next_ticket();
        self.state = LevelState::Loading { ticket };
        self.city = LevelState::Empty;
        self.shipping = ShippingState::NotComputed;
        debug!(country = %id, "Country selected");
        Ok(ticket)
    }

    pub fn apply_states(
        &mut self,
        ticket: LookupTicket,
        result: Result<Vec<State>, ApiError>,
    ) -> Applied {
        if !self.state.waiting_for(ticket) {
            debug!(?ticket, "Discarding stale state list");
            return Applied::Stale;
        }
        self.state = self.loaded_or_failed(Level::State, result);
        Applied::Current
    }

    /// Choose a state and start loading its cities.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotLoaded`] before the state list has loaded
    /// and [`CascadeError::UnknownOption`] if the state is not among the
    /// loaded options.
    pub fn select_state(&mut self, id: StateId) -> Result<LookupTicket, CascadeError> {
        self.state.select(Level::State, id)?;
        let ticket = self.next_ticket();
        self.city = LevelState::Loading { ticket };
        self.shipping = ShippingState::NotComputed;
        debug!(state = %id, "State selected");
        Ok(ticket)
    }

    pub fn apply_cities(
        &mut self,
        ticket: LookupTicket,
        result: Result<Vec<City>, ApiError>,
    ) -> Applied {
        if !self.city.waiting_for(ticket) {
            debug!(?ticket, "Discarding stale city list");
            return Applied::Stale;
        }
        self.city = self.loaded_or_failed(Level::City, result);
        Applied::Current
    }

    /// Choose a city. The caller should follow up with [`Self::begin_shipping`].
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::NotLoaded`] before the city list has loaded
    /// and [`CascadeError::UnknownOption`] if the city is not among the
    /// loaded options.
    pub fn select_city(&mut self, id: CityId) -> Result<(), CascadeError> {
        self.city.select(Level::City, id)?;
        self.shipping = ShippingState::NotComputed;
        debug!(city = %id, "City selected");
        Ok(())
    }

    /// Replace the cart summary. Cart weight and subtotal feed the shipping
    /// rate, so any computed rate is discarded.
    pub fn set_cart_summary(&mut self, summary: CartSummary) {
        self.summary = Some(summary);
        self.shipping = ShippingState::NotComputed;
    }

    /// Start a shipping calculation if destination and summary are known.
    pub fn begin_shipping(&mut self) -> Option<ShippingLookup> {
        let destination = self.destination()?;
        let summary = self.summary.as_ref()?;
        let request = ShippingRateRequest {
            country_id: destination.country_id,
            state_id: destination.state_id,
            city_id: destination.city_id,
            sub_total: summary.sub_total,
            cart_item_weight: summary.cart_item_weight,
        };
        let ticket = self.next_ticket();
        self.shipping = ShippingState::Calculating {
            ticket,
            destination,
        };
        Some(ShippingLookup { ticket, request })
    }

    pub fn apply_shipping(
        &mut self,
        ticket: LookupTicket,
        result: Result<ShippingRate, ApiError>,
    ) -> Applied {
        let destination = match &self.shipping {
            ShippingState::Calculating {
                ticket: current,
                destination,
            } if *current == ticket => *destination,
            _ => {
                debug!(?ticket, "Discarding stale shipping rate");
                return Applied::Stale;
            }
        };

        self.shipping = match result {
            Ok(rate) => {
                self.clear_failure(Level::Shipping);
                ShippingState::Computed(TaggedRate { destination, rate })
            }
            Err(e) => {
                warn!(error = %e, "Shipping rate calculation failed");
                self.failure = Some(Level::Shipping);
                ShippingState::Failed
            }
        };
        Applied::Current
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn countries() -> Vec<Country> {
        vec![
            Country {
                id: CountryId::new(1),
                name: "Pakistan".to_string(),
            },
            Country {
                id: CountryId::new(2),
                name: "UAE".to_string(),
            },
        ]
    }

    fn states(ids: &[i64]) -> Vec<State> {
        ids.iter()
            .map(|id| State {
                id: StateId::new(*id),
                name: format!("State {id}"),
            })
            .collect()
    }

    fn cities(ids: &[i64]) -> Vec<City> {
        ids.iter()
            .map(|id| City {
                id: CityId::new(*id),
                name: format!("City {id}"),
            })
            .collect()
    }

    fn summary() -> CartSummary {
        serde_json::from_value(serde_json::json!({
            "sub_total": "20.00",
            "cart_item_weight": "1.5",
            "currency_icon": "$"
        }))
        .unwrap()
    }

    fn rate(amount: i64) -> ShippingRate {
        ShippingRate {
            shipping_charges: Decimal::new(amount, 0),
            shipping_duration: None,
        }
    }

    /// Cascade with country 1, state 10, city 100 selected and a summary set.
    fn selected_cascade() -> CheckoutCascade {
        let mut cascade = CheckoutCascade::new();
        let t = cascade.begin_countries();
        let _ = cascade.apply_countries(t, Ok(countries()));
        let t = cascade.select_country(CountryId::new(1)).unwrap();
        let _ = cascade.apply_states(t, Ok(states(&[10, 11])));
        let t = cascade.select_state(StateId::new(10)).unwrap();
        let _ = cascade.apply_cities(t, Ok(cities(&[100, 101])));
        cascade.select_city(CityId::new(100)).unwrap();
        cascade.set_cart_summary(summary());
        cascade
    }

    #[test]
    fn test_full_cascade_computes_tagged_rate() {
        let mut cascade = selected_cascade();
        let lookup = cascade.begin_shipping().unwrap();
        assert_eq!(lookup.request.sub_total, Decimal::new(2000, 2));
        assert_eq!(lookup.request.cart_item_weight, Decimal::new(15, 1));
        assert_eq!(lookup.request.city_id, CityId::new(100));

        assert_eq!(
            cascade.apply_shipping(lookup.ticket, Ok(rate(5))),
            Applied::Current
        );
        assert_eq!(
            cascade.current_rate().unwrap().shipping_charges,
            Decimal::new(5, 0)
        );
    }

    #[test]
    fn test_new_country_resets_descendants_and_rate() {
        let mut cascade = selected_cascade();
        let lookup = cascade.begin_shipping().unwrap();
        let _ = cascade.apply_shipping(lookup.ticket, Ok(rate(5)));

        let ticket = cascade.select_country(CountryId::new(2)).unwrap();
        assert!(cascade.state().is_loading());
        assert!(cascade.state().selected().is_none());
        assert_eq!(cascade.city(), &LevelState::Empty);
        assert_eq!(cascade.shipping(), &ShippingState::NotComputed);
        assert!(cascade.current_rate().is_none());

        let _ = cascade.apply_states(ticket, Ok(states(&[20])));
        assert_eq!(cascade.state().options().len(), 1);
    }

    #[test]
    fn test_reselecting_same_country_still_resets() {
        let mut cascade = selected_cascade();
        cascade.select_country(CountryId::new(1)).unwrap();
        assert!(cascade.state().selected().is_none());
        assert!(cascade.city().selected().is_none());
        assert!(cascade.destination().is_none());
    }

    #[test]
    fn test_rate_for_old_city_is_not_current() {
        let mut cascade = selected_cascade();
        let lookup = cascade.begin_shipping().unwrap();
        let _ = cascade.apply_shipping(lookup.ticket, Ok(rate(5)));

        cascade.select_city(CityId::new(101)).unwrap();
        assert!(cascade.current_rate().is_none());

        let lookup = cascade.begin_shipping().unwrap();
        assert!(cascade.current_rate().is_none());
        let _ = cascade.apply_shipping(lookup.ticket, Ok(rate(9)));
        assert_eq!(
            cascade.current_rate().unwrap().shipping_charges,
            Decimal::new(9, 0)
        );
    }

    #[test]
    fn test_slow_state_response_is_discarded() {
        let mut cascade = CheckoutCascade::new();
        let t = cascade.begin_countries();
        let _ = cascade.apply_countries(t, Ok(countries()));

        let first = cascade.select_country(CountryId::new(1)).unwrap();
        let second = cascade.select_country(CountryId::new(2)).unwrap();

        assert_eq!(
            cascade.apply_states(second, Ok(states(&[20]))),
            Applied::Current
        );
        assert_eq!(
            cascade.apply_states(first, Ok(states(&[10, 11]))),
            Applied::Stale
        );
        assert_eq!(cascade.state().options()[0].id, StateId::new(20));
    }

    #[test]
    fn test_stale_shipping_response_is_discarded() {
        let mut cascade = selected_cascade();
        let old = cascade.begin_shipping().unwrap();
        cascade.select_city(CityId::new(101)).unwrap();
        let new = cascade.begin_shipping().unwrap();

        assert_eq!(cascade.apply_shipping(old.ticket, Ok(rate(5))), Applied::Stale);
        assert_eq!(cascade.apply_shipping(new.ticket, Ok(rate(7))), Applied::Current);
        assert_eq!(
            cascade.current_rate().unwrap().shipping_charges,
            Decimal::new(7, 0)
        );
    }

    #[test]
    fn test_shipping_needs_summary_and_full_destination() {
        let mut cascade = CheckoutCascade::new();
        cascade.set_cart_summary(summary());
        assert!(cascade.begin_shipping().is_none());

        let mut cascade = selected_cascade();
        cascade.summary = None;
        assert!(cascade.begin_shipping().is_none());
    }

    #[test]
    fn test_new_summary_invalidates_rate() {
        let mut cascade = selected_cascade();
        let lookup = cascade.begin_shipping().unwrap();
        let _ = cascade.apply_shipping(lookup.ticket, Ok(rate(5)));
        cascade.set_cart_summary(summary());
        assert!(cascade.current_rate().is_none());
    }

    #[test]
    fn test_failed_lookup_yields_empty_options() {
        let mut cascade = CheckoutCascade::new();
        let t = cascade.begin_countries();
        let _ = cascade.apply_countries(t, Err(ApiError::Rejected("down".to_string())));
        assert!(cascade.country().options().is_empty());
        assert_eq!(cascade.failure(), Some(Level::Country));

        let t = cascade.begin_countries();
        let _ = cascade.apply_countries(t, Ok(countries()));
        assert_eq!(cascade.failure(), None);
    }

    #[test]
    fn test_failed_rate_leaves_no_rate() {
        let mut cascade = selected_cascade();
        let lookup = cascade.begin_shipping().unwrap();
        let _ = cascade.apply_shipping(lookup.ticket, Err(ApiError::Rejected("x".to_string())));
        assert_eq!(cascade.shipping(), &ShippingState::Failed);
        assert!(cascade.current_rate().is_none());
        assert_eq!(cascade.failure(), Some(Level::Shipping));
    }

    #[test]
    fn test_unknown_option_is_rejected_without_change() {
        let mut cascade = selected_cascade();
        let err = cascade.select_state(StateId::new(99)).unwrap_err();
        assert_eq!(
            err,
            CascadeError::UnknownOption {
                level: Level::State,
                id: "99".to_string()
            }
        );
        assert_eq!(cascade.state().selected(), Some(StateId::new(10)));
        assert_eq!(cascade.city().selected(), Some(CityId::new(100)));
    }

    #[test]
    fn test_selecting_before_load_is_rejected() {
        let mut cascade = CheckoutCascade::new();
        assert_eq!(
            cascade.select_country(CountryId::new(1)),
            Err(CascadeError::NotLoaded {
                level: Level::Country
            })
        );

        let _ = cascade.begin_countries();
        assert_eq!(
            cascade.select_country(CountryId::new(1)),
            Err(CascadeError::NotLoaded {
                level: Level::Country
            })
        );
        assert!(cascade.country().is_loading());
    }

    #[test]
    fn test_selecting_state_while_states_load_is_not_loaded() {
        let mut cascade = CheckoutCascade::new();
        let t = cascade.begin_countries();
        let _ = cascade.apply_countries(t, Ok(countries()));
        let _ = cascade.select_country(CountryId::new(1)).unwrap();

        assert_eq!(
            cascade.select_state(StateId::new(10)),
            Err(CascadeError::NotLoaded { level: Level::State })
        );
        assert!(cascade.state().is_loading());
    }

    #[test]
    fn test_selected_option_lookup() {
        let cascade = selected_cascade();
        assert_eq!(cascade.country().selected_option().unwrap().name, "Pakistan");
        assert_eq!(
            cascade.destination(),
            Some(Destination {
                country_id: CountryId::new(1),
                state_id: StateId::new(10),
                city_id: CityId::new(100),
            })
        );
    }
}
