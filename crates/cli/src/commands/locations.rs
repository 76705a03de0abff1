//! Shipping destination lookups.

use clap::Subcommand;
use orderain_core::{CountryId, StateId};
use orderain_storefront::api::{ApiError, CommerceApi, LocationOption};

use crate::app::App;

#[derive(Subcommand)]
pub enum LocationsAction {
    /// Countries the shop ships to
    Countries,
    /// States of a country
    States { country: CountryId },
    /// Cities of a state
    Cities { country: CountryId, state: StateId },
}

fn print_options<T: LocationOption>(what: &str, result: Result<Vec<T>, ApiError>) {
    let options = result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load {what}");
        Vec::new()
    });
    if options.is_empty() {
        println!("No {what} available");
    }
    for option in &options {
        println!("{:<6} {}", option.id(), option.name());
    }
}

pub async fn run(app: &App, action: LocationsAction) {
    let api = app.api();
    match action {
        LocationsAction::Countries => print_options("countries", api.countries().await),
        LocationsAction::States { country } => print_options("states", api.states(country).await),
        LocationsAction::Cities { country, state } => {
            print_options("cities", api.cities(country, state).await);
        }
    }
}
