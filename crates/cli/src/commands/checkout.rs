//! Non-interactive checkout.

use clap::Args;
use orderain_core::{CityId, CountryId, StateId};
use orderain_storefront::checkout::{CheckoutForm, OrderConfirmation, OrderOutcome, OrderTotals};

use super::price;
use crate::app::{App, CliError};

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    /// Country ID (see `locations countries`)
    #[arg(long)]
    country: CountryId,

    /// State ID (see `locations states`)
    #[arg(long)]
    state: StateId,

    /// City ID (see `locations cities`)
    #[arg(long)]
    city: CityId,

    #[arg(long)]
    address: String,

    #[arg(long)]
    postal_code: String,

    /// Delivery note
    #[arg(long)]
    comment: Option<String>,
}

fn print_totals(totals: &OrderTotals) {
    let icon = totals.currency_icon.as_str();
    println!("Subtotal:  {:>12}", price(totals.subtotal, icon));
    println!("Tax:       {:>12}", price(totals.tax, icon));
    for charge in &totals.extra_charges {
        println!("{:<10} {:>12}", format!("{}:", charge.name), price(charge.amount, icon));
    }
    if !totals.discount.is_zero() {
        println!("Discount:  {:>12}", format!("-{}", price(totals.discount, icon)));
    }
    match totals.shipping {
        Some(shipping) => println!("Shipping:  {:>12}", price(shipping, icon)),
        None => println!("Shipping:  {:>12}", "pending"),
    }
    println!("Total:     {:>12}", price(totals.total, icon));
}

fn print_confirmation(confirmation: &OrderConfirmation) {
    println!("Order #{} placed", confirmation.order_id);

    let Some(details) = &confirmation.details else {
        return;
    };
    let icon = details.currency_icon.as_str();
    println!("Status:   {}", details.status);
    if let Some(placed) = details.created_at {
        println!("Placed:   {}", placed.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(method) = &details.payment_method {
        println!("Payment:  {method}");
    }
    for item in &details.order_items {
        let name = item
            .product
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("Item");
        println!(
            "  {name:<40} {:>4} x {:>10}",
            item.unit_qty,
            price(item.unit_price, icon)
        );
    }
    println!("Delivery: {}", price(details.delivery_charges, icon));
    println!("Paid:     {}", price(details.paid_amount, icon));
    if let Some(duration) = &details.shipping_duration {
        println!("Arrives:  {duration}");
    }
}

pub async fn run(app: App, args: CheckoutArgs) -> Result<(), CliError> {
    let mut session = app.checkout();
    session.start().await?;

    let _ = session.choose_country(args.country).await?;
    let _ = session.choose_state(args.state).await?;
    session.choose_city(args.city).await?;

    if let Some(level) = session.cascade().failure() {
        tracing::warn!("Could not load {level}; continuing");
    }
    if let Some(totals) = session.totals() {
        print_totals(&totals);
        println!();
    }

    let form = CheckoutForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        postal_code: args.postal_code,
        comment: args.comment,
        ..CheckoutForm::default()
    };

    match session.submit(form).await? {
        OrderOutcome::Placed(confirmation) => {
            print_confirmation(&confirmation);
            Ok(())
        }
        OrderOutcome::Rejected { message } => Err(CliError::OrderRejected(message)),
    }
}
