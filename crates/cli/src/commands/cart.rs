//! Cart commands.

use clap::Subcommand;
use orderain_core::VariantId;
use orderain_storefront::StorefrontError;
use orderain_storefront::cart::{Cart, LineKey};

use super::price;
use crate::app::{App, CliError};

#[derive(Subcommand)]
pub enum CartAction {
    /// Show cart lines and the local subtotal
    Show,
    /// Add a product by slug
    Add {
        /// Product slug
        slug: String,

        /// Variant ID, required for products with variants
        #[arg(short, long)]
        variant: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity; zero or less removes the line
    Set {
        product_id: String,

        #[arg(short, long)]
        variant: Option<String>,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        product_id: String,

        #[arg(short, long)]
        variant: Option<String>,
    },
    /// Empty the cart
    Clear,
    /// Print the total number of items
    Count,
    /// Print the cart as sent to the backend
    Payload,
}

fn key(product_id: String, variant: Option<String>) -> LineKey {
    LineKey::new(product_id, variant.map(VariantId::from))
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for line in cart.lines() {
        let name = match &line.details.variant_name {
            Some(variant) => format!("{} ({variant})", line.details.name),
            None => line.details.name.clone(),
        };
        println!(
            "{:<12} {:<40} {:>4} x {:>10} = {:>10}",
            line.key().to_string(),
            name,
            line.quantity,
            price(line.details.unit_price(), ""),
            price(line.line_total(), ""),
        );
    }
    println!();
    println!("Items:    {}", cart.item_count());
    println!("Subtotal: {}", price(cart.subtotal(), ""));
}

pub async fn run(app: &App, action: CartAction) -> Result<(), CliError> {
    let cart = app.cart();

    match action {
        CartAction::Show => print_cart(&cart.cart()),
        CartAction::Add {
            slug,
            variant,
            quantity,
        } => {
            let product = app
                .catalog()
                .product(&slug)
                .await
                .ok_or_else(|| StorefrontError::NotFound(format!("Product {slug}")))?;
            let variant = variant.map(VariantId::from);
            let snapshot = cart.add_product(&product, variant.as_ref(), quantity)?;
            println!("Added {quantity} x {}", product.name);
            print_cart(&snapshot);
        }
        CartAction::Set {
            product_id,
            variant,
            quantity,
        } => print_cart(&cart.update_quantity(&key(product_id, variant), quantity)),
        CartAction::Remove {
            product_id,
            variant,
        } => print_cart(&cart.remove_item(&key(product_id, variant))),
        CartAction::Clear => {
            cart.clear();
            println!("Cart cleared");
        }
        CartAction::Count => println!("{}", cart.item_count()),
        CartAction::Payload => {
            let payload = serde_json::to_string_pretty(&cart.to_api_payload())?;
            println!("{payload}");
        }
    }
    Ok(())
}
