//! CLI command implementations.
//!
//! Commands print their results to stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod locations;

use orderain_core::format_amount;
use rust_decimal::Decimal;

/// Amount with an optional currency icon prefix.
fn price(amount: Decimal, currency_icon: &str) -> String {
    format!("{currency_icon}{}", format_amount(amount))
}
