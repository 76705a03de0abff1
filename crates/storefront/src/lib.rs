//! Orderain storefront library.
//!
//! Cart, catalog, and checkout core of the Orderain storefront, written
//! against a remote commerce backend.
//!
//! # Modules
//!
//! - [`cart`] - Persistent cart store and cart operations
//! - [`api`] - Commerce backend client
//! - [`catalog`] - Product and category reads that degrade to empty results
//! - [`checkout`] - Location cascade, totals, validation, and order submission
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;

pub use error::{Result, StorefrontError};
