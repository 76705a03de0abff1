//! Core types for Orderain.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;

pub use id::*;
pub use money::{Money, MoneyError, checked_sum, format_amount, parse_amount};
pub use status::*;
