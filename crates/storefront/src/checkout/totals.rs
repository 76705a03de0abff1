//! Order total derivation.

use orderain_core::{Money, checked_sum};
use rust_decimal::Decimal;
use tracing::warn;

use crate::api::{CartSummary, ExtraCharge, ShippingRate};

/// Checkout price breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub extra_charges: Vec<ExtraCharge>,
    /// `None` until a rate for the current destination is known.
    pub shipping: Option<Decimal>,
    pub total: Decimal,
    pub currency_icon: String,
}

impl OrderTotals {
    /// `subtotal + tax + extra charges - discount + shipping`.
    ///
    /// Without a rate the total excludes shipping and
    /// [`shipping_pending`](Self::shipping_pending) is set. A total outside the
    /// `Decimal` range is shown as zero.
    #[must_use]
    pub fn compute(summary: &CartSummary, rate: Option<&ShippingRate>) -> Self {
        let shipping = rate.map(|r| r.shipping_charges);
        let parts = [summary.sub_total, summary.tax_amount, -summary.total_discount]
            .into_iter()
            .chain(summary.extra_charges.iter().map(|c| c.amount))
            .chain(shipping);
        let total = checked_sum(parts).unwrap_or_else(|| {
            warn!(
                sub_total = %summary.sub_total,
                tax = %summary.tax_amount,
                "Order total overflowed, showing zero"
            );
            Decimal::ZERO
        });

        Self {
            subtotal: summary.sub_total,
            tax: summary.tax_amount,
            discount: summary.total_discount,
            extra_charges: summary.extra_charges.clone(),
            shipping,
            total,
            currency_icon: summary.currency_icon.clone(),
        }
    }

    /// Shipping still has to be calculated.
    #[must_use]
    pub const fn shipping_pending(&self) -> bool {
        self.shipping.is_none()
    }

    #[must_use]
    pub fn money(&self, amount: Decimal) -> Money {
        Money::new(amount, self.currency_icon.clone())
    }
}
